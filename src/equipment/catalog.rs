//! State and trigger catalogs of the equipment controller.

use crate::{state_enum, trigger_enum};

state_enum! {
    /// Operating states of the equipment, in declaration order.
    pub enum MachineState {
        PowerOn,
        Idle,
        ServerOpen,
        ServerOpenFailed,
        Connected,
        Disconnected,
        Initializing,
        InitializeFailed,
        Ready,
        Starting,
        StartFailed,
        Running,
        Pausing,
        PauseFailed,
        Paused,
        Resuming,
        ResumeFailed,
        Purging,
        PurgeFailed,
        Ending,
        EndFailed,
        Resetting,
        ResetFailed,
        Error,
        Abort,
    }
    error: [
        ServerOpenFailed,
        InitializeFailed,
        StartFailed,
        PauseFailed,
        ResumeFailed,
        PurgeFailed,
        EndFailed,
        ResetFailed,
        Error,
        Abort,
    ]
}

state_enum! {
    /// Host connection mode, tracked independently of the operating state.
    pub enum MachineMode {
        OffLine,
        OnLine,
    }
}

trigger_enum! {
    /// Commands and events that drive the operating state.
    pub enum MachineTrigger {
        OpenServer,
        Connect,
        Init,
        Start,
        Pause,
        Resume,
        End,
        Purge,
        Reset,
        Abort,
        Warn,
        Error,
    }
}

trigger_enum! {
    pub enum ModeTrigger {
        GoOnline,
        GoOffline,
    }
}
