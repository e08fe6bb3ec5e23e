//! Equipment controller built on the engine.
//!
//! The operating state follows a command sequence (open the server, connect,
//! initialize, start, pause, resume, purge, end) where each command's outcome
//! is reported through a [`StatusRegister`] and selects between a success
//! and a failure state. Host connection mode is a second, independent
//! machine.

mod catalog;
mod sequence;
mod status;

pub use catalog::{MachineMode, MachineState, MachineTrigger, ModeTrigger};
pub use sequence::{build_mode_machine, build_state_machine, configure_state_machine, Equipment};
pub use status::{error_code, StatusRegister};
