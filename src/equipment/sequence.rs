//! The configured equipment sequence.
//!
//! Every command that can fail is modelled as a pair of guarded candidates
//! on the same trigger: one to the success state while the status register
//! reports success, one to the matching `*Failed` state otherwise. Failure
//! states are substates of `Abort`, so they all inherit its handling of
//! `Abort` and `Reset`.

use super::catalog::{MachineMode, MachineState, MachineTrigger, ModeTrigger};
use super::status::StatusRegister;
use crate::builder::{ConfigError, StateConfigurator, StateMachineBuilder};
use crate::config::{Config, MachineConfig};
use crate::core::{State, Transition, Trigger};
use crate::graph::StateGraph;
use crate::machine::{FireError, StateMachine};

use MachineState as S;
use MachineTrigger as T;

/// Failure states that recover through `Reset` the same way.
const RECOVERABLE_FAILURES: &[MachineState] = &[
    S::InitializeFailed,
    S::StartFailed,
    S::PauseFailed,
    S::ResumeFailed,
    S::PurgeFailed,
    S::EndFailed,
];

/// Completion sink shared by both machines.
fn log_completed<St: State, Tr: Trigger>(transition: &Transition<St, Tr>) {
    tracing::info!(
        "{} -> {} via {}",
        transition.source.name(),
        transition.destination.name(),
        transition.trigger.name()
    );
}

/// `trigger` leads to `success` or `failure` depending on `status`.
fn permit_outcome<'b>(
    config: StateConfigurator<'b, MachineState, MachineTrigger>,
    status: &StatusRegister,
    trigger: MachineTrigger,
    success: MachineState,
    failure: MachineState,
) -> Result<StateConfigurator<'b, MachineState, MachineTrigger>, ConfigError> {
    config
        .permit_if(trigger, failure, status.failed_guard())?
        .permit_if(trigger, success, status.ok_guard())
}

/// Build the operating-state machine, starting in `initial`.
pub fn build_state_machine(
    initial: MachineState,
    status: &StatusRegister,
) -> Result<StateMachine<MachineState, MachineTrigger>, ConfigError> {
    configure_state_machine(initial, status)?.build()
}

/// Configure the operating-state sequence without building it, so callers
/// can audit the table or register extra observers first.
pub fn configure_state_machine(
    initial: MachineState,
    status: &StatusRegister,
) -> Result<StateMachineBuilder<MachineState, MachineTrigger>, ConfigError> {
    let mut builder = StateMachineBuilder::new(initial);
    for state in MachineState::ALL {
        builder.declare_state(*state, None)?;
    }

    permit_outcome(builder.configure(S::PowerOn), status, T::OpenServer, S::ServerOpen, S::ServerOpenFailed)?;

    builder.configure(S::ServerOpen).permit(T::Connect, S::Idle)?;

    let idle = builder.configure(S::Idle).permit(T::Abort, S::Abort)?;
    permit_outcome(idle, status, T::Init, S::Ready, S::InitializeFailed)?
        .permit_reentry_if(T::Reset, status.ok_guard())?
        .permit_if(T::Reset, S::ResetFailed, status.failed_guard())?
        .internal_transition(T::Error, |t| {
            tracing::error!(state = t.source.name(), "error reported while idle");
        })?;

    let ready = builder.configure(S::Ready).permit(T::Abort, S::Abort)?;
    permit_outcome(ready, status, T::Start, S::Running, S::StartFailed)?;

    let running = builder.configure(S::Running).permit(T::Abort, S::Abort)?;
    let running = permit_outcome(running, status, T::Pause, S::Paused, S::PauseFailed)?;
    permit_outcome(running, status, T::End, S::Idle, S::EndFailed)?
        .internal_transition(T::Warn, |t| {
            tracing::warn!(state = t.source.name(), "warning reported while running");
        })?
        .internal_transition(T::Error, |t| {
            tracing::error!(state = t.source.name(), "error reported while running");
        })?;

    let paused = builder.configure(S::Paused).substate_of(S::Running)?;
    let paused = permit_outcome(paused, status, T::Resume, S::Running, S::ResumeFailed)?;
    permit_outcome(paused, status, T::Purge, S::Idle, S::PurgeFailed)?;

    for failure in RECOVERABLE_FAILURES {
        let config = builder.configure(*failure).substate_of(S::Abort)?;
        permit_outcome(config, status, T::Reset, S::Idle, S::ResetFailed)?;
    }

    // A failed reset from ResetFailed escalates to Abort rather than looping.
    let reset_failed = builder.configure(S::ResetFailed).substate_of(S::Abort)?;
    permit_outcome(reset_failed, status, T::Reset, S::Idle, S::Abort)?;

    let abort = builder.configure(S::Abort).permit_reentry(T::Abort)?;
    permit_outcome(abort, status, T::Reset, S::Idle, S::ResetFailed)?;

    builder.on_transition_completed(log_completed);
    Ok(builder)
}

/// Build the host connection mode machine, starting in `initial`.
pub fn build_mode_machine(
    initial: MachineMode,
) -> Result<StateMachine<MachineMode, ModeTrigger>, ConfigError> {
    let mut builder = StateMachineBuilder::new(initial);
    builder
        .configure(MachineMode::OffLine)
        .permit(ModeTrigger::GoOnline, MachineMode::OnLine)?;
    builder
        .configure(MachineMode::OnLine)
        .permit(ModeTrigger::GoOffline, MachineMode::OffLine)?;
    builder.on_transition_completed(log_completed);
    builder.build()
}

/// An equipment controller: status register plus the operating-state and
/// mode machines that consult it.
pub struct Equipment {
    status: StatusRegister,
    state: StateMachine<MachineState, MachineTrigger>,
    mode: StateMachine<MachineMode, ModeTrigger>,
}

impl Equipment {
    /// Start powered on and offline.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_initial(MachineState::PowerOn, MachineMode::OffLine)
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::assemble(&config.machine)
    }

    pub fn with_initial(state: MachineState, mode: MachineMode) -> Result<Self, ConfigError> {
        Self::assemble(&MachineConfig {
            initial_state: state,
            initial_mode: mode,
            ..MachineConfig::default()
        })
    }

    fn assemble(machine: &MachineConfig) -> Result<Self, ConfigError> {
        let status = StatusRegister::new();
        let mut builder = configure_state_machine(machine.initial_state, &status)?;
        if let Some(limit) = machine.history_limit {
            builder.history_limit(limit);
        }
        Ok(Self {
            state: builder.build()?,
            mode: build_mode_machine(machine.initial_mode)?,
            status,
        })
    }

    pub fn status(&self) -> &StatusRegister {
        &self.status
    }

    pub fn fire(
        &mut self,
        trigger: MachineTrigger,
    ) -> Result<Transition<MachineState, MachineTrigger>, FireError> {
        self.state.fire(trigger)
    }

    /// Record a command outcome, then fire the trigger that reports it.
    pub fn complete(
        &mut self,
        trigger: MachineTrigger,
        code: u32,
        message: impl Into<String>,
    ) -> Result<Transition<MachineState, MachineTrigger>, FireError> {
        self.status.set(code, message);
        self.state.fire(trigger)
    }

    pub fn fire_mode(
        &mut self,
        trigger: ModeTrigger,
    ) -> Result<Transition<MachineMode, ModeTrigger>, FireError> {
        self.mode.fire(trigger)
    }

    pub fn current_state(&self) -> MachineState {
        *self.state.current_state()
    }

    pub fn current_mode(&self) -> MachineMode {
        *self.mode.current_state()
    }

    pub fn state_machine(&self) -> &StateMachine<MachineState, MachineTrigger> {
        &self.state
    }

    pub fn mode_machine(&self) -> &StateMachine<MachineMode, ModeTrigger> {
        &self.mode
    }

    pub fn state_graph(&self) -> StateGraph {
        self.state.graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionKind;
    use crate::equipment::error_code::*;

    fn equipment_in(state: MachineState) -> Equipment {
        Equipment::with_initial(state, MachineMode::OffLine).unwrap()
    }

    #[test]
    fn sequence_builds() {
        let equipment = Equipment::new().unwrap();
        assert_eq!(equipment.current_state(), S::PowerOn);
        assert_eq!(equipment.current_mode(), MachineMode::OffLine);
        assert_eq!(equipment.state_machine().table().len(), MachineState::ALL.len());
    }

    #[test]
    fn open_server_follows_the_status() {
        let mut ok = Equipment::new().unwrap();
        ok.fire(T::OpenServer).unwrap();
        assert_eq!(ok.current_state(), S::ServerOpen);

        let mut failed = Equipment::new().unwrap();
        failed.complete(T::OpenServer, EC_SYSTEM_LOAD_FAIL, "port busy").unwrap();
        assert_eq!(failed.current_state(), S::ServerOpenFailed);
        assert!(failed.state_machine().is_terminal(&S::ServerOpenFailed));
    }

    #[test]
    fn idle_reset_reenters_on_success() {
        let mut equipment = equipment_in(S::Idle);
        let transition = equipment.fire(T::Reset).unwrap();
        assert_eq!(transition.kind, TransitionKind::Reentry);
        assert_eq!(equipment.current_state(), S::Idle);

        equipment.complete(T::Reset, EC_SYSTEM_RESET_FAIL, "").unwrap();
        assert_eq!(equipment.current_state(), S::ResetFailed);
    }

    #[test]
    fn paused_inherits_from_running() {
        let mut equipment = equipment_in(S::Paused);
        assert!(equipment.state_machine().is_in_state(&S::Running));

        let warn = equipment.fire(T::Warn).unwrap();
        assert_eq!(warn.kind, TransitionKind::Internal);
        assert_eq!(equipment.current_state(), S::Paused);

        equipment.fire(T::End).unwrap();
        assert_eq!(equipment.current_state(), S::Idle);
    }

    #[test]
    fn failures_inherit_abort_reentry_target() {
        let mut equipment = equipment_in(S::StartFailed);
        let transition = equipment.fire(T::Abort).unwrap();
        // Reentry keeps the literal current state, not the declaring ancestor.
        assert_eq!(transition.kind, TransitionKind::Reentry);
        assert_eq!(equipment.current_state(), S::StartFailed);
    }

    #[test]
    fn undeclared_trigger_is_invalid() {
        let mut equipment = Equipment::new().unwrap();
        let err = equipment.fire(T::Start).unwrap_err();
        assert!(matches!(err, FireError::InvalidTransition { .. }));
        assert_eq!(equipment.current_state(), S::PowerOn);
    }

    #[test]
    fn mode_machine_toggles() {
        let mut equipment = Equipment::new().unwrap();
        assert!(equipment.fire_mode(ModeTrigger::GoOffline).is_err());
        equipment.fire_mode(ModeTrigger::GoOnline).unwrap();
        assert_eq!(equipment.current_mode(), MachineMode::OnLine);
        equipment.fire_mode(ModeTrigger::GoOffline).unwrap();
        assert_eq!(equipment.current_mode(), MachineMode::OffLine);
        // The operating state is unaffected.
        assert_eq!(equipment.current_state(), S::PowerOn);
    }

    #[test]
    fn from_config_uses_the_configured_initial_states() {
        let config = Config::from_toml_str(
            "[machine]\ninitial_state = \"Ready\"\ninitial_mode = \"OnLine\"\n",
        )
        .unwrap();
        let equipment = Equipment::from_config(&config).unwrap();
        assert_eq!(equipment.current_state(), S::Ready);
        assert_eq!(equipment.current_mode(), MachineMode::OnLine);
    }

    #[test]
    fn from_config_caps_the_history() {
        let config = Config::from_toml_str("[machine]\nhistory_limit = 2\n").unwrap();
        let mut equipment = Equipment::from_config(&config).unwrap();
        for trigger in [T::OpenServer, T::Connect, T::Init, T::Start] {
            equipment.fire(trigger).unwrap();
        }
        let history = equipment.state_machine().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(), vec![&S::Idle, &S::Ready, &S::Running]);
    }
}
