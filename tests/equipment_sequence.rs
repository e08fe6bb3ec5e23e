//! Scenario tests for the configured equipment sequence.

use machinist::builder::ConfigIssue;
use machinist::core::TransitionKind;
use machinist::equipment::error_code::*;
use machinist::equipment::{
    configure_state_machine, Equipment, MachineMode, MachineState, MachineTrigger, StatusRegister,
};
use machinist::FireError;
use std::sync::{Arc, Mutex};
use stillwater::Validation;

use MachineState as S;
use MachineTrigger as T;

fn equipment_in(state: MachineState) -> Equipment {
    Equipment::with_initial(state, MachineMode::OffLine).unwrap()
}

#[test]
fn power_on_to_initialize_failed() {
    let mut equipment = Equipment::new().unwrap();

    equipment.fire(T::OpenServer).unwrap();
    assert_eq!(equipment.current_state(), S::ServerOpen);
    equipment.fire(T::Connect).unwrap();
    assert_eq!(equipment.current_state(), S::Idle);

    let transition = equipment
        .complete(T::Init, EC_SYSTEM_INIT_FAIL, "axis fault")
        .unwrap();
    assert_eq!(transition.source, S::Idle);
    assert_eq!(transition.destination, S::InitializeFailed);
    assert_eq!(equipment.current_state(), S::InitializeFailed);

    let machine = equipment.state_machine();
    assert!(machine.is_substate_of(&S::InitializeFailed, &S::Abort));
    assert!(machine.is_in_state(&S::Abort));
}

#[test]
fn full_production_run() {
    let mut equipment = equipment_in(S::Idle);
    for (trigger, expected) in [
        (T::Init, S::Ready),
        (T::Start, S::Running),
        (T::Pause, S::Paused),
        (T::Resume, S::Running),
        (T::End, S::Idle),
    ] {
        equipment.fire(trigger).unwrap();
        assert_eq!(equipment.current_state(), expected);
    }
    assert_eq!(
        equipment.state_machine().history().get_path(),
        vec![&S::Idle, &S::Ready, &S::Running, &S::Paused, &S::Running, &S::Idle]
    );
}

#[test]
fn purge_from_paused_returns_to_idle() {
    let mut equipment = equipment_in(S::Paused);
    equipment.status().set_ok();
    let transition = equipment.fire(T::Purge).unwrap();
    assert_eq!(transition.kind, TransitionKind::External);
    assert_eq!(equipment.current_state(), S::Idle);
}

#[test]
fn failed_purge_goes_to_purge_failed() {
    let mut equipment = equipment_in(S::Paused);
    equipment
        .complete(T::Purge, EC_SYSTEM_PURGE_FAIL, "valve stuck")
        .unwrap();
    assert_eq!(equipment.current_state(), S::PurgeFailed);
    assert_eq!(equipment.status().message(), "valve stuck");
}

#[test]
fn abort_is_reentrant() {
    let mut equipment = equipment_in(S::Running);
    let first = equipment.fire(T::Abort).unwrap();
    assert_eq!(first.kind, TransitionKind::External);
    assert_eq!(equipment.current_state(), S::Abort);

    let second = equipment.fire(T::Abort).unwrap();
    assert_eq!(second.kind, TransitionKind::Reentry);
    assert_eq!(second.source, S::Abort);
    assert_eq!(second.destination, S::Abort);
    assert_eq!(equipment.current_state(), S::Abort);
}

#[test]
fn reset_failed_escalates_to_abort() {
    let mut equipment = equipment_in(S::ResetFailed);
    equipment
        .complete(T::Reset, EC_SYSTEM_RESET_FAIL, "")
        .unwrap();
    assert_eq!(equipment.current_state(), S::Abort);

    // From Abort a failed reset goes to ResetFailed, not back to Abort.
    equipment.fire(T::Reset).unwrap();
    assert_eq!(equipment.current_state(), S::ResetFailed);

    equipment.status().set_ok();
    equipment.fire(T::Reset).unwrap();
    assert_eq!(equipment.current_state(), S::Idle);
}

#[test]
fn every_failure_state_recovers_through_reset() {
    for failure in [
        S::InitializeFailed,
        S::StartFailed,
        S::PauseFailed,
        S::ResumeFailed,
        S::PurgeFailed,
        S::EndFailed,
    ] {
        let mut equipment = equipment_in(failure);
        equipment.fire(T::Reset).unwrap();
        assert_eq!(equipment.current_state(), S::Idle, "reset from {failure}");

        let mut equipment = equipment_in(failure);
        equipment
            .complete(T::Reset, EC_SYSTEM_RESET_FAIL, "")
            .unwrap();
        assert_eq!(equipment.current_state(), S::ResetFailed, "failed reset from {failure}");
    }
}

#[test]
fn start_is_not_permitted_before_init() {
    let mut equipment = equipment_in(S::Idle);
    let err = equipment.fire(T::Start).unwrap_err();
    assert_eq!(
        err,
        FireError::InvalidTransition {
            state: "Idle".to_string(),
            trigger: "Start".to_string(),
        }
    );
    assert_eq!(equipment.current_state(), S::Idle);
}

#[test]
fn warnings_while_running_do_not_change_state() {
    let mut equipment = equipment_in(S::Running);
    let transition = equipment.fire(T::Warn).unwrap();
    assert_eq!(transition.kind, TransitionKind::Internal);
    assert_eq!(equipment.current_state(), S::Running);
    assert_eq!(equipment.state_machine().history().len(), 1);
}

#[test]
fn audit_reports_states_outside_the_sequence() {
    let status = StatusRegister::new();
    let builder = configure_state_machine(S::PowerOn, &status).unwrap();

    let issues = match builder.audit() {
        Validation::Failure(issues) => issues,
        Validation::Success(_) => panic!("Expected unreachable states"),
    };
    let unreachable: Vec<&str> = issues
        .iter()
        .filter_map(|issue| match issue {
            ConfigIssue::Unreachable { state } => Some(state.as_str()),
            ConfigIssue::Shadowed { .. } => None,
        })
        .collect();
    assert_eq!(
        unreachable,
        vec![
            "Connected",
            "Disconnected",
            "Initializing",
            "Starting",
            "Pausing",
            "Resuming",
            "Purging",
            "Ending",
            "Resetting",
            "Error",
        ]
    );
    assert!(!issues
        .iter()
        .any(|issue| matches!(issue, ConfigIssue::Shadowed { .. })));
}

#[test]
fn graph_export_shows_the_hierarchy() {
    let equipment = Equipment::new().unwrap();
    let graph = equipment.state_graph();

    assert_eq!(graph.initial, "PowerOn");
    assert_eq!(graph.nodes.len(), MachineState::ALL.len());
    let children: Vec<_> = graph.children_of("Abort").map(|n| n.name.as_str()).collect();
    assert_eq!(
        children,
        vec![
            "InitializeFailed",
            "StartFailed",
            "PauseFailed",
            "ResumeFailed",
            "PurgeFailed",
            "EndFailed",
            "ResetFailed",
        ]
    );
    assert!(graph
        .edges_from("PowerOn")
        .all(|edge| edge.guard.is_some()));

    let dot = graph.to_dot();
    assert!(dot.contains("subgraph \"cluster_Abort\""));
    assert!(dot.contains("\"Idle\" -> \"Ready\" [label=\"Init [status ok]\"];"));
    assert_eq!(dot, Equipment::new().unwrap().state_graph().to_dot());
}

#[test]
fn completion_notifications_follow_fires() {
    let status = StatusRegister::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut builder = configure_state_machine(S::Idle, &status).unwrap();
    let sink = Arc::clone(&seen);
    builder.on_transition_completed(move |t| {
        sink.lock()
            .unwrap()
            .push(format!("{} -> {} via {}", t.source, t.destination, t.trigger));
    });
    let mut machine = builder.build().unwrap();

    for trigger in [T::Init, T::Start, T::Pause] {
        machine.fire(trigger).unwrap();
    }
    status.set(EC_SYSTEM_RESUME_FAIL, "");
    machine.fire(T::Resume).unwrap();
    assert!(machine.fire(T::Connect).is_err());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "Idle -> Ready via Init",
            "Ready -> Running via Start",
            "Running -> Paused via Pause",
            "Paused -> ResumeFailed via Resume",
        ]
    );
}
