//! Structural audit of a configured transition table.
//!
//! Unlike [`ConfigError`](crate::builder::ConfigError), issues found here do
//! not stop the build. They are collected all at once with `Validation`.

use crate::core::{State, Target, TransitionTable, Trigger};
use std::collections::{HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Something legal but suspicious in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("State '{state}' cannot be reached from the initial state")]
    Unreachable { state: String },

    #[error("Candidate #{position} for '{trigger}' on '{state}' follows an unconditional candidate and is never tried")]
    Shadowed {
        state: String,
        trigger: String,
        position: usize,
    },
}

/// Audit `table` as if the machine started in `initial`.
pub fn audit_table<S: State, T: Trigger>(
    table: &TransitionTable<S, T>,
    initial: &S,
) -> Validation<(), NonEmptyVec<ConfigIssue>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigIssue>>> = Vec::new();

    let reachable = reachable_states(table, initial);
    for state in table.states() {
        let check = if reachable.contains(state) {
            Validation::success(())
        } else {
            Validation::fail(ConfigIssue::Unreachable {
                state: state.name().to_string(),
            })
        };
        checks.push(check);
    }

    for state in table.states() {
        let mut defaulted: HashSet<&T> = HashSet::new();
        for (position, candidate) in table.candidates_of(state).iter().enumerate() {
            if defaulted.contains(&candidate.trigger) {
                checks.push(Validation::fail(ConfigIssue::Shadowed {
                    state: state.name().to_string(),
                    trigger: candidate.trigger.name().to_string(),
                    position,
                }));
            } else if candidate.is_unconditional() {
                defaulted.insert(&candidate.trigger);
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Breadth-first search over every candidate a state can use, its own and
/// those inherited from its ancestors. Guards are ignored.
fn reachable_states<'t, S: State, T: Trigger>(
    table: &'t TransitionTable<S, T>,
    initial: &'t S,
) -> HashSet<&'t S> {
    let mut seen: HashSet<&S> = HashSet::new();
    let mut queue: VecDeque<&S> = VecDeque::new();
    seen.insert(initial);
    queue.push_back(initial);

    while let Some(state) = queue.pop_front() {
        let lineage = std::iter::successors(Some(state), |s| table.parent_of(s)).take(table.len());
        for owner in lineage {
            for candidate in table.candidates_of(owner) {
                if let Target::State(destination) = &candidate.target {
                    if seen.insert(destination) {
                        queue.push_back(destination);
                    }
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateMachineBuilder;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Oven {
        Cold,
        Heating,
        Hot,
        Broken,
    }

    impl State for Oven {
        fn name(&self) -> &str {
            match self {
                Self::Cold => "Cold",
                Self::Heating => "Heating",
                Self::Hot => "Hot",
                Self::Broken => "Broken",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Knob {
        Up,
        Down,
    }

    impl Trigger for Knob {
        fn name(&self) -> &str {
            match self {
                Self::Up => "Up",
                Self::Down => "Down",
            }
        }
    }

    #[test]
    fn clean_configuration_passes() {
        let mut builder = StateMachineBuilder::new(Oven::Cold);
        builder
            .configure(Oven::Cold)
            .permit(Knob::Up, Oven::Heating)
            .unwrap();
        builder
            .configure(Oven::Heating)
            .permit(Knob::Up, Oven::Hot)
            .unwrap()
            .permit(Knob::Down, Oven::Cold)
            .unwrap();

        assert!(builder.audit().is_success());
    }

    #[test]
    fn audit_accumulates_every_issue() {
        let mut builder = StateMachineBuilder::new(Oven::Cold);
        builder.declare_state(Oven::Broken, None).unwrap();
        builder
            .configure(Oven::Cold)
            .permit(Knob::Up, Oven::Heating)
            .unwrap()
            .permit_if(Knob::Up, Oven::Hot, || true)
            .unwrap();

        match builder.audit() {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 2);
                assert!(issues.iter().any(|i| matches!(
                    i,
                    ConfigIssue::Unreachable { state } if state == "Broken"
                )));
                assert!(issues.iter().any(|i| matches!(
                    i,
                    ConfigIssue::Shadowed { position: 1, .. }
                )));
            }
            Validation::Success(_) => panic!("Expected issues, got success"),
        }
    }

    #[test]
    fn inherited_transitions_count_for_reachability() {
        let mut builder = StateMachineBuilder::new(Oven::Heating);
        builder
            .declare_state(Oven::Heating, Some(Oven::Hot))
            .unwrap();
        builder
            .configure(Oven::Hot)
            .permit(Knob::Down, Oven::Broken)
            .unwrap();
        builder
            .configure(Oven::Broken)
            .permit(Knob::Up, Oven::Cold)
            .unwrap();

        // Hot is only a parent here; it is never the current state.
        match builder.audit() {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 1);
                assert!(issues.iter().any(|i| matches!(
                    i,
                    ConfigIssue::Unreachable { state } if state == "Hot"
                )));
            }
            Validation::Success(_) => panic!("Expected the parent to be unreachable"),
        }
    }
}
