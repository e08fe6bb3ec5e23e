//! Builder API for configuring state machines.
//!
//! Configuration happens once, up front: declare states and their
//! hierarchy, attach candidates to each state, register completion
//! observers, then [`build`](StateMachineBuilder::build). Any bad
//! declaration is reported immediately and also prevents the build.
//!
//! # Example
//!
//! ```
//! use machinist::builder::StateMachineBuilder;
//! use machinist::{state_enum, trigger_enum};
//!
//! state_enum! {
//!     enum Light {
//!         Off,
//!         On,
//!         Dimmed,
//!     }
//! }
//!
//! trigger_enum! {
//!     enum Switch {
//!         Toggle,
//!         Dim,
//!     }
//! }
//!
//! let mut builder = StateMachineBuilder::new(Light::Off);
//! builder.configure(Light::Off).permit(Switch::Toggle, Light::On)?;
//! builder
//!     .configure(Light::On)
//!     .permit(Switch::Toggle, Light::Off)?
//!     .permit(Switch::Dim, Light::Dimmed)?;
//! builder.configure(Light::Dimmed).substate_of(Light::On)?;
//!
//! let mut machine = builder.build()?;
//! machine.fire(Switch::Toggle)?;
//! machine.fire(Switch::Dim)?;
//! // Dimmed inherits Toggle from On.
//! machine.fire(Switch::Toggle)?;
//! assert_eq!(machine.current_state(), &Light::Off);
//! # Ok::<(), machinist::Error>(())
//! ```

pub mod audit;
pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use audit::ConfigIssue;
pub use error::ConfigError;
pub use machine::StateMachineBuilder;
pub use state::StateConfigurator;
