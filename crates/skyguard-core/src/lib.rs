//! # Skyguard Core
//!
//! Pursuit/interception engagement engine for Skyguard.
//!
//! This crate provides the deterministic engagement simulation between two
//! populations of 3D entities: constant-velocity *targets* (red) and
//! speed-bounded *interceptors* (blue) that close on targets using a
//! rendezvous-point guidance law.
//!
//! ## Architecture
//!
//! Each tick is split into a read phase and a write phase:
//!
//! - **Read**: [`guidance`] pairs interceptors with targets ([`assignment`]),
//!   predicts target trajectories ([`prediction`]) and picks a rendezvous point
//!   per interceptor. Nothing is mutated, so this phase may run in parallel.
//! - **Write**: [`kinematics`] advances every entity, then the
//!   [`resolver::KillResolver`] applies mutual destruction.
//!
//! The [`simulation::Simulation`] orchestrator owns the [`arena::Arena`]
//! registry, the tick counter and the termination state.
//!
//! ## Usage
//!
//! ```
//! use skyguard_core::scenario::Scenario;
//! use skyguard_core::simulation::{Action, Simulation};
//!
//! let scenario = Scenario::from_json(
//!     r#"{
//!         "blue_objects": [{ "position": [0, 0, 0], "max_speed": 3.0 }],
//!         "red_objects": [{ "position": [-50, -50, 50], "velocity": [1, 0, 0] }]
//!     }"#,
//! )?;
//!
//! let mut sim = Simulation::new();
//! sim.load_scenario(&scenario)?;
//!
//! let mut done = false;
//! while !done && sim.tick() < 200 {
//!     done = sim.step(Action::Guided).done;
//! }
//! assert!(done);
//! # Ok::<(), skyguard_core::error::EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod assignment;
pub mod config;
pub mod edit;
pub mod entity;
pub mod error;
pub mod guidance;
pub mod kinematics;
pub mod prediction;
pub mod resolver;
pub mod scenario;
pub mod simulation;
pub mod snapshot;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::Arena;
pub use config::{EngineConfig, RewardMode};
pub use entity::{EntityId, EntityKind, Interceptor, Target};
pub use error::{EngineError, Result};
pub use prediction::{MotionModel, Waypoint};
pub use scenario::Scenario;
pub use simulation::{Action, SimState, Simulation, StepOutcome};
pub use snapshot::ArenaSnapshot;
