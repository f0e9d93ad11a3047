//! Error types for the engagement engine.
//!
//! Every failure is deterministic and reported synchronously at the call that
//! triggered it. A zero-magnitude guidance direction is not an error: it is the
//! normal "stay put" case handled by the kinematics stepper.

use thiserror::Error;

use crate::entity::EntityId;

/// Errors surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The trajectory predictor was asked for a model other than constant velocity.
    #[error("unsupported motion model: {0:?} (only \"CM\" is supported)")]
    UnsupportedMotionModel(String),

    /// A persisted scenario is malformed. Nothing is loaded when this is returned.
    #[error("invalid scenario data: {0}")]
    InvalidScenarioData(String),

    /// A scenario edit referenced an entity that is not in the registry.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// The engine configuration holds an out-of-range value.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
