//! Trajectory prediction for constant-velocity targets.
//!
//! # Time-index convention
//!
//! Waypoint `k` is where the entity will be after `k` ticks: index 0 is the
//! current position at time 0 and index `k > 0` is `position + k * velocity`.
//! Guidance compares these indices directly with interceptor arrival times
//! measured in ticks, so the convention must not drift between callers.
//!
//! # Example
//!
//! ```
//! use skyguard_core::prediction::{predict, DEFAULT_HORIZON};
//! use glam::DVec3;
//!
//! let path = predict(DVec3::ZERO, DVec3::X, DEFAULT_HORIZON);
//! assert_eq!(path.len(), 30);
//! assert_eq!(path[0].position, DVec3::ZERO);
//! assert_eq!(path[5].position, DVec3::new(5.0, 0.0, 0.0));
//! ```

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Number of predicted waypoints used by guidance.
pub const DEFAULT_HORIZON: usize = 30;

/// One predicted point on a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Predicted position.
    pub position: DVec3,
    /// Ticks from now at which the entity reaches `position`.
    pub time_index: usize,
}

/// Motion model used to extrapolate a target's future positions.
///
/// Only constant velocity exists today; new models become new variants so that
/// every caller keeps going through [`MotionModel::predict`].
///
/// Serialized as its identifier. Deserialization goes through [`FromStr`], so
/// an unknown identifier reports [`EngineError::UnsupportedMotionModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MotionModel {
    /// Straight-line extrapolation, identifier `"CM"`.
    #[default]
    ConstantVelocity,
}

impl MotionModel {
    /// Returns the short identifier used in configs.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::ConstantVelocity => "CM",
        }
    }

    /// Extrapolates `horizon` waypoints starting at the current position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn predict(self, position: DVec3, velocity: DVec3, horizon: usize) -> Vec<Waypoint> {
        match self {
            Self::ConstantVelocity => (0..horizon)
                .map(|k| Waypoint {
                    position: position + velocity * k as f64,
                    time_index: k,
                })
                .collect(),
        }
    }
}

impl FromStr for MotionModel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CM" => Ok(Self::ConstantVelocity),
            other => Err(EngineError::UnsupportedMotionModel(other.to_string())),
        }
    }
}

impl TryFrom<String> for MotionModel {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MotionModel> for String {
    fn from(model: MotionModel) -> Self {
        model.identifier().to_string()
    }
}

impl fmt::Display for MotionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Constant-velocity prediction over `horizon` ticks.
#[must_use]
pub fn predict(position: DVec3, velocity: DVec3, horizon: usize) -> Vec<Waypoint> {
    MotionModel::ConstantVelocity.predict(position, velocity, horizon)
}

/// Prediction keyed by a model identifier such as `"CM"`.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedMotionModel`] for any identifier other
/// than `"CM"`.
pub fn predict_with_model(
    model: &str,
    position: DVec3,
    velocity: DVec3,
    horizon: usize,
) -> Result<Vec<Waypoint>> {
    Ok(model.parse::<MotionModel>()?.predict(position, velocity, horizon))
}

/// Ticks an interceptor flying flat out from `from` needs to reach `to`.
#[must_use]
pub fn time_to_reach(from: DVec3, max_speed: f64, to: DVec3) -> f64 {
    from.distance(to) / max_speed
}
