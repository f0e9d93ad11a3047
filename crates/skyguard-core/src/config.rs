//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Unknown keys are rejected.
//!
//! ```
//! use skyguard_core::config::{EngineConfig, RewardMode};
//!
//! let config = EngineConfig::from_json("{}").unwrap();
//! assert_eq!(config, EngineConfig::default());
//! assert_eq!(config.horizon, 30);
//! assert_eq!(config.kill_threshold, 1.0);
//! assert_eq!(config.reward_mode, RewardMode::Placeholder);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::prediction::{MotionModel, DEFAULT_HORIZON};

/// Distance below which a live interceptor and a live target destroy each other.
pub const DEFAULT_KILL_THRESHOLD: f64 = 1.0;

/// What [`Simulation::step`](crate::simulation::Simulation::step) reports as reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Multi-entity mode: reward is always 0.
    #[default]
    Placeholder,
    /// Legacy single-pair mode: reward is minus the distance between the first
    /// interceptor and the first target after the tick.
    NegativeDistance,
}

/// Tunables for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of predicted waypoints considered by guidance.
    pub horizon: usize,
    /// Mutual-kill proximity, compared with strict `<`.
    pub kill_threshold: f64,
    /// Target motion model used by guidance.
    pub motion_model: MotionModel,
    /// Reward reported by each step.
    pub reward_mode: RewardMode,
    /// Run the guidance read phase on the rayon pool.
    pub parallel_guidance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            kill_threshold: DEFAULT_KILL_THRESHOLD,
            motion_model: MotionModel::ConstantVelocity,
            reward_mode: RewardMode::Placeholder,
            parallel_guidance: true,
        }
    }
}

impl EngineConfig {
    /// Default config with the legacy single-pair reward.
    #[must_use]
    pub fn single_pair() -> Self {
        Self {
            reward_mode: RewardMode::NegativeDistance,
            ..Self::default()
        }
    }

    /// Parses and validates a config.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnsupportedMotionModel`] if `motion_model` names a
    ///   model other than `"CM"`.
    /// - [`EngineError::InvalidConfig`] for malformed JSON, an unknown key,
    ///   or a value rejected by [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(invalid)?;
        if let Some(model) = value.get("motion_model").and_then(serde_json::Value::as_str) {
            model.parse::<MotionModel>()?;
        }
        let config: Self = serde_json::from_value(value).map_err(invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for a zero horizon or a kill
    /// threshold that is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(EngineError::InvalidConfig(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !(self.kill_threshold.is_finite() && self.kill_threshold > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "kill_threshold must be positive and finite, got {}",
                self.kill_threshold
            )));
        }
        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn invalid(err: serde_json::Error) -> EngineError {
    EngineError::InvalidConfig(err.to_string())
}
