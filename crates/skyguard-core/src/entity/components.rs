//! Concrete entity state for targets and interceptors.
//!
//! Both types keep an immutable reference position (initial position or launch
//! site) next to the live position so that [`Target::reset`] and
//! [`Interceptor::reset`] can restore the start of the run.
//!
//! Construction goes through typed configuration records ([`TargetConfig`],
//! [`InterceptorConfig`]), which are also the persisted scenario format.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::error::{EngineError, Result};

/// Interceptor speed bound applied when a scenario does not name one.
pub const DEFAULT_MAX_SPEED: f64 = 3.0;

fn default_max_speed() -> f64 {
    DEFAULT_MAX_SPEED
}

fn check_finite(what: &str, v: DVec3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidScenarioData(format!(
            "{what} has a non-finite component: {v}"
        )))
    }
}

// =============================================================================
// Configuration records
// =============================================================================

/// Construction record for a target (`red_objects` entry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Initial position.
    pub position: DVec3,
    /// Constant per-tick velocity.
    pub velocity: DVec3,
}

impl TargetConfig {
    /// Creates a target record.
    #[must_use]
    pub const fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    /// Rejects non-finite vectors.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] naming the bad field.
    pub fn validate(&self) -> Result<()> {
        check_finite("target position", self.position)?;
        check_finite("target velocity", self.velocity)
    }
}

/// Construction record for an interceptor (`blue_objects` entry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptorConfig {
    /// Launch site position.
    pub position: DVec3,
    /// Maximum displacement per tick.
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

impl InterceptorConfig {
    /// Creates an interceptor record with [`DEFAULT_MAX_SPEED`].
    #[must_use]
    pub const fn new(position: DVec3) -> Self {
        Self {
            position,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }

    /// Overrides the speed bound.
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Rejects non-finite positions and non-positive speed bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] naming the bad field.
    pub fn validate(&self) -> Result<()> {
        check_finite("interceptor position", self.position)?;
        if self.max_speed.is_finite() && self.max_speed > 0.0 {
            Ok(())
        } else {
            Err(EngineError::InvalidScenarioData(format!(
                "interceptor max_speed must be positive and finite, got {}",
                self.max_speed
            )))
        }
    }
}

// =============================================================================
// Target
// =============================================================================

/// Red entity travelling at constant velocity while alive.
///
/// `velocity` is never changed by the engine itself; only scenario edits touch
/// it. `position` is changed by the kinematics stepper and by [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub(crate) id: EntityId,
    pub(crate) initial_position: DVec3,
    pub(crate) position: DVec3,
    pub(crate) velocity: DVec3,
    pub(crate) alive: bool,
}

impl Target {
    /// Builds a live target at the record's position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] if the record fails
    /// [`TargetConfig::validate`].
    pub fn new(id: EntityId, config: &TargetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id,
            initial_position: config.position,
            position: config.position,
            velocity: config.velocity,
            alive: true,
        })
    }

    /// Returns the target's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the reference position restored by [`reset`](Self::reset).
    #[must_use]
    pub const fn initial_position(&self) -> DVec3 {
        self.initial_position
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    /// Returns the per-tick velocity.
    #[must_use]
    pub const fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Returns `true` until the target is destroyed.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Restores the initial position and revives the target.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.alive = true;
    }

    /// Returns the record that rebuilds this target from scratch.
    #[must_use]
    pub const fn config(&self) -> TargetConfig {
        TargetConfig::new(self.initial_position, self.velocity)
    }
}

// =============================================================================
// Interceptor
// =============================================================================

/// Blue entity whose per-tick displacement never exceeds `max_speed`.
///
/// The bound is positive and finite for every constructed interceptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interceptor {
    pub(crate) id: EntityId,
    pub(crate) launch_site_position: DVec3,
    pub(crate) position: DVec3,
    pub(crate) max_speed: f64,
    /// Last applied displacement. Display only.
    pub(crate) current_velocity: DVec3,
    pub(crate) alive: bool,
}

impl Interceptor {
    /// Builds a live interceptor sitting on its launch site.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] if the record fails
    /// [`InterceptorConfig::validate`].
    pub fn new(id: EntityId, config: &InterceptorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id,
            launch_site_position: config.position,
            position: config.position,
            max_speed: config.max_speed,
            current_velocity: DVec3::ZERO,
            alive: true,
        })
    }

    /// Returns the interceptor's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the launch site restored by [`reset`](Self::reset).
    #[must_use]
    pub const fn launch_site_position(&self) -> DVec3 {
        self.launch_site_position
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    /// Returns the per-tick speed bound.
    #[must_use]
    pub const fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Returns the displacement applied on the last tick that moved this interceptor.
    #[must_use]
    pub const fn current_velocity(&self) -> DVec3 {
        self.current_velocity
    }

    /// Returns `true` until the interceptor is destroyed.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns `true` once the interceptor is more than one unit from its launch site.
    #[must_use]
    pub fn has_launched(&self) -> bool {
        self.position.distance(self.launch_site_position) > 1.0
    }

    /// Returns the interceptor to its launch site, revives it and clears its
    /// velocity history.
    pub fn reset(&mut self) {
        self.position = self.launch_site_position;
        self.current_velocity = DVec3::ZERO;
        self.alive = true;
    }

    /// Returns the record that rebuilds this interceptor from scratch.
    #[must_use]
    pub fn config(&self) -> InterceptorConfig {
        InterceptorConfig::new(self.launch_site_position).with_max_speed(self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn interceptor_max_speed_defaults_when_absent() {
            let config: InterceptorConfig =
                serde_json::from_str(r#"{ "position": [1, 2, 3] }"#).unwrap();
            assert_eq!(config.position, DVec3::new(1.0, 2.0, 3.0));
            assert_eq!(config.max_speed, DEFAULT_MAX_SPEED);
        }

        #[test]
        fn target_requires_velocity() {
            let result: std::result::Result<TargetConfig, _> =
                serde_json::from_str(r#"{ "position": [1, 2, 3] }"#);
            assert!(result.is_err());
        }

        #[test]
        fn wrong_arity_is_rejected() {
            let result: std::result::Result<TargetConfig, _> =
                serde_json::from_str(r#"{ "position": [1, 2], "velocity": [1, 0, 0] }"#);
            assert!(result.is_err());
        }

        #[test]
        fn non_positive_max_speed_is_invalid() {
            let config = InterceptorConfig::new(DVec3::ZERO).with_max_speed(0.0);
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidScenarioData(_))
            ));

            let config = InterceptorConfig::new(DVec3::ZERO).with_max_speed(f64::NAN);
            assert!(config.validate().is_err());
        }

        #[test]
        fn misspelled_keys_are_rejected() {
            let result: std::result::Result<InterceptorConfig, _> =
                serde_json::from_str(r#"{ "position": [0, 0, 0], "max_sped": 9.0 }"#);
            assert!(result.unwrap_err().to_string().contains("max_sped"));

            let result: std::result::Result<TargetConfig, _> = serde_json::from_str(
                r#"{ "position": [0, 0, 0], "velocity": [1, 0, 0], "heading": 90 }"#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn non_finite_target_is_invalid() {
            let config = TargetConfig::new(DVec3::new(f64::INFINITY, 0.0, 0.0), DVec3::X);
            assert!(config.validate().is_err());
            assert!(TargetConfig::new(DVec3::ZERO, DVec3::X).validate().is_ok());
        }
    }

    mod target_tests {
        use super::*;

        #[test]
        fn new_target_is_alive_at_initial_position() {
            let config = TargetConfig::new(DVec3::ONE, DVec3::X);
            let t = Target::new(EntityId::new(3), &config).unwrap();
            assert_eq!(t.id(), EntityId::new(3));
            assert_eq!(t.position(), DVec3::ONE);
            assert_eq!(t.initial_position(), DVec3::ONE);
            assert!(t.is_alive());
        }

        #[test]
        fn reset_restores_reference_and_revives() {
            let config = TargetConfig::new(DVec3::ONE, DVec3::X);
            let mut t = Target::new(EntityId::new(0), &config).unwrap();
            t.position = DVec3::new(40.0, 0.0, 0.0);
            t.alive = false;

            t.reset();

            assert_eq!(t.position(), DVec3::ONE);
            assert!(t.is_alive());
            assert_eq!(t.velocity(), DVec3::X);
        }
    }

    mod interceptor_tests {
        use super::*;

        fn at_origin() -> Interceptor {
            Interceptor::new(EntityId::new(0), &InterceptorConfig::new(DVec3::ZERO)).unwrap()
        }

        #[test]
        fn invalid_speed_bound_is_never_constructed() {
            for bound in [-2.0, 0.0, f64::NAN, f64::INFINITY] {
                let config = InterceptorConfig::new(DVec3::ZERO).with_max_speed(bound);
                assert!(matches!(
                    Interceptor::new(EntityId::new(0), &config),
                    Err(EngineError::InvalidScenarioData(_))
                ));
            }
        }

        #[test]
        fn reset_clears_velocity_history() {
            let mut i = at_origin();
            i.position = DVec3::new(3.0, 0.0, 0.0);
            i.current_velocity = DVec3::new(3.0, 0.0, 0.0);
            i.alive = false;

            i.reset();

            assert_eq!(i.position(), DVec3::ZERO);
            assert_eq!(i.current_velocity(), DVec3::ZERO);
            assert!(i.is_alive());
        }

        #[test]
        fn launched_only_after_leaving_site() {
            let mut i = at_origin();
            assert!(!i.has_launched());
            i.position = DVec3::new(0.5, 0.0, 0.0);
            assert!(!i.has_launched());
            i.position = DVec3::new(1.5, 0.0, 0.0);
            assert!(i.has_launched());
        }

        #[test]
        fn config_round_trips_reference_state() {
            let config = InterceptorConfig::new(DVec3::ONE).with_max_speed(5.0);
            let mut i = Interceptor::new(EntityId::new(0), &config).unwrap();
            i.position = DVec3::new(9.0, 9.0, 9.0);
            assert_eq!(i.config(), config);
        }
    }
}
