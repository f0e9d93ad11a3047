//! Scenario edits applied by id between runs.
//!
//! Edits change a target's velocity, an interceptor's speed bound, or remove
//! an entity. Positions are never edited: the stepper and `reset` stay the
//! only writers of position.
//!
//! Headings are horizontal (x/y plane), measured counter-clockwise from +x in
//! degrees and normalized to `[0, 360)`. Heading and speed edits keep the
//! vertical velocity component.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::error::{EngineError, Result};

// =============================================================================
// Heading helpers
// =============================================================================

/// Horizontal heading of `velocity` in `[0, 360)` degrees. Zero for a
/// vertical or zero vector.
///
/// ```
/// use skyguard_core::edit::heading_degrees;
/// use glam::DVec3;
///
/// assert_eq!(heading_degrees(DVec3::new(1.0, 0.0, 5.0)), 0.0);
/// assert!((heading_degrees(DVec3::new(0.0, -2.0, 0.0)) - 270.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn heading_degrees(velocity: DVec3) -> f64 {
    let degrees = velocity.y.atan2(velocity.x).to_degrees().rem_euclid(360.0);
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}

/// Rotates the horizontal part of `velocity` to `degrees`, keeping its
/// horizontal magnitude and `z`.
#[must_use]
pub fn velocity_from_heading(velocity: DVec3, degrees: f64) -> DVec3 {
    let horizontal = velocity.truncate().length();
    let radians = degrees.to_radians();
    DVec3::new(
        horizontal * radians.cos(),
        horizontal * radians.sin(),
        velocity.z,
    )
}

/// Rescales the horizontal part of `velocity` to `speed`, keeping its
/// heading and `z`. A vector with no horizontal part is given heading 0.
#[must_use]
pub fn velocity_from_speed(velocity: DVec3, speed: f64) -> DVec3 {
    let horizontal = velocity.truncate();
    let unit = horizontal.try_normalize().unwrap_or(glam::DVec2::X);
    (unit * speed).extend(velocity.z)
}

// =============================================================================
// Edits
// =============================================================================

/// One change to a loaded scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScenarioEdit {
    /// Replaces a target's velocity.
    SetTargetVelocity {
        /// Target id.
        id: EntityId,
        /// New per-tick velocity.
        velocity: DVec3,
    },
    /// Turns a target to a new horizontal heading.
    SetTargetHeading {
        /// Target id.
        id: EntityId,
        /// Heading in degrees.
        degrees: f64,
    },
    /// Changes a target's horizontal speed.
    SetTargetSpeed {
        /// Target id.
        id: EntityId,
        /// New horizontal speed per tick.
        speed: f64,
    },
    /// Changes an interceptor's speed bound.
    SetInterceptorMaxSpeed {
        /// Interceptor id.
        id: EntityId,
        /// New bound, positive and finite.
        max_speed: f64,
    },
    /// Deletes an entity of either kind.
    Remove {
        /// Entity id.
        id: EntityId,
    },
}

impl ScenarioEdit {
    /// Id of the entity this edit touches.
    #[must_use]
    pub fn id(&self) -> EntityId {
        match *self {
            Self::SetTargetVelocity { id, .. }
            | Self::SetTargetHeading { id, .. }
            | Self::SetTargetSpeed { id, .. }
            | Self::SetInterceptorMaxSpeed { id, .. }
            | Self::Remove { id } => id,
        }
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidScenarioData(message)
}

impl Arena {
    /// Applies one edit.
    ///
    /// The arena is unchanged when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownEntity`] if no entity of the expected kind has the id.
    /// - [`EngineError::InvalidScenarioData`] for a non-finite velocity,
    ///   heading or speed, a negative speed, or a speed bound that is not
    ///   positive and finite.
    pub fn apply_edit(&mut self, edit: &ScenarioEdit) -> Result<()> {
        let id = edit.id();
        match *edit {
            ScenarioEdit::SetTargetVelocity { velocity, .. } => {
                if !velocity.is_finite() {
                    return Err(invalid(format!("target velocity is not finite: {velocity}")));
                }
                let target = self.target_mut(id).ok_or(EngineError::UnknownEntity(id))?;
                target.velocity = velocity;
            }
            ScenarioEdit::SetTargetHeading { degrees, .. } => {
                if !degrees.is_finite() {
                    return Err(invalid(format!("heading is not finite: {degrees}")));
                }
                let target = self.target_mut(id).ok_or(EngineError::UnknownEntity(id))?;
                target.velocity = velocity_from_heading(target.velocity, degrees);
            }
            ScenarioEdit::SetTargetSpeed { speed, .. } => {
                if !(speed.is_finite() && speed >= 0.0) {
                    return Err(invalid(format!("target speed must be non-negative, got {speed}")));
                }
                let target = self.target_mut(id).ok_or(EngineError::UnknownEntity(id))?;
                target.velocity = velocity_from_speed(target.velocity, speed);
            }
            ScenarioEdit::SetInterceptorMaxSpeed { max_speed, .. } => {
                if !(max_speed.is_finite() && max_speed > 0.0) {
                    return Err(invalid(format!(
                        "interceptor max_speed must be positive and finite, got {max_speed}"
                    )));
                }
                let interceptor = self
                    .interceptor_mut(id)
                    .ok_or(EngineError::UnknownEntity(id))?;
                interceptor.max_speed = max_speed;
            }
            ScenarioEdit::Remove { .. } => {
                self.remove(id).ok_or(EngineError::UnknownEntity(id))?;
            }
        }
        debug!(entity = %id, ?edit, "scenario edit applied");
        Ok(())
    }

    /// Applies edits in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`apply_edit`](Self::apply_edit); edits
    /// before it stay applied.
    pub fn apply_edits(&mut self, edits: &[ScenarioEdit]) -> Result<()> {
        edits.iter().try_for_each(|edit| self.apply_edit(edit))
    }
}
