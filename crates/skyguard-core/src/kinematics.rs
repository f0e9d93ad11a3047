//! Kinematics stepper: advances entities by one tick.
//!
//! Targets move at their constant velocity. Interceptors move along a raw
//! guidance direction whose magnitude is capped at `max_speed`, so an
//! interceptor closer than one tick's travel lands exactly on the point it was
//! steered to instead of overshooting it.
//!
//! Dead entities never move.

use glam::DVec3;
use tracing::debug;

use crate::arena::Arena;
use crate::entity::{Interceptor, Target};

/// Scales `direction` to magnitude `min(max_speed, |direction|)`.
///
/// A zero or non-finite direction yields zero.
///
/// ```
/// use skyguard_core::kinematics::clamp_to_speed;
/// use glam::DVec3;
///
/// assert_eq!(clamp_to_speed(DVec3::new(0.0, 6.0, 8.0), 5.0), DVec3::new(0.0, 3.0, 4.0));
/// assert_eq!(clamp_to_speed(DVec3::new(1.0, 0.0, 0.0), 3.0), DVec3::new(1.0, 0.0, 0.0));
/// assert_eq!(clamp_to_speed(DVec3::ZERO, 3.0), DVec3::ZERO);
/// ```
#[must_use]
pub fn clamp_to_speed(direction: DVec3, max_speed: f64) -> DVec3 {
    if !direction.is_finite() {
        return DVec3::ZERO;
    }
    let length = direction.length();
    if length <= max_speed {
        direction
    } else {
        direction * (max_speed / length)
    }
}

/// Moves a live target by its velocity.
pub fn step_target(target: &mut Target) {
    if target.alive {
        target.position += target.velocity;
    }
}

/// Moves a live interceptor along `direction` and returns the displacement
/// actually applied.
///
/// The displacement is recorded as `current_velocity` when the interceptor
/// moves. A zero direction leaves both position and `current_velocity` as
/// they were.
pub fn step_interceptor(interceptor: &mut Interceptor, direction: DVec3) -> DVec3 {
    if !interceptor.alive {
        return DVec3::ZERO;
    }
    if !direction.is_finite() {
        debug!(interceptor = %interceptor.id, "non-finite direction ignored");
        return DVec3::ZERO;
    }

    let displacement = clamp_to_speed(direction, interceptor.max_speed);
    if displacement != DVec3::ZERO {
        interceptor.position += displacement;
        interceptor.current_velocity = displacement;
    }
    displacement
}

/// Advances every target in the arena.
pub fn advance_targets(arena: &mut Arena) {
    arena.targets_mut().for_each(step_target);
}

/// Advances interceptors with index-aligned directions.
///
/// Interceptors past the end of `directions` receive a zero vector.
pub fn advance_interceptors(arena: &mut Arena, directions: &[DVec3]) {
    for (index, interceptor) in arena.interceptors_mut().enumerate() {
        let direction = directions.get(index).copied().unwrap_or(DVec3::ZERO);
        step_interceptor(interceptor, direction);
    }
}
