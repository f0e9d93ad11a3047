//! Rendezvous-point guidance.
//!
//! For an interceptor chasing a target, guidance predicts the target's path and
//! looks for the waypoint where both arrive at about the same time. For each
//! waypoint `i`:
//!
//! ```text
//! t_target[i]      = i                                  (ticks, see prediction)
//! t_interceptor[i] = |waypoint[i] - position| / max_speed
//! score[i]         = |t_interceptor[i] - t_target[i]|
//! ```
//!
//! The first waypoint with the strictly smallest score is the rendezvous point,
//! so on equal scores the earlier meeting wins. The returned direction is the
//! raw offset to that point; capping it to the speed bound is the stepper's job.
//!
//! # Read phase
//!
//! [`Guidance::directions`] only reads the arena. With `parallel` set it fans
//! out across interceptors with rayon; the result order is the interceptor
//! enumeration order either way.

use std::collections::HashMap;

use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arena::Arena;
use crate::assignment::assign;
use crate::config::EngineConfig;
use crate::entity::{EntityId, Interceptor, Target};
use crate::prediction::{time_to_reach, MotionModel, Waypoint, DEFAULT_HORIZON};

/// The waypoint picked as the meeting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rendezvous {
    /// Index into the predicted trajectory.
    pub index: usize,
    /// Position of the chosen waypoint.
    pub point: DVec3,
    /// Arrival-time mismatch at that waypoint, in ticks.
    pub score: f64,
}

/// Picks the waypoint with the smallest arrival-time mismatch.
///
/// Returns `None` for an empty trajectory.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn select_rendezvous(
    position: DVec3,
    max_speed: f64,
    trajectory: &[Waypoint],
) -> Option<Rendezvous> {
    let mut best: Option<Rendezvous> = None;
    for (index, waypoint) in trajectory.iter().enumerate() {
        let t_interceptor = time_to_reach(position, max_speed, waypoint.position);
        let score = (t_interceptor - waypoint.time_index as f64).abs();
        if best.map_or(true, |b| score < b.score) {
            best = Some(Rendezvous {
                index,
                point: waypoint.position,
                score,
            });
        }
    }
    best
}

/// Direction for `interceptor` to fly toward its rendezvous with `target`,
/// using the default 30-waypoint constant-velocity prediction.
#[must_use]
pub fn compute_direction(interceptor: &Interceptor, target: &Target) -> DVec3 {
    Guidance::default().direction(interceptor, target)
}

/// Guidance parameters and the per-tick read phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guidance {
    horizon: usize,
    model: MotionModel,
    parallel: bool,
}

impl Default for Guidance {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            model: MotionModel::ConstantVelocity,
            parallel: true,
        }
    }
}

impl Guidance {
    /// Builds guidance from the engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            horizon: config.horizon,
            model: config.motion_model,
            parallel: config.parallel_guidance,
        }
    }

    /// Returns the prediction horizon.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// Finds the rendezvous point of `interceptor` on `target`'s predicted path.
    #[must_use]
    pub fn rendezvous(&self, interceptor: &Interceptor, target: &Target) -> Option<Rendezvous> {
        let trajectory = self
            .model
            .predict(target.position(), target.velocity(), self.horizon);
        let chosen = select_rendezvous(interceptor.position(), interceptor.max_speed(), &trajectory);
        if let Some(r) = chosen {
            trace!(
                interceptor = %interceptor.id(),
                target = %target.id(),
                index = r.index,
                score = r.score,
                "rendezvous selected"
            );
        }
        chosen
    }

    /// Unnormalized offset from the interceptor to its rendezvous point.
    ///
    /// Zero when the horizon is empty.
    #[must_use]
    pub fn direction(&self, interceptor: &Interceptor, target: &Target) -> DVec3 {
        self.rendezvous(interceptor, target)
            .map_or(DVec3::ZERO, |r| r.point - interceptor.position())
    }

    /// Computes one direction per interceptor, in arena enumeration order.
    ///
    /// Live interceptors are paired with live targets via
    /// [`assign`](crate::assignment::assign). Dead or unpaired interceptors get
    /// a zero vector.
    #[must_use]
    pub fn directions(&self, arena: &Arena) -> Vec<DVec3> {
        let live_targets: Vec<&Target> = arena.targets().filter(|t| t.is_alive()).collect();
        let live_interceptors: Vec<&Interceptor> =
            arena.interceptors().filter(|i| i.is_alive()).collect();

        let pairing: HashMap<EntityId, EntityId> = assign(&live_targets, &live_interceptors)
            .into_iter()
            .map(|a| (a.interceptor, a.target))
            .collect();

        let all: Vec<&Interceptor> = arena.interceptors().collect();
        let direction_for = |interceptor: &&Interceptor| -> DVec3 {
            pairing
                .get(&interceptor.id())
                .and_then(|target_id| arena.target(*target_id))
                .map_or(DVec3::ZERO, |target| self.direction(interceptor, target))
        };

        if self.parallel {
            all.par_iter().map(direction_for).collect()
        } else {
            all.iter().map(direction_for).collect()
        }
    }
}
