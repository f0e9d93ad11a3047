//! Mutual-kill resolution.
//!
//! After movement, every live interceptor is checked against every live
//! target, independent of the guidance pairing. A pair closer than the
//! threshold (strict `<`) destroys both entities.
//!
//! # Invariants
//!
//! - Liveness is read before any flag is cleared: all close pairs are found
//!   first, then applied. An interceptor within range of two targets kills
//!   both in the same tick.
//! - Pairs are visited in interceptor id order, then target id order, so the
//!   returned events are deterministic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::config::DEFAULT_KILL_THRESHOLD;
use crate::entity::EntityId;

/// One mutual kill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    /// The interceptor destroyed.
    pub interceptor: EntityId,
    /// The target destroyed.
    pub target: EntityId,
    /// Post-move distance between the two.
    pub distance: f64,
    /// Tick during which the kill happened.
    pub tick: u64,
}

/// Proximity check applied once per tick.
///
/// # Example
///
/// ```
/// use skyguard_core::arena::Arena;
/// use skyguard_core::entity::{InterceptorConfig, TargetConfig};
/// use skyguard_core::resolver::KillResolver;
/// use glam::DVec3;
///
/// let mut arena = Arena::new();
/// arena.spawn_target(&TargetConfig::new(DVec3::new(0.5, 0.0, 0.0), DVec3::ZERO)).unwrap();
/// arena.spawn_interceptor(&InterceptorConfig::new(DVec3::ZERO)).unwrap();
///
/// let kills = KillResolver::default().resolve(&mut arena, 7);
/// assert_eq!(kills.len(), 1);
/// assert_eq!(arena.live_target_count(), 0);
/// assert_eq!(arena.live_interceptor_count(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillResolver {
    threshold: f64,
}

impl Default for KillResolver {
    fn default() -> Self {
        Self::new(DEFAULT_KILL_THRESHOLD)
    }
}

impl KillResolver {
    /// Creates a resolver with the given kill distance.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns the kill distance.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Finds every live pair within range without touching the arena.
    #[must_use]
    pub fn detect(&self, arena: &Arena, tick: u64) -> Vec<KillEvent> {
        let mut events = Vec::new();
        for interceptor in arena.interceptors().filter(|i| i.is_alive()) {
            for target in arena.targets().filter(|t| t.is_alive()) {
                let distance = interceptor.position().distance(target.position());
                if distance < self.threshold {
                    events.push(KillEvent {
                        interceptor: interceptor.id(),
                        target: target.id(),
                        distance,
                        tick,
                    });
                }
            }
        }
        events
    }

    /// Detects close pairs, then marks both sides of each pair dead.
    pub fn resolve(&self, arena: &mut Arena, tick: u64) -> Vec<KillEvent> {
        let events = self.detect(arena, tick);

        for event in &events {
            if let Some(interceptor) = arena.interceptor_mut(event.interceptor) {
                interceptor.alive = false;
            }
            if let Some(target) = arena.target_mut(event.target) {
                target.alive = false;
            }
            debug!(
                interceptor = %event.interceptor,
                target = %event.target,
                distance = event.distance,
                tick,
                "mutual kill"
            );
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{InterceptorConfig, TargetConfig};
    use glam::DVec3;

    fn arena_with(targets: &[DVec3], interceptors: &[DVec3]) -> Arena {
        let mut arena = Arena::new();
        for p in targets {
            arena.spawn_target(&TargetConfig::new(*p, DVec3::ZERO)).unwrap();
        }
        for p in interceptors {
            arena.spawn_interceptor(&InterceptorConfig::new(*p)).unwrap();
        }
        arena
    }

    #[test]
    fn threshold_is_strict() {
        let mut arena = arena_with(&[DVec3::new(1.0, 0.0, 0.0)], &[DVec3::ZERO]);
        assert!(KillResolver::default().resolve(&mut arena, 0).is_empty());
        assert_eq!(arena.live_target_count(), 1);
        assert_eq!(arena.live_interceptor_count(), 1);
    }

    #[test]
    fn kill_is_mutual() {
        let mut arena = arena_with(&[DVec3::new(0.0, 0.9, 0.0)], &[DVec3::ZERO]);
        let events = KillResolver::default().resolve(&mut arena, 12);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tick, 12);
        assert!((events[0].distance - 0.9).abs() < 1e-12);
        assert!(arena.targets().all(|t| !t.is_alive()));
        assert!(arena.interceptors().all(|i| !i.is_alive()));
    }

    #[test]
    fn any_close_pair_kills_not_only_assigned_ones() {
        // Two interceptors near the same target: both die with it.
        let mut arena = arena_with(
            &[DVec3::ZERO, DVec3::new(50.0, 0.0, 0.0)],
            &[DVec3::new(0.5, 0.0, 0.0), DVec3::new(-0.5, 0.0, 0.0)],
        );
        let events = KillResolver::default().resolve(&mut arena, 0);
        assert_eq!(events.len(), 2);
        assert_eq!(arena.live_interceptor_count(), 0);
        assert_eq!(arena.live_target_count(), 1);
    }

    #[test]
    fn one_interceptor_can_kill_two_targets() {
        let mut arena = arena_with(
            &[DVec3::new(0.4, 0.0, 0.0), DVec3::new(-0.4, 0.0, 0.0)],
            &[DVec3::ZERO],
        );
        let events = KillResolver::default().resolve(&mut arena, 0);
        assert_eq!(events.len(), 2);
        assert_eq!(arena.live_target_count(), 0);
    }

    #[test]
    fn dead_entities_are_ignored() {
        let mut arena = arena_with(&[DVec3::ZERO], &[DVec3::ZERO]);
        let id = arena.first_target().unwrap().id();
        arena.target_mut(id).unwrap().alive = false;

        assert!(KillResolver::default().resolve(&mut arena, 0).is_empty());
        assert_eq!(arena.live_interceptor_count(), 1);
    }

    #[test]
    fn custom_threshold() {
        let arena = arena_with(&[DVec3::new(4.0, 0.0, 0.0)], &[DVec3::ZERO]);
        assert!(KillResolver::default().detect(&arena, 0).is_empty());
        assert_eq!(KillResolver::new(5.0).detect(&arena, 0).len(), 1);
    }
}
