//! Read-only snapshots for visualization collaborators.
//!
//! A snapshot is an owned copy of the registry state. Renderers consume it
//! (directly or as JSON) and have no path back to the live [`Arena`].

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::edit::heading_degrees;
use crate::entity::{EntityId, EntityKind, Interceptor, Target};

/// Display state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Red or blue.
    pub kind: EntityKind,
    /// Current position.
    pub position: DVec3,
    /// Liveness flag.
    pub alive: bool,
    /// Target velocity, or the interceptor's last applied displacement.
    pub velocity: DVec3,
    /// Interceptor speed bound; `None` for targets.
    pub max_speed: Option<f64>,
    /// Horizontal heading of `velocity` in `[0, 360)` degrees.
    pub heading_degrees: f64,
    /// Interceptors: more than one unit from the launch site. Targets: always true.
    pub launched: bool,
}

impl From<&Target> for EntitySnapshot {
    fn from(target: &Target) -> Self {
        Self {
            id: target.id(),
            kind: EntityKind::Target,
            position: target.position(),
            alive: target.is_alive(),
            velocity: target.velocity(),
            max_speed: None,
            heading_degrees: heading_degrees(target.velocity()),
            launched: true,
        }
    }
}

impl From<&Interceptor> for EntitySnapshot {
    fn from(interceptor: &Interceptor) -> Self {
        Self {
            id: interceptor.id(),
            kind: EntityKind::Interceptor,
            position: interceptor.position(),
            alive: interceptor.is_alive(),
            velocity: interceptor.current_velocity(),
            max_speed: Some(interceptor.max_speed()),
            heading_degrees: heading_degrees(interceptor.current_velocity()),
            launched: interceptor.has_launched(),
        }
    }
}

/// Display state of the whole engagement at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Targets in enumeration order.
    pub targets: Vec<EntitySnapshot>,
    /// Interceptors in enumeration order.
    pub interceptors: Vec<EntitySnapshot>,
}

impl ArenaSnapshot {
    /// Copies the arena's display state.
    #[must_use]
    pub fn capture(arena: &Arena, tick: u64) -> Self {
        Self {
            tick,
            targets: arena.targets().map(EntitySnapshot::from).collect(),
            interceptors: arena.interceptors().map(EntitySnapshot::from).collect(),
        }
    }

    /// Interceptors a renderer should draw: launched ones only.
    pub fn visible_interceptors(&self) -> impl Iterator<Item = &EntitySnapshot> + '_ {
        self.interceptors.iter().filter(|i| i.launched)
    }

    /// Looks up an entity of either kind.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.targets
            .iter()
            .chain(self.interceptors.iter())
            .find(|e| e.id == id)
    }
}
