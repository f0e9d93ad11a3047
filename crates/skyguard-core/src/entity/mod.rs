//! Entity module for the engagement engine.
//!
//! This module provides the core entity types:
//! - [`EntityId`]: Unique identifier shared by targets and interceptors
//! - [`EntityKind`]: Red/blue classification used by snapshots and edits
//! - [`IdAllocator`]: Explicit id counter owned by the scenario-building context
//! - [`Target`] and [`Interceptor`]: The two concrete entity types
//!
//! # Identity
//!
//! Ids come from a single monotonically increasing counter. Targets and
//! interceptors draw from the same counter, so creation order is total and
//! the id order of each population matches its creation order. The counter is
//! an ordinary value threaded through entity creation, never process-wide state.
//!
//! # Example
//!
//! ```
//! use skyguard_core::entity::{IdAllocator, Target, TargetConfig};
//! use glam::DVec3;
//!
//! let mut ids = IdAllocator::new();
//! let target = Target::new(
//!     ids.allocate(),
//!     &TargetConfig::new(DVec3::new(-50.0, -50.0, 50.0), DVec3::X),
//! )
//! .unwrap();
//!
//! assert_eq!(target.id().as_u64(), 0);
//! assert!(target.is_alive());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    Interceptor, InterceptorConfig, Target, TargetConfig, DEFAULT_MAX_SPEED,
};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Ids are immutable once
/// assigned and unique within an arena.
///
/// # Ordering
///
/// Ids are ordered by their numeric value, which is also creation order. The
/// arena iterates in this order, which defines how action vectors line up with
/// interceptors.
///
/// # Example
///
/// ```
/// use skyguard_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Which side of the engagement an entity belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Red entity moving at constant velocity until destroyed.
    Target,
    /// Blue entity pursuing targets under a per-tick speed bound.
    Interceptor,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => write!(f, "Target"),
            Self::Interceptor => write!(f, "Interceptor"),
        }
    }
}

/// Monotonic id counter.
///
/// One allocator serves both populations. Cloning an allocator and replaying
/// the same construction calls yields the same ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the next id and advances the counter.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next += 1;
        id
    }

    /// Returns the id the next call to [`allocate`](Self::allocate) will hand out.
    #[must_use]
    pub const fn peek(&self) -> EntityId {
        EntityId::new(self.next)
    }
}
