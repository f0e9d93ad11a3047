//! Arena module: the entity registry.
//!
//! The Arena owns every target and interceptor of an engagement. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle (spawn, reset, wholesale replacement on scenario load)
//! - The id counter used for every entity construction
//! - A state hash for determinism checks
//!
//! # Enumeration order
//!
//! Ids are monotonically increasing, so iterating either population yields
//! creation order. Per-interceptor action vectors are index-aligned with
//! [`Arena::interceptors`].
//!
//! # Lifecycle
//!
//! Entities are never removed during a run, only marked dead. Removal is a
//! scenario edit (see [`crate::edit`]) and loading a scenario replaces the
//! registry contents, including the id counter.
//!
//! # Example
//!
//! ```
//! use skyguard_core::arena::Arena;
//! use skyguard_core::entity::{InterceptorConfig, TargetConfig};
//! use glam::DVec3;
//!
//! let mut arena = Arena::new();
//! let red = arena
//!     .spawn_target(&TargetConfig::new(DVec3::new(-50.0, -50.0, 50.0), DVec3::X))
//!     .unwrap();
//! let blue = arena.spawn_interceptor(&InterceptorConfig::new(DVec3::ZERO)).unwrap();
//!
//! assert!(red < blue);
//! assert!(arena
//!     .spawn_interceptor(&InterceptorConfig::new(DVec3::ZERO).with_max_speed(-1.0))
//!     .is_err());
//! assert_eq!(arena.live_target_count(), 1);
//! assert_eq!(arena.interceptor(blue).unwrap().max_speed(), 3.0);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use serde::Serialize;
use tracing::info;

use crate::entity::{
    EntityId, EntityKind, IdAllocator, Interceptor, InterceptorConfig, Target, TargetConfig,
};
use crate::error::Result;
use crate::scenario::Scenario;

/// Registry of all targets and interceptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arena {
    /// Shared id counter for both populations.
    ids: IdAllocator,
    /// Red entities in id order.
    targets: BTreeMap<EntityId, Target>,
    /// Blue entities in id order.
    interceptors: BTreeMap<EntityId, Interceptor>,
}

impl Arena {
    /// Creates an empty arena whose first id is 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an arena from a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`](crate::error::EngineError::InvalidScenarioData)
    /// if any record is invalid.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut arena = Self::new();
        arena.load_scenario(scenario)?;
        Ok(arena)
    }

    /// Replaces the whole registry with the scenario's entities.
    ///
    /// Interceptors (`blue_objects`) are created before targets
    /// (`red_objects`), each in record order, from a fresh id counter. The
    /// scenario is validated first; on error the arena is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`](crate::error::EngineError::InvalidScenarioData)
    /// if any record is invalid.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<()> {
        scenario.validate()?;

        let mut next = Self::new();
        for config in &scenario.blue_objects {
            next.spawn_interceptor(config)?;
        }
        for config in &scenario.red_objects {
            next.spawn_target(config)?;
        }
        *self = next;

        info!(
            targets = self.targets.len(),
            interceptors = self.interceptors.len(),
            "scenario loaded"
        );
        Ok(())
    }

    /// Removes every entity and restarts the id counter.
    pub fn clear(&mut self) {
        self.ids = IdAllocator::new();
        self.targets.clear();
        self.interceptors.clear();
    }

    /// Adds a live target and returns its id.
    ///
    /// No id is consumed when the record is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`](crate::error::EngineError::InvalidScenarioData)
    /// for a non-finite position or velocity.
    pub fn spawn_target(&mut self, config: &TargetConfig) -> Result<EntityId> {
        let target = Target::new(self.ids.peek(), config)?;
        let id = self.ids.allocate();
        self.targets.insert(id, target);
        Ok(id)
    }

    /// Adds a live interceptor on its launch site and returns its id.
    ///
    /// No id is consumed when the record is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`](crate::error::EngineError::InvalidScenarioData)
    /// for a non-finite position or a speed bound that is not positive and finite.
    pub fn spawn_interceptor(&mut self, config: &InterceptorConfig) -> Result<EntityId> {
        let interceptor = Interceptor::new(self.ids.peek(), config)?;
        let id = self.ids.allocate();
        self.interceptors.insert(id, interceptor);
        Ok(id)
    }

    /// Removes an entity of either kind, returning which kind it was.
    pub fn remove(&mut self, id: EntityId) -> Option<EntityKind> {
        if self.targets.remove(&id).is_some() {
            Some(EntityKind::Target)
        } else if self.interceptors.remove(&id).is_some() {
            Some(EntityKind::Interceptor)
        } else {
            None
        }
    }

    /// Returns which population holds `id`.
    #[must_use]
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.targets.contains_key(&id) {
            Some(EntityKind::Target)
        } else if self.interceptors.contains_key(&id) {
            Some(EntityKind::Interceptor)
        } else {
            None
        }
    }

    /// Returns a target by id.
    #[must_use]
    pub fn target(&self, id: EntityId) -> Option<&Target> {
        self.targets.get(&id)
    }

    /// Returns a mutable target by id.
    pub fn target_mut(&mut self, id: EntityId) -> Option<&mut Target> {
        self.targets.get_mut(&id)
    }

    /// Returns an interceptor by id.
    #[must_use]
    pub fn interceptor(&self, id: EntityId) -> Option<&Interceptor> {
        self.interceptors.get(&id)
    }

    /// Returns a mutable interceptor by id.
    pub fn interceptor_mut(&mut self, id: EntityId) -> Option<&mut Interceptor> {
        self.interceptors.get_mut(&id)
    }

    /// Iterates targets in id order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> + '_ {
        self.targets.values()
    }

    /// Iterates interceptors in id order.
    pub fn interceptors(&self) -> impl Iterator<Item = &Interceptor> + '_ {
        self.interceptors.values()
    }

    pub(crate) fn targets_mut(&mut self) -> impl Iterator<Item = &mut Target> + '_ {
        self.targets.values_mut()
    }

    pub(crate) fn interceptors_mut(&mut self) -> impl Iterator<Item = &mut Interceptor> + '_ {
        self.interceptors.values_mut()
    }

    /// Returns the first target in enumeration order.
    #[must_use]
    pub fn first_target(&self) -> Option<&Target> {
        self.targets.values().next()
    }

    /// Returns the first interceptor in enumeration order.
    #[must_use]
    pub fn first_interceptor(&self) -> Option<&Interceptor> {
        self.interceptors.values().next()
    }

    /// Number of targets, dead or alive.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of interceptors, dead or alive.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Number of targets still alive.
    #[must_use]
    pub fn live_target_count(&self) -> usize {
        self.targets.values().filter(|t| t.is_alive()).count()
    }

    /// Number of interceptors still alive.
    #[must_use]
    pub fn live_interceptor_count(&self) -> usize {
        self.interceptors.values().filter(|i| i.is_alive()).count()
    }

    /// Returns true if the arena holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.interceptors.is_empty()
    }

    /// Resets every entity to its reference position and revives it.
    pub fn reset_all(&mut self) {
        self.targets_mut().for_each(Target::reset);
        self.interceptors_mut().for_each(Interceptor::reset);
    }

    /// Deterministic hash of the dynamic state of every entity.
    ///
    /// Floats are hashed by bit pattern, so two arenas hash equal only if
    /// their positions are bit-identical.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.targets.len().hash(&mut hasher);
        for target in self.targets.values() {
            target.id().hash(&mut hasher);
            hash_vec(target.position(), &mut hasher);
            hash_vec(target.velocity(), &mut hasher);
            target.is_alive().hash(&mut hasher);
        }

        self.interceptors.len().hash(&mut hasher);
        for interceptor in self.interceptors.values() {
            interceptor.id().hash(&mut hasher);
            hash_vec(interceptor.position(), &mut hasher);
            hash_vec(interceptor.current_velocity(), &mut hasher);
            interceptor.max_speed().to_bits().hash(&mut hasher);
            interceptor.is_alive().hash(&mut hasher);
        }

        hasher.finish()
    }
}

fn hash_vec<H: Hasher>(v: DVec3, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
    v.z.to_bits().hash(hasher);
}
