//! Simulation module: the tick loop.
//!
//! The `Simulation` struct drives the engagement through a deterministic
//! per-tick sequence:
//!
//! 1. **READ**: Resolve the action into one direction per interceptor. For
//!    [`Action::Guided`] this runs [`Guidance::directions`] over the arena as
//!    it stands at the start of the tick (nothing is mutated, so the work may
//!    fan out across the rayon pool).
//! 2. **MOVE**: Advance all targets, then all interceptors.
//! 3. **RESOLVE**: Run the [`KillResolver`] on post-move positions.
//! 4. **APPLY**: Evaluate termination and advance the tick counter.
//!
//! # Determinism
//!
//! Entities are iterated in id order (via `BTreeMap`) and guidance results
//! are collected in interceptor order whether or not they were computed in
//! parallel, so identical inputs always produce identical state.
//!
//! # Example
//!
//! ```
//! use skyguard_core::scenario::Scenario;
//! use skyguard_core::simulation::{Action, SimState, Simulation};
//! use glam::DVec3;
//!
//! let mut sim = Simulation::new();
//! sim.load_scenario(&Scenario::reference_engagement()).unwrap();
//! assert_eq!(sim.state(), SimState::Initialized);
//!
//! let outcome = sim.step(Action::Single(DVec3::new(0.0, 0.0, 1.0)));
//! assert_eq!(outcome.observation, [0.0, 0.0, 1.0, -49.0, -50.0, 50.0]);
//! assert_eq!(sim.tick(), 1);
//! assert_eq!(sim.state(), SimState::Running);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::arena::Arena;
use crate::config::{EngineConfig, RewardMode};
use crate::error::Result;
use crate::guidance::Guidance;
use crate::kinematics::{advance_interceptors, advance_targets};
use crate::resolver::{KillEvent, KillResolver};
use crate::scenario::Scenario;
use crate::snapshot::ArenaSnapshot;

/// First interceptor position followed by first target position.
pub type Observation = [f64; 6];

// =============================================================================
// Step types
// =============================================================================

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimState {
    /// Freshly loaded or reset; no tick has run.
    #[default]
    Initialized,
    /// At least one tick has run and a target is still alive.
    Running,
    /// Every target is dead.
    Terminated,
}

/// Steering input for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Use the built-in assignment and rendezvous guidance.
    Guided,
    /// One raw direction for the first interceptor; the rest hold position.
    Single(DVec3),
    /// Raw directions index-aligned with interceptor enumeration order.
    /// Interceptors past the end get a zero vector.
    PerInterceptor(Vec<DVec3>),
}

/// Result of one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Observation after the tick.
    pub observation: Observation,
    /// Zero, or minus the first pair's distance in
    /// [`RewardMode::NegativeDistance`].
    pub reward: f64,
    /// True once no target is alive.
    pub done: bool,
}

// =============================================================================
// Simulation
// =============================================================================

/// The engagement orchestrator.
///
/// Owns the registry, the tick counter, the termination state and the kill
/// log of the current run.
#[derive(Debug, Clone)]
pub struct Simulation {
    arena: Arena,
    config: EngineConfig,
    guidance: Guidance,
    resolver: KillResolver,
    tick: u64,
    state: SimState,
    kills: Vec<KillEvent>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty simulation with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Creates an empty simulation with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`](crate::error::EngineError::InvalidConfig)
    /// if the configuration is out of range.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            arena: Arena::new(),
            config,
            guidance: Guidance::from_config(&config),
            resolver: KillResolver::new(config.kill_threshold),
            tick: 0,
            state: SimState::Initialized,
            kills: Vec::new(),
        }
    }

    /// Replaces the registry with the scenario's entities and starts a new run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`](crate::error::EngineError::InvalidScenarioData)
    /// for an invalid scenario. The simulation is unchanged in that case.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<Observation> {
        self.arena.load_scenario(scenario)?;
        self.restart();
        Ok(self.observation())
    }

    /// Restores every entity to its reference state and zeroes the clock.
    pub fn reset(&mut self) -> Observation {
        self.arena.reset_all();
        self.restart();
        info!(
            targets = self.arena.target_count(),
            interceptors = self.arena.interceptor_count(),
            "simulation reset"
        );
        self.observation()
    }

    fn restart(&mut self) {
        self.tick = 0;
        self.state = SimState::Initialized;
        self.kills.clear();
    }

    /// Executes one tick.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let tick = self.tick;

        // READ
        let directions = self.directions_for(action);

        // MOVE
        advance_targets(&mut self.arena);
        advance_interceptors(&mut self.arena, &directions);

        // RESOLVE
        let kills = self.resolver.resolve(&mut self.arena, tick);
        self.kills.extend(kills);

        // APPLY
        let done = self.arena.live_target_count() == 0;
        self.tick += 1;
        self.update_state(done);

        trace!(
            tick,
            live_targets = self.arena.live_target_count(),
            live_interceptors = self.arena.live_interceptor_count(),
            "tick complete"
        );

        StepOutcome {
            observation: self.observation(),
            reward: self.reward(),
            done,
        }
    }

    /// Steps with [`Action::Guided`] until done or `max_ticks` ticks have run
    /// in total. Returns the tick count at termination, if reached.
    pub fn run_guided(&mut self, max_ticks: u64) -> Option<u64> {
        while self.tick < max_ticks {
            if self.step(Action::Guided).done {
                return Some(self.tick);
            }
        }
        None
    }

    fn directions_for(&self, action: Action) -> Vec<DVec3> {
        match action {
            Action::Guided => self.guidance.directions(&self.arena),
            Action::Single(direction) => vec![direction],
            Action::PerInterceptor(directions) => {
                let interceptors = self.arena.interceptor_count();
                if directions.len() > interceptors {
                    debug!(
                        supplied = directions.len(),
                        interceptors,
                        "extra action entries ignored"
                    );
                }
                directions
            }
        }
    }

    fn update_state(&mut self, done: bool) {
        if done {
            if self.state != SimState::Terminated {
                info!(
                    tick = self.tick,
                    kills = self.kills.len(),
                    "engagement terminated"
                );
            }
            self.state = SimState::Terminated;
        } else {
            self.state = SimState::Running;
        }
    }

    fn reward(&self) -> f64 {
        match self.config.reward_mode {
            RewardMode::Placeholder => 0.0,
            RewardMode::NegativeDistance => self.first_pair_distance().map_or(0.0, |d| -d),
        }
    }

    /// Distance between the first interceptor and the first target.
    #[must_use]
    pub fn first_pair_distance(&self) -> Option<f64> {
        let interceptor = self.arena.first_interceptor()?;
        let target = self.arena.first_target()?;
        Some(interceptor.position().distance(target.position()))
    }

    /// Current observation. A missing interceptor or target contributes zeros.
    #[must_use]
    pub fn observation(&self) -> Observation {
        let blue = self
            .arena
            .first_interceptor()
            .map_or(DVec3::ZERO, |i| i.position());
        let red = self.arena.first_target().map_or(DVec3::ZERO, |t| t.position());
        [blue.x, blue.y, blue.z, red.x, red.y, red.z]
    }

    /// Owned copy of the display state at the current tick.
    #[must_use]
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot::capture(&self.arena, self.tick)
    }

    /// Hash of the registry state and the tick counter.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.arena.state_hash().hash(&mut hasher);
        hasher.finish()
    }

    /// Returns a read-only reference to the registry.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns a mutable reference to the registry.
    ///
    /// Use this for spawning and scenario edits between runs, not mid-run.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the number of ticks run since the last load or reset.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Kills recorded since the last load or reset, in resolution order.
    #[must_use]
    pub fn kills(&self) -> &[KillEvent] {
        &self.kills
    }
}

// =============================================================================
// Tests
// =============================================================================
