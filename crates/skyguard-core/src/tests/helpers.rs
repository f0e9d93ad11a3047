//! Test helper functions for setting up simulations.

use glam::DVec3;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::entity::{EntityId, InterceptorConfig, TargetConfig};
use crate::scenario::{Scenario, ScenarioGenerator};
use crate::simulation::Simulation;

/// Installs a test-writer subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Simulation loaded with the single-pair reference engagement.
pub fn reference_simulation() -> Simulation {
    simulation_with(&Scenario::reference_engagement(), EngineConfig::default())
}

/// Simulation loaded with `scenario` under `config`.
pub fn simulation_with(scenario: &Scenario, config: EngineConfig) -> Simulation {
    init_tracing();
    let mut sim = Simulation::with_config(config).unwrap();
    sim.load_scenario(scenario).unwrap();
    sim
}

/// Seeded many-on-many scenario.
pub fn random_scenario(seed: u64, targets: usize, interceptors: usize) -> Scenario {
    ScenarioGenerator {
        targets,
        interceptors,
        ..Default::default()
    }
    .generate(seed)
}

/// Spawns a target directly into the simulation's arena.
pub fn spawn_target(sim: &mut Simulation, position: DVec3, velocity: DVec3) -> EntityId {
    sim.arena_mut()
        .spawn_target(&TargetConfig::new(position, velocity))
        .unwrap()
}

/// Spawns an interceptor with the default speed bound.
pub fn spawn_interceptor(sim: &mut Simulation, position: DVec3) -> EntityId {
    sim.arena_mut()
        .spawn_interceptor(&InterceptorConfig::new(position))
        .unwrap()
}

/// Interceptor positions in enumeration order.
pub fn interceptor_positions(sim: &Simulation) -> Vec<DVec3> {
    sim.arena().interceptors().map(|i| i.position()).collect()
}
