//! Scenario persistence format and seeded scenario generation.
//!
//! A scenario is the construction record for a whole engagement:
//!
//! ```json
//! {
//!   "blue_objects": [{ "position": [0, 0, 0], "max_speed": 3.0 }],
//!   "red_objects":  [{ "position": [-50, -50, 50], "velocity": [1, 0, 0] }]
//! }
//! ```
//!
//! Both lists are required, and `max_speed` defaults to 3.0 when absent.
//! Unknown keys are rejected. Loading is all-or-nothing: any malformed record
//! fails the whole load with [`EngineError::InvalidScenarioData`].
//!
//! Floats are parsed exactly, so `to_json` followed by `from_json` gives back
//! bit-identical values.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{Interceptor, InterceptorConfig, Target, TargetConfig, DEFAULT_MAX_SPEED};
use crate::error::{EngineError, Result};

/// Persisted engagement: interceptors are blue, targets are red.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Interceptor records, in creation order.
    pub blue_objects: Vec<InterceptorConfig>,
    /// Target records, in creation order.
    pub red_objects: Vec<TargetConfig>,
}

impl Scenario {
    /// The single-pair engagement used throughout the tests: a target at
    /// `(-50, -50, 50)` flying +x at 1 unit per tick, and an interceptor at the
    /// origin with the default speed bound.
    #[must_use]
    pub fn reference_engagement() -> Self {
        Self {
            blue_objects: vec![InterceptorConfig::new(DVec3::ZERO)],
            red_objects: vec![TargetConfig::new(DVec3::new(-50.0, -50.0, 50.0), DVec3::X)],
        }
    }

    /// Parses and validates a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] for malformed JSON, a
    /// missing list, `position` or `velocity`, an unknown key, a vector that
    /// does not have exactly three components, or a record that fails
    /// validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidScenarioData(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Serializes the scenario as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] if a value cannot be
    /// represented in JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::InvalidScenarioData(e.to_string()))
    }

    /// Records the arena's entities at their reference positions.
    ///
    /// Loading the result into an empty arena reproduces the arena as it was
    /// right after its own load or reset, with the same ids.
    #[must_use]
    pub fn from_arena(arena: &Arena) -> Self {
        Self {
            blue_objects: arena.interceptors().map(Interceptor::config).collect(),
            red_objects: arena.targets().map(Target::config).collect(),
        }
    }

    /// Validates every record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScenarioData`] naming the first bad record.
    pub fn validate(&self) -> Result<()> {
        for (index, config) in self.blue_objects.iter().enumerate() {
            config
                .validate()
                .map_err(|e| with_context("blue_objects", index, e))?;
        }
        for (index, config) in self.red_objects.iter().enumerate() {
            config
                .validate()
                .map_err(|e| with_context("red_objects", index, e))?;
        }
        Ok(())
    }

    /// Number of records of both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blue_objects.len() + self.red_objects.len()
    }

    /// Returns true if the scenario has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blue_objects.is_empty() && self.red_objects.is_empty()
    }
}

fn with_context(list: &str, index: usize, err: EngineError) -> EngineError {
    match err {
        EngineError::InvalidScenarioData(message) => {
            EngineError::InvalidScenarioData(format!("{list}[{index}]: {message}"))
        }
        other => other,
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Builds random scenarios from a seed.
///
/// Targets start on a ring around the origin and fly toward it; interceptors
/// start near the origin. The same seed always yields the same scenario.
///
/// ```
/// use skyguard_core::scenario::ScenarioGenerator;
///
/// let generator = ScenarioGenerator { targets: 4, interceptors: 3, ..Default::default() };
/// let a = generator.generate(7);
/// assert_eq!(a.red_objects.len(), 4);
/// assert_eq!(a, generator.generate(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioGenerator {
    /// Number of targets.
    pub targets: usize,
    /// Number of interceptors.
    pub interceptors: usize,
    /// Horizontal distance of targets from the origin, `(min, max)`.
    pub ring_radius: (f64, f64),
    /// Target altitude, `(min, max)`.
    pub altitude: (f64, f64),
    /// Target speed per tick, `(min, max)`.
    pub target_speed: (f64, f64),
    /// Half-width of the square interceptors launch from.
    pub launch_spread: f64,
    /// Speed bound given to every interceptor.
    pub max_speed: f64,
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self {
            targets: 1,
            interceptors: 1,
            ring_radius: (60.0, 120.0),
            altitude: (20.0, 80.0),
            target_speed: (0.5, 1.5),
            launch_spread: 10.0,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

impl ScenarioGenerator {
    /// Generates a scenario from `seed`.
    #[must_use]
    pub fn generate(&self, seed: u64) -> Scenario {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let red_objects = (0..self.targets).map(|_| self.random_target(&mut rng)).collect();
        let blue_objects = (0..self.interceptors)
            .map(|_| {
                let x = sample(&mut rng, (-self.launch_spread, self.launch_spread));
                let y = sample(&mut rng, (-self.launch_spread, self.launch_spread));
                InterceptorConfig::new(DVec3::new(x, y, 0.0)).with_max_speed(self.max_speed)
            })
            .collect();

        Scenario {
            blue_objects,
            red_objects,
        }
    }

    fn random_target(&self, rng: &mut ChaCha8Rng) -> TargetConfig {
        let bearing: f64 = rng.gen_range(0.0..TAU);
        let range = sample(rng, self.ring_radius);
        let altitude = sample(rng, self.altitude);
        let speed = sample(rng, self.target_speed);

        let position = DVec3::new(range * bearing.cos(), range * bearing.sin(), altitude);
        // Inbound, level flight.
        let velocity = DVec3::new(-bearing.cos(), -bearing.sin(), 0.0) * speed;
        TargetConfig::new(position, velocity)
    }
}

/// Uniform sample in `[min, max)`; a degenerate range yields `min`.
fn sample(rng: &mut ChaCha8Rng, (min, max): (f64, f64)) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod json_tests {
        use super::*;

        #[test]
        fn reference_json_parses() {
            let scenario = Scenario::from_json(
                r#"{
                    "blue_objects": [{ "position": [0, 0, 0] }],
                    "red_objects": [{ "position": [-50, -50, 50], "velocity": [1, 0, 0] }]
                }"#,
            )
            .unwrap();
            assert_eq!(scenario, Scenario::reference_engagement());
        }

        #[test]
        fn missing_velocity_is_invalid() {
            let err = Scenario::from_json(
                r#"{ "blue_objects": [], "red_objects": [{ "position": [0, 0, 0] }] }"#,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidScenarioData(m) if m.contains("velocity")));
        }

        #[test]
        fn wrong_arity_is_invalid() {
            let err = Scenario::from_json(
                r#"{ "blue_objects": [{ "position": [0, 0] }], "red_objects": [] }"#,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidScenarioData(_)));
        }

        #[test]
        fn syntax_error_is_invalid() {
            assert!(matches!(
                Scenario::from_json("{ not json"),
                Err(EngineError::InvalidScenarioData(_))
            ));
        }

        #[test]
        fn bad_max_speed_names_the_record() {
            let err = Scenario::from_json(
                r#"{
                    "blue_objects": [
                        { "position": [0, 0, 0] },
                        { "position": [1, 0, 0], "max_speed": -2 }
                    ],
                    "red_objects": []
                }"#,
            )
            .unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidScenarioData(m) if m.starts_with("blue_objects[1]"))
            );
        }

        #[test]
        fn to_json_then_from_json_is_identity() {
            let scenario = ScenarioGenerator {
                targets: 3,
                interceptors: 2,
                ..Default::default()
            }
            .generate(11);
            let back = Scenario::from_json(&scenario.to_json().unwrap()).unwrap();
            assert_eq!(back, scenario);
        }

        #[test]
        fn generated_scenarios_reload_bit_for_bit() {
            let generator = ScenarioGenerator {
                targets: 8,
                interceptors: 8,
                ..Default::default()
            };
            for seed in 0..32 {
                let scenario = generator.generate(seed);
                let back = Scenario::from_json(&scenario.to_json().unwrap()).unwrap();
                assert_eq!(back, scenario, "seed {seed}");
            }
        }

        #[test]
        fn empty_lists_are_an_empty_scenario() {
            let scenario = Scenario::from_json(r#"{ "blue_objects": [], "red_objects": [] }"#)
                .unwrap();
            assert!(scenario.is_empty());
            assert_eq!(scenario.len(), 0);
        }

        #[test]
        fn missing_list_is_invalid() {
            let err = Scenario::from_json(r#"{ "blue_objects": [] }"#).unwrap_err();
            assert!(matches!(err, EngineError::InvalidScenarioData(m) if m.contains("red_objects")));
        }

        #[test]
        fn misspelled_keys_fail_the_whole_load() {
            let err = Scenario::from_json(
                r#"{
                    "blue_objects": [{ "position": [0, 0, 0] }],
                    "red_object": [{ "position": [5, 0, 0], "velocity": [1, 0, 0] }]
                }"#,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidScenarioData(m) if m.contains("red_object")));

            let err = Scenario::from_json(
                r#"{
                    "blue_objects": [{ "position": [0, 0, 0], "max_sped": 9.0 }],
                    "red_objects": [{ "position": [5, 0, 0], "velocity": [1, 0, 0] }]
                }"#,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidScenarioData(m) if m.contains("max_sped")));
        }
    }

    mod arena_tests {
        use super::*;
        use crate::kinematics::advance_targets;

        #[test]
        fn from_arena_uses_reference_positions() {
            let mut arena = Arena::from_scenario(&Scenario::reference_engagement()).unwrap();
            advance_targets(&mut arena);
            assert_eq!(Scenario::from_arena(&arena), Scenario::reference_engagement());
        }

        #[test]
        fn interceptors_are_created_first() {
            let arena = Arena::from_scenario(&Scenario::reference_engagement()).unwrap();
            assert_eq!(arena.first_interceptor().unwrap().id().as_u64(), 0);
            assert_eq!(arena.first_target().unwrap().id().as_u64(), 1);
        }
    }

    mod generator_tests {
        use super::*;

        #[test]
        fn different_seeds_differ() {
            let generator = ScenarioGenerator::default();
            assert_ne!(generator.generate(1), generator.generate(2));
        }

        #[test]
        fn targets_fly_inbound_within_ranges() {
            let generator = ScenarioGenerator {
                targets: 20,
                ..Default::default()
            };
            let scenario = generator.generate(5);
            for t in &scenario.red_objects {
                let horizontal = t.position.truncate().length();
                assert!(horizontal > 60.0 - 1e-9 && horizontal < 120.0 + 1e-9);
                assert!((20.0..80.0).contains(&t.position.z));
                assert!(t.velocity.truncate().dot(t.position.truncate()) < 0.0);
                assert_eq!(t.velocity.z, 0.0);
            }
            assert!(scenario.validate().is_ok());
        }

        #[test]
        fn interceptors_get_configured_speed() {
            let generator = ScenarioGenerator {
                interceptors: 5,
                max_speed: 4.5,
                ..Default::default()
            };
            assert!(generator
                .generate(0)
                .blue_objects
                .iter()
                .all(|i| i.max_speed == 4.5 && i.position.x.abs() <= 10.0));
        }
    }
}
