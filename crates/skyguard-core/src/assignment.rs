//! Interceptor-to-target assignment.
//!
//! Each interceptor is paired with the target nearest to it. The lookup runs per
//! interceptor column of a target-by-interceptor distance matrix and is **not**
//! an exclusive matching: several interceptors may be sent after the same
//! target while another target goes unpursued.
//!
//! Only the first `min(targets, interceptors)` interceptors, in the order
//! given, receive a pairing.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Interceptor, Target};

/// One interceptor sent after one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// The pursuing interceptor.
    pub interceptor: EntityId,
    /// The target it pursues.
    pub target: EntityId,
}

/// Euclidean distances with one row per target and one column per interceptor.
#[must_use]
pub fn distance_matrix(targets: &[DVec3], interceptors: &[DVec3]) -> Vec<Vec<f64>> {
    targets
        .iter()
        .map(|t| interceptors.iter().map(|i| t.distance(*i)).collect())
        .collect()
}

/// Row index of the smallest entry in `column`; the first row wins ties.
fn nearest_row(matrix: &[Vec<f64>], column: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (row, distances) in matrix.iter().enumerate() {
        let d = distances[column];
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((row, d)),
        }
    }
    best.map(|(row, _)| row)
}

/// Pairs interceptors with their nearest targets.
///
/// Returns `min(targets.len(), interceptors.len())` pairs in interceptor order.
///
/// # Example
///
/// ```
/// use skyguard_core::assignment::assign;
/// use skyguard_core::entity::{IdAllocator, Interceptor, InterceptorConfig, Target, TargetConfig};
/// use glam::DVec3;
///
/// let mut ids = IdAllocator::new();
/// let parked = |x: f64| TargetConfig::new(DVec3::new(x, 0.0, 0.0), DVec3::ZERO);
/// let near = Target::new(ids.allocate(), &parked(1.0))?;
/// let far = Target::new(ids.allocate(), &parked(90.0))?;
/// let a = Interceptor::new(ids.allocate(), &InterceptorConfig::new(DVec3::Y))?;
/// let b = Interceptor::new(ids.allocate(), &InterceptorConfig::new(DVec3::NEG_Y))?;
///
/// let pairs = assign(&[&near, &far], &[&a, &b]);
/// assert_eq!(pairs.len(), 2);
/// assert!(pairs.iter().all(|p| p.target == near.id()));
/// # Ok::<(), skyguard_core::EngineError>(())
/// ```
#[must_use]
pub fn assign(targets: &[&Target], interceptors: &[&Interceptor]) -> Vec<Assignment> {
    let matched = targets.len().min(interceptors.len());
    if matched == 0 {
        return Vec::new();
    }

    let target_positions: Vec<DVec3> = targets.iter().map(|t| t.position()).collect();
    let interceptor_positions: Vec<DVec3> = interceptors.iter().map(|i| i.position()).collect();
    let matrix = distance_matrix(&target_positions, &interceptor_positions);

    interceptors
        .iter()
        .take(matched)
        .enumerate()
        .filter_map(|(column, interceptor)| {
            nearest_row(&matrix, column).map(|row| Assignment {
                interceptor: interceptor.id(),
                target: targets[row].id(),
            })
        })
        .collect()
}
