// Dispersion metrics
//
// Pairwise-distance statistics for one level's collectibles, and the
// unweighted mean of those statistics across the levels of a seed.
// Pure functions: no I/O, no shared state.

use crate::position::Position;
use thiserror::Error;

#[path = "metrics_test.rs"]
mod metrics_test;

/// Nearest, furthest and mean pairwise distance.
///
/// For a single level these come straight from the pair distances; for a
/// seed they are the field-wise mean over the evaluated levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DispersionMetrics {
    pub nearest: f32,
    pub furthest: f32,
    pub average: f32,
}

pub type LevelMetrics = DispersionMetrics;
pub type SeedMetrics = DispersionMetrics;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("need at least 2 positions to measure distances, got {count}")]
    InsufficientPositions { count: usize },

    #[error("no levels evaluated")]
    NoLevelsEvaluated,

    #[error("non-finite distance between positions {first} and {second}")]
    NonFiniteDistance { first: usize, second: usize },
}

/// Minimum, maximum and mean over all `n*(n-1)/2` unordered pair distances.
///
/// Distances are single precision; the running total is kept in `f64` and
/// the mean rounded back to `f32` once, so `nearest <= average <= furthest`
/// holds exactly. A NaN or infinite pair distance is an error.
pub fn distance_metrics(positions: &[Position]) -> Result<LevelMetrics, MetricsError> {
    let n = positions.len();
    if n < 2 {
        return Err(MetricsError::InsufficientPositions { count: n });
    }

    let mut nearest = f32::MAX;
    let mut furthest = 0.0f32;
    let mut total = 0.0f64;
    let mut pairs = 0usize;

    for (i, a) in positions.iter().enumerate() {
        for (j, b) in positions.iter().enumerate().skip(i + 1) {
            let d = a.distance(b);
            if !d.is_finite() {
                return Err(MetricsError::NonFiniteDistance { first: i, second: j });
            }
            total += d as f64;
            pairs += 1;
            if d > furthest {
                furthest = d;
            }
            if d < nearest {
                nearest = d;
            }
        }
    }

    Ok(LevelMetrics {
        nearest,
        furthest,
        average: (total / pairs as f64) as f32,
    })
}

/// Field-wise arithmetic mean of per-level metrics.
pub fn aggregate(per_level: &[LevelMetrics]) -> Result<SeedMetrics, MetricsError> {
    if per_level.is_empty() {
        return Err(MetricsError::NoLevelsEvaluated);
    }

    let (mut nearest, mut furthest, mut average) = (0.0f64, 0.0f64, 0.0f64);
    for m in per_level {
        nearest += m.nearest as f64;
        furthest += m.furthest as f64;
        average += m.average as f64;
    }
    let k = per_level.len() as f64;

    Ok(SeedMetrics {
        nearest: (nearest / k) as f32,
        furthest: (furthest / k) as f32,
        average: (average / k) as f32,
    })
}
