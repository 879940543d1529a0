use crate::levels::LevelId;
use crate::metrics::MetricsError;
use crate::position::{ProviderError, Seed};
use thiserror::Error;

/// Errors surfaced by sweeps, reports and their configuration.
///
/// Every variant is fatal for the operation that raised it. Sweep failures
/// carry the strategy, seed and level needed to reproduce them.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{strategy}: metrics failed for seed {seed}{}", level_suffix(.level))]
    Metrics {
        strategy: &'static str,
        seed: Seed,
        level: Option<LevelId>,
        #[source]
        source: MetricsError,
    },

    #[error("{strategy}: provider failed for seed {seed} on level {level}")]
    ProviderFailure {
        strategy: &'static str,
        seed: Seed,
        level: LevelId,
        #[source]
        source: ProviderError,
    },

    #[error("invalid seed range [{start}, {end_exclusive}): seeds must satisfy 0 <= start < end <= 2147483647")]
    InvalidRange { start: i64, end_exclusive: i64 },

    #[error("unknown level id {0}")]
    UnknownLevel(LevelId),

    #[error("seed list line {line}: {reason}")]
    InvalidSeedList { line: usize, reason: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn level_suffix(level: &Option<LevelId>) -> String {
    match level {
        Some(id) => format!(" level {}", id),
        None => String::new(),
    }
}

impl SearchError {
    /// The underlying metrics failure, if this error came from the metrics engine.
    pub fn metrics_error(&self) -> Option<&MetricsError> {
        match self {
            SearchError::Metrics { source, .. } => Some(source),
            _ => None,
        }
    }
}
