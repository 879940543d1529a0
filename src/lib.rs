pub mod defaults;
pub mod error;
pub mod layout_table; // File-backed position provider (seed,level,x,y,z rows)
pub mod levels; // Level catalog (main stages, names, short codes)
pub mod metrics; // Pairwise-distance statistics per level and per seed
pub mod position;
pub mod report; // Single-seed breakdown and batch statistics over a seed list
pub mod search; // Seed-range sweeps (full export, running best, threshold, single level)
pub mod search_opt;
pub mod utils;

pub use error::SearchError;
pub use levels::{LevelCatalog, LevelId};
pub use metrics::{DispersionMetrics, LevelMetrics, MetricsError, SeedMetrics};
pub use position::{Position, PositionProvider, ProviderError, Seed};
pub use search::{SeedRange, Strategy, SweepSummary};
pub use search_opt::SearchOpt;
