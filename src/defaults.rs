// src/defaults.rs

// Sweep Constants
pub const PROGRESS_INTERVAL: u32 = 1000;
pub const BATCH_SIZE: usize = 4096;
pub const VERBOSITY: i32 = 3;

// Seed Domain
pub const MIN_SEED: i64 = 0;
pub const MAX_SEED: i64 = i32::MAX as i64;

// Output Files
pub const RANGE_OUTPUT: &str = "chaos_data.csv";
pub const LEVEL_OUTPUT_PREFIX: &str = "chaos_data_for_";
pub const SEED_REPORT_PREFIX: &str = "chaos_data_";
