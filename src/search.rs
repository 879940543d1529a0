// Seed-space search
//
// Sweeps a seed range under one of four strategies and streams accepted rows
// to a sink as they are decided.
//
// # Pipeline
//
// ```text
// [seed batch] → evaluate (rayon, per seed) → accept/format (sequential, seed order) → [CSV sink]
// ```
//
// Evaluation is pure and runs in parallel. Acceptance, the running-best
// watermark, progress lines and row writes are applied strictly in
// ascending seed order, so output is identical for any thread count.

use crate::defaults;
use crate::error::SearchError;
use crate::levels::{LevelCatalog, LevelId};
use crate::metrics::{self, DispersionMetrics, LevelMetrics};
use crate::position::{PositionProvider, Seed};
use crate::search_opt::SearchOpt;
use rayon::prelude::*;
use std::io::Write;
use std::time::{Duration, Instant};

/// Half-open seed interval `[start, end_exclusive)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRange {
    start: Seed,
    end_exclusive: Seed,
}

impl SeedRange {
    /// Validate bounds against the seed domain `[0, 2^31 - 1]`.
    pub fn new(start: i64, end_exclusive: i64) -> Result<Self, SearchError> {
        let in_domain = |v: i64| (defaults::MIN_SEED..=defaults::MAX_SEED).contains(&v);
        if !in_domain(start) || !in_domain(end_exclusive) || start >= end_exclusive {
            return Err(SearchError::InvalidRange {
                start,
                end_exclusive,
            });
        }
        Ok(Self {
            start: start as Seed,
            end_exclusive: end_exclusive as Seed,
        })
    }

    /// Check a lone seed against the seed domain.
    pub fn checked_seed(seed: i64) -> Result<Seed, SearchError> {
        if (defaults::MIN_SEED..=defaults::MAX_SEED).contains(&seed) {
            Ok(seed as Seed)
        } else {
            Err(SearchError::InvalidRange {
                start: seed,
                end_exclusive: seed.saturating_add(1),
            })
        }
    }

    pub fn start(&self) -> Seed {
        self.start
    }

    pub fn end_exclusive(&self) -> Seed {
        self.end_exclusive
    }

    /// Number of seeds in the range (never zero).
    pub fn count(&self) -> u64 {
        (self.end_exclusive as i64 - self.start as i64) as u64
    }

    pub fn seeds(&self) -> std::ops::Range<Seed> {
        self.start..self.end_exclusive
    }
}

/// How a sweep decides which seeds to keep and what to write for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Every seed, overall metrics across the main stages.
    FullExport,
    /// Seeds whose overall average strictly improves on every earlier accepted seed.
    RunningBest,
    /// Seeds whose overall average is strictly below `threshold`.
    ThresholdFilter { threshold: f32 },
    /// Every seed, metrics for one level only.
    SingleLevelExport { level: LevelId },
}

/// Outcome of one accept decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub accepted: bool,
    /// Watermark to carry into the next seed.
    pub best: Option<f32>,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FullExport => "full-export",
            Strategy::RunningBest => "running-best",
            Strategy::ThresholdFilter { .. } => "threshold-filter",
            Strategy::SingleLevelExport { .. } => "single-level-export",
        }
    }

    /// Levels evaluated per seed.
    pub fn level_set(&self, catalog: &LevelCatalog) -> Result<Vec<LevelId>, SearchError> {
        match self {
            Strategy::SingleLevelExport { level } => {
                catalog.get(*level)?;
                Ok(vec![*level])
            }
            _ => Ok(catalog.main_stages().collect()),
        }
    }

    /// CSV header written before the first row.
    pub fn header(&self, catalog: &LevelCatalog) -> Result<String, SearchError> {
        match self {
            Strategy::SingleLevelExport { level } => {
                let code = catalog.code(*level)?;
                Ok(format!(
                    "Seed,Closest for {code},Furthest for {code},Average for {code}"
                ))
            }
            _ => Ok("Seed,Closest,Furthest,Average".to_string()),
        }
    }

    /// Accept rule. `best` is the running-best watermark threaded through
    /// the sweep; only `RunningBest` reads or moves it.
    pub fn decide(&self, best: Option<f32>, metrics: &DispersionMetrics) -> Decision {
        match self {
            Strategy::FullExport | Strategy::SingleLevelExport { .. } => Decision {
                accepted: true,
                best,
            },
            Strategy::RunningBest => {
                let improves = best.map_or(true, |b| metrics.average < b);
                Decision {
                    accepted: improves,
                    best: if improves { Some(metrics.average) } else { best },
                }
            }
            Strategy::ThresholdFilter { threshold } => Decision {
                accepted: metrics.average < *threshold,
                best,
            },
        }
    }

    pub fn format_row(&self, seed: Seed, metrics: &DispersionMetrics) -> String {
        format!(
            "{},{},{},{}",
            seed, metrics.nearest, metrics.furthest, metrics.average
        )
    }
}

/// Totals reported when a sweep finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub seeds_evaluated: u64,
    pub rows_written: u64,
    /// Lowest overall average seen, first seed wins ties.
    pub best: Option<(Seed, f32)>,
    pub elapsed: Duration,
}

/// Metrics for every level of `levels`, in order.
pub fn evaluate_levels<P: PositionProvider + ?Sized>(
    provider: &P,
    seed: Seed,
    levels: &[LevelId],
    strategy: &'static str,
) -> Result<Vec<LevelMetrics>, SearchError> {
    levels
        .iter()
        .map(|&level| {
            let positions =
                provider
                    .positions(seed, level)
                    .map_err(|source| SearchError::ProviderFailure {
                        strategy,
                        seed,
                        level,
                        source,
                    })?;
            metrics::distance_metrics(&positions).map_err(|source| SearchError::Metrics {
                strategy,
                seed,
                level: Some(level),
                source,
            })
        })
        .collect()
}

/// Metrics a strategy judges a seed by: the single level's metrics for a
/// one-level set, otherwise the aggregate over all levels.
fn evaluate_seed<P: PositionProvider + ?Sized>(
    provider: &P,
    seed: Seed,
    levels: &[LevelId],
    strategy: &Strategy,
) -> Result<DispersionMetrics, SearchError> {
    let per_level = evaluate_levels(provider, seed, levels, strategy.name())?;
    match strategy {
        Strategy::SingleLevelExport { .. } => Ok(per_level[0]),
        _ => metrics::aggregate(&per_level).map_err(|source| SearchError::Metrics {
            strategy: strategy.name(),
            seed,
            level: None,
            source,
        }),
    }
}

/// Run a sweep, writing the header and every accepted row to `sink`.
///
/// The sink is flushed before returning, on success and on error. On error
/// every row for seeds below the failing seed has already been written.
pub fn run_sweep<P, W>(
    strategy: &Strategy,
    range: SeedRange,
    provider: &P,
    catalog: &LevelCatalog,
    opt: &SearchOpt,
    sink: &mut W,
) -> Result<SweepSummary, SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    let result = sweep(strategy, range, provider, catalog, opt, sink);
    let flushed = sink.flush();
    let summary = result?;
    flushed?;
    Ok(summary)
}

fn sweep<P, W>(
    strategy: &Strategy,
    range: SeedRange,
    provider: &P,
    catalog: &LevelCatalog,
    opt: &SearchOpt,
    sink: &mut W,
) -> Result<SweepSummary, SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    opt.validate()?;
    let levels = strategy.level_set(catalog)?;
    if levels.is_empty() {
        return Err(SearchError::Metrics {
            strategy: strategy.name(),
            seed: range.start(),
            level: None,
            source: metrics::MetricsError::NoLevelsEvaluated,
        });
    }

    writeln!(sink, "{}", strategy.header(catalog)?)?;

    log::info!(
        "{}: sweeping seeds [{}, {}) over {} level(s)",
        strategy.name(),
        range.start(),
        range.end_exclusive(),
        levels.len()
    );
    log::debug!(
        "{}: batch_size={} seeds, {} rayon threads",
        strategy.name(),
        opt.batch_size,
        rayon::current_num_threads()
    );

    let start_time = Instant::now();
    let mut tally = Tally::default();
    let result = sweep_batches(strategy, range, provider, &levels, opt, sink, &mut tally);

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => log::info!(
            "{}: evaluated {} seeds, wrote {} rows in {:.3} sec",
            strategy.name(),
            tally.seeds_evaluated,
            tally.rows_written,
            elapsed.as_secs_f64()
        ),
        Err(_) => log::info!(
            "{}: aborted after {} seeds, wrote {} rows in {:.3} sec",
            strategy.name(),
            tally.seeds_evaluated,
            tally.rows_written,
            elapsed.as_secs_f64()
        ),
    }
    result?;

    Ok(SweepSummary {
        seeds_evaluated: tally.seeds_evaluated,
        rows_written: tally.rows_written,
        best: tally.lowest,
        elapsed,
    })
}

/// Sweep state carried across batches.
#[derive(Default)]
struct Tally {
    /// Running-best watermark.
    best: Option<f32>,
    lowest: Option<(Seed, f32)>,
    seeds_evaluated: u64,
    rows_written: u64,
}

fn sweep_batches<P, W>(
    strategy: &Strategy,
    range: SeedRange,
    provider: &P,
    levels: &[LevelId],
    opt: &SearchOpt,
    sink: &mut W,
    tally: &mut Tally,
) -> Result<(), SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    let interval = opt.progress_interval as i64;
    let mut batch_start = range.start() as i64;
    let end = range.end_exclusive() as i64;

    while batch_start < end {
        let batch_end = (batch_start + opt.batch_size as i64).min(end);

        // Stage 1: evaluate in parallel, collected back in seed order
        let evaluated: Vec<(Seed, Result<DispersionMetrics, SearchError>)> =
            (batch_start as Seed..batch_end as Seed)
                .into_par_iter()
                .map(|seed| (seed, evaluate_seed(provider, seed, levels, strategy)))
                .collect();

        // Stage 2: decide and write sequentially
        for (seed, result) in evaluated {
            if seed as i64 % interval == 0 {
                log::info!("Calculating metrics for seed: {}", seed);
            }

            let metrics = result?;
            tally.seeds_evaluated += 1;

            if tally.lowest.map_or(true, |(_, avg)| metrics.average < avg) {
                tally.lowest = Some((seed, metrics.average));
            }

            let decision = strategy.decide(tally.best, &metrics);
            tally.best = decision.best;
            if !decision.accepted {
                continue;
            }

            writeln!(sink, "{}", strategy.format_row(seed, &metrics))?;
            tally.rows_written += 1;

            match strategy {
                Strategy::RunningBest => log::info!("Current best: {}", seed),
                Strategy::ThresholdFilter { .. } => log::info!("Seed found: {}", seed),
                _ => {}
            }
        }

        batch_start = batch_end;
    }

    Ok(())
}
