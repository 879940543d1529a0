// Per-seed reports
//
// - Breakdown: one text block per main stage for a single seed
// - Batch statistics: one CSV row per seed from an external seed list,
//   with per-level and overall columns
//
// Both are single-seed evaluations over the main stages; they reuse the
// metrics engine as-is.

use crate::error::SearchError;
use crate::levels::LevelCatalog;
use crate::metrics;
use crate::position::{PositionProvider, Seed};
use crate::search::{SeedRange, evaluate_levels};
use std::io::{BufRead, Write};

const BREAKDOWN: &str = "breakdown";
const BATCH_STATS: &str = "batch-stats";

/// Write the per-level breakdown for `seed`:
///
/// ```text
/// Two Up:
///    Nearest: 102.5
///   Furthest: 1893.2
///    Average: 811.04
///
/// ```
pub fn write_seed_breakdown<P, W>(
    seed: i64,
    provider: &P,
    catalog: &LevelCatalog,
    out: &mut W,
) -> Result<(), SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    let seed = SeedRange::checked_seed(seed)?;
    let levels: Vec<_> = catalog.main_stages().collect();
    let per_level = evaluate_levels(provider, seed, &levels, BREAKDOWN)?;

    for (&level, m) in levels.iter().zip(&per_level) {
        writeln!(out, "{}:", catalog.name(level)?)?;
        writeln!(out, "   Nearest: {}", m.nearest)?;
        writeln!(out, "  Furthest: {}", m.furthest)?;
        writeln!(out, "   Average: {}", m.average)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Seeds from a CSV whose first line is a header and whose first column is
/// the seed.
pub fn read_seed_list<R: BufRead>(reader: R) -> Result<Vec<Seed>, SearchError> {
    let mut seeds = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let field = line.split(',').next().unwrap_or("").trim();
        if field.is_empty() {
            continue;
        }
        let seed = field
            .parse::<i64>()
            .map_err(|_| SearchError::InvalidSeedList {
                line: idx + 1,
                reason: format!("invalid seed '{}'", field),
            })?;
        let seed = SeedRange::checked_seed(seed).map_err(|_| SearchError::InvalidSeedList {
            line: idx + 1,
            reason: format!("seed {} outside [0, 2147483647]", seed),
        })?;
        seeds.push(seed);
    }

    Ok(seeds)
}

/// Header for the batch statistics CSV.
pub fn batch_stats_header(catalog: &LevelCatalog) -> Result<String, SearchError> {
    let mut columns = vec!["Seed".to_string()];
    for level in catalog.main_stages() {
        let code = catalog.code(level)?;
        columns.push(format!("Nearest {}", code));
        columns.push(format!("Furthest {}", code));
        columns.push(format!("Average {}", code));
    }
    columns.push("Overall Nearest".to_string());
    columns.push("Overall Furthest".to_string());
    columns.push("Overall Average".to_string());
    Ok(columns.join(","))
}

/// Write one row per seed, in the order given. Rows go out as each seed
/// finishes; the first failing seed aborts the batch.
pub fn write_batch_stats<P, W>(
    seeds: &[Seed],
    provider: &P,
    catalog: &LevelCatalog,
    out: &mut W,
) -> Result<usize, SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    let result = batch_stats(seeds, provider, catalog, out);
    let flushed = out.flush();
    let rows = result?;
    flushed?;
    Ok(rows)
}

fn batch_stats<P, W>(
    seeds: &[Seed],
    provider: &P,
    catalog: &LevelCatalog,
    out: &mut W,
) -> Result<usize, SearchError>
where
    P: PositionProvider + ?Sized,
    W: Write + ?Sized,
{
    let levels: Vec<_> = catalog.main_stages().collect();
    writeln!(out, "{}", batch_stats_header(catalog)?)?;

    for &seed in seeds {
        let per_level = evaluate_levels(provider, seed, &levels, BATCH_STATS)?;
        let overall = metrics::aggregate(&per_level).map_err(|source| SearchError::Metrics {
            strategy: BATCH_STATS,
            seed,
            level: None,
            source,
        })?;

        let mut row = seed.to_string();
        for m in per_level.iter().chain(std::iter::once(&overall)) {
            row.push_str(&format!(",{},{},{}", m.nearest, m.furthest, m.average));
        }
        writeln!(out, "{}", row)?;
    }

    log::info!("Wrote statistics for {} seeds", seeds.len());
    Ok(seeds.len())
}
