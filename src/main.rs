use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use clm_seed_finder::layout_table::LayoutTable;
use clm_seed_finder::search::{self, SeedRange, Strategy};
use clm_seed_finder::{LevelCatalog, LevelId, SearchOpt, defaults, report, utils};

#[derive(Parser)]
#[command(name = "clm-seed-finder")]
#[command(about = "Search collectible-layout seeds for extremal spatial dispersion", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, global = true, value_name = "INT", default_value_t = defaults::VERBOSITY)]
    verbosity: i32,
}

#[derive(Args)]
struct CommonArgs {
    /// Layout table with one collectible per line: seed,level,x,y,z (.gz accepted)
    #[arg(short = 'P', long, value_name = "FILE")]
    positions: PathBuf,

    /// Output file (default depends on the command)
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of threads (default: all available cores)
    #[arg(short = 't', long, value_name = "INT")]
    threads: Option<usize>,

    /// Seeds evaluated per parallel batch
    #[arg(long, value_name = "INT", default_value_t = defaults::BATCH_SIZE)]
    batch_size: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Export overall metrics for every seed in [START, END)
    Range {
        #[arg(allow_negative_numbers = true)]
        start: i64,
        end: i64,
        /// Seeds between progress messages
        #[arg(value_parser = SearchOpt::parse_interval, default_value_t = defaults::PROGRESS_INTERVAL)]
        interval: u32,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Write the per-level breakdown for one seed
    Seed {
        #[arg(allow_negative_numbers = true)]
        seed: i64,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Track the running best seed, or filter by threshold: [[THRESHOLD] START END]
    Best {
        #[arg(value_name = "ARGS", num_args = 0..=3, allow_negative_numbers = true)]
        bounds: Vec<String>,
        /// Seeds between progress messages
        #[arg(short = 'i', long, value_parser = SearchOpt::parse_interval, default_value_t = defaults::PROGRESS_INTERVAL)]
        interval: u32,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Export metrics for a single level over [START, END)
    Level {
        level: LevelId,
        #[arg(allow_negative_numbers = true)]
        start: i64,
        end: i64,
        /// Seeds between progress messages
        #[arg(value_parser = SearchOpt::parse_interval, default_value_t = defaults::PROGRESS_INTERVAL)]
        interval: u32,
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Per-level and overall metrics for every seed listed in INPUT (first column)
    Stats {
        input: PathBuf,
        output_csv: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn init_logging(verbosity: i32) {
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn configure_threads(threads: Option<usize>) -> usize {
    let mut num_threads = threads.unwrap_or_else(num_cpus::get);
    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(_) => log::debug!("Built global Rayon thread pool with {} threads", num_threads),
        Err(e) => log::warn!("Failed to configure thread pool: {} (may already be initialized)", e),
    }
    num_threads
}

/// Interpret `best` positionals: none, `START END`, or `THRESHOLD START END`.
fn parse_best_args(bounds: &[String]) -> Result<(Option<f32>, i64, i64)> {
    let int = |s: &str| {
        s.parse::<i64>()
            .with_context(|| format!("Invalid seed bound: {}", s))
    };
    match bounds {
        [] => Ok((None, defaults::MIN_SEED, defaults::MAX_SEED)),
        [start, end] => Ok((None, int(start)?, int(end)?)),
        [threshold, start, end] => {
            let threshold = threshold
                .parse::<f32>()
                .with_context(|| format!("Invalid threshold: {}", threshold))?;
            Ok((Some(threshold), int(start)?, int(end)?))
        }
        _ => bail!("best expects no arguments, START END, or THRESHOLD START END"),
    }
}

struct Session {
    provider: LayoutTable,
    catalog: LevelCatalog,
    opt: SearchOpt,
}

impl Session {
    fn open(common: &CommonArgs, interval: u32) -> Result<Self> {
        let n_threads = configure_threads(common.threads);

        log::info!("Loading layouts from {}", common.positions.display());
        let provider = LayoutTable::load(&common.positions)
            .with_context(|| format!("Error loading layout table {}", common.positions.display()))?;

        let opt = SearchOpt {
            progress_interval: interval,
            batch_size: common.batch_size,
            n_threads,
        };
        opt.validate()?;

        Ok(Self {
            provider,
            catalog: LevelCatalog::default(),
            opt,
        })
    }

    fn sweep(&self, strategy: Strategy, start: i64, end: i64, output: &Path) -> Result<()> {
        let range = SeedRange::new(start, end)?;
        // Validate the level before truncating the output file
        strategy.level_set(&self.catalog)?;

        let mut sink = utils::create_line_sink(output)
            .with_context(|| format!("Error creating output file {}", output.display()))?;
        let summary = search::run_sweep(
            &strategy,
            range,
            &self.provider,
            &self.catalog,
            &self.opt,
            &mut sink,
        )
        .with_context(|| format!("Sweep failed; rows written so far are in {}", output.display()))?;

        if let Some((seed, average)) = summary.best {
            log::info!("Lowest average: seed {} ({})", seed, average);
        }
        log::info!(
            "{} of {} seeds written to {}",
            summary.rows_written,
            summary.seeds_evaluated,
            output.display()
        );
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Range {
            start,
            end,
            interval,
            common,
        } => {
            let session = Session::open(&common, interval)?;
            let output = common
                .output
                .unwrap_or_else(|| PathBuf::from(defaults::RANGE_OUTPUT));
            session.sweep(Strategy::FullExport, start, end, &output)
        }

        Commands::Best {
            bounds,
            interval,
            common,
        } => {
            let (threshold, start, end) = parse_best_args(&bounds)?;
            let session = Session::open(&common, interval)?;
            let strategy = match threshold {
                Some(threshold) => Strategy::ThresholdFilter { threshold },
                None => Strategy::RunningBest,
            };
            let output = common
                .output
                .unwrap_or_else(|| PathBuf::from(defaults::RANGE_OUTPUT));
            session.sweep(strategy, start, end, &output)
        }

        Commands::Level {
            level,
            start,
            end,
            interval,
            common,
        } => {
            let session = Session::open(&common, interval)?;
            let output = match common.output {
                Some(path) => path,
                None => PathBuf::from(format!(
                    "{}{}.csv",
                    defaults::LEVEL_OUTPUT_PREFIX,
                    session.catalog.code(level)?
                )),
            };
            session.sweep(Strategy::SingleLevelExport { level }, start, end, &output)
        }

        Commands::Seed { seed, common } => {
            // Validate the seed before creating the report file
            SeedRange::checked_seed(seed)?;
            let session = Session::open(&common, defaults::PROGRESS_INTERVAL)?;
            let output = common.output.unwrap_or_else(|| {
                PathBuf::from(format!("{}{}.txt", defaults::SEED_REPORT_PREFIX, seed))
            });

            let mut out = utils::create_line_sink(&output)
                .with_context(|| format!("Error creating report {}", output.display()))?;
            report::write_seed_breakdown(seed, &session.provider, &session.catalog, &mut out)?;
            log::info!("Breakdown for seed {} written to {}", seed, output.display());
            Ok(())
        }

        Commands::Stats {
            input,
            output_csv,
            common,
        } => {
            let session = Session::open(&common, defaults::PROGRESS_INTERVAL)?;
            let output = common.output.unwrap_or(output_csv);

            log::info!("Reading seeds from {}", input.display());
            let reader = utils::xzopen(&input)
                .with_context(|| format!("Error opening seed list {}", input.display()))?;
            let seeds = report::read_seed_list(reader)?;

            let mut out = utils::create_line_sink(&output)
                .with_context(|| format!("Error creating output file {}", output.display()))?;
            report::write_batch_stats(&seeds, &session.provider, &session.catalog, &mut out)?;
            log::info!("Statistics written to {}", output.display());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
