//! SoV Studio CLI
//!
//! Computes Share of Voice for tracked games from platform CSV exports.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use sov_studio::commands::{
    display_platforms, display_version, execute_filter, execute_run, validate_args,
    validate_input, validate_report_file, FilterArgs, InputArgs, RunArgs,
};
use sov_studio::loader::Platform;

/// SoV Studio - Share of Voice across tracked games
#[derive(Parser, Debug)]
#[command(name = "sov")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Input selection shared by run and filter
#[derive(Args, Debug)]
struct InputOpts {
    /// Pipeline config file (TOML)
    #[arg(short, long, env = "SOV_CONFIG")]
    config: Option<PathBuf>,

    /// CSV file or directory of CSV files (repeatable)
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Column preset for --input paths
    #[arg(short, long, default_value = "custom")]
    platform: Platform,

    /// Game label for every --input table (defaults to file names)
    #[arg(long)]
    label: Option<String>,

    /// Window start, inclusive (e.g. 2024-01-01)
    #[arg(long)]
    start: Option<String>,

    /// Window end, exclusive
    #[arg(long)]
    end: Option<String>,

    /// Trailing window length in days
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Fail on unparseable timestamps instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Metric to track (repeatable; defaults to the sources' metrics)
    #[arg(short, long = "metric")]
    metrics: Vec<String>,
}

impl From<InputOpts> for InputArgs {
    fn from(opts: InputOpts) -> Self {
        Self {
            config: opts.config,
            inputs: opts.inputs,
            platform: opts.platform,
            label: opts.label,
            start: opts.start,
            end: opts.end,
            lookback_days: opts.lookback_days,
            strict: opts.strict,
            metrics: opts.metrics,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate, compute shares and roll up
    Run {
        #[command(flatten)]
        input: InputOpts,

        /// Metric to rank the rollup by
        #[arg(long)]
        rank_metric: Option<String>,

        /// Number of games kept before "Other"
        #[arg(long)]
        top_n: Option<usize>,

        /// Also roll up by every tracked metric
        #[arg(long)]
        per_metric: bool,

        /// Output path for JSON report
        #[arg(short, long, default_value = "sov_report.json")]
        output: PathBuf,

        /// Directory for CSV tables (optional)
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Export the filtered records of one game
    Filter {
        #[command(flatten)]
        input: InputOpts,

        /// Game to keep (all games when omitted)
        #[arg(short, long)]
        game: Option<String>,

        /// Output CSV path
        #[arg(short, long, default_value = "filtered.csv")]
        output: PathBuf,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display platform column presets
    Platforms {
        /// Show column details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Run {
            input,
            rank_metric,
            top_n,
            per_metric,
            output,
            csv_dir,
            summary,
        } => {
            let args = RunArgs {
                input: input.into(),
                rank_metric,
                top_n,
                per_metric,
                output_json: output,
                csv_dir,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_run(args)?;
        }

        Commands::Filter {
            input,
            game,
            output,
        } => {
            let args = FilterArgs {
                input: input.into(),
                game,
                output,
            };

            validate_input(&args.input)?;

            execute_filter(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Platforms { show } => {
            display_platforms(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
