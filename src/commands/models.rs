use crate::loader::Platform;
use std::path::PathBuf;

/// Where the records come from and how to filter them
///
/// **Public** - shared by the run and filter commands
#[derive(Debug, Clone, Default)]
pub struct InputArgs {
    /// Pipeline config file (optional when inputs are given)
    pub config: Option<PathBuf>,

    /// Extra CSV files or directories
    pub inputs: Vec<PathBuf>,

    /// Column preset for `inputs`
    pub platform: Platform,

    /// Entity label for every table in `inputs` (defaults to file names)
    pub label: Option<String>,

    /// Window start (overrides the config window)
    pub start: Option<String>,

    /// Window end, exclusive
    pub end: Option<String>,

    /// Trailing window length in days
    pub lookback_days: Option<u32>,

    /// Fail on unparseable timestamps
    pub strict: bool,

    /// Metrics to track (overrides the config list)
    pub metrics: Vec<String>,
}

impl InputArgs {
    pub fn has_window_override(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.lookback_days.is_some()
    }
}

/// Arguments for the run command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: InputArgs,

    /// Ranking metric for the rollup
    pub rank_metric: Option<String>,

    /// Number of entities kept before "Other"
    pub top_n: Option<usize>,

    /// Also roll up by every tracked metric
    pub per_metric: bool,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Directory for CSV tables (optional)
    pub csv_dir: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: InputArgs::default(),
            rank_metric: None,
            top_n: None,
            per_metric: false,
            output_json: PathBuf::from("sov_report.json"),
            csv_dir: None,
            print_summary: false,
        }
    }
}

/// Arguments for the filter command
#[derive(Debug, Clone)]
pub struct FilterArgs {
    pub input: InputArgs,

    /// Only this game's records (all games when absent)
    pub game: Option<String>,

    /// Output CSV path
    pub output: PathBuf,
}

impl Default for FilterArgs {
    fn default() -> Self {
        Self {
            input: InputArgs::default(),
            game: None,
            output: PathBuf::from("filtered.csv"),
        }
    }
}
