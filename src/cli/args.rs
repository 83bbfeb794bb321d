//! CLI argument definitions.

use crate::config::{MergeStrategyName, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Aggregate camera-trap frame detection results into per-video results.
#[derive(Debug, Parser)]
#[command(name = "trapvid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Per-frame batch results files to aggregate.
    pub inputs: Vec<PathBuf>,

    /// Common options for aggregation.
    #[command(flatten)]
    pub aggregate: AggregateArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the aggregate command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AggregateArgs {
    /// Confidence threshold: detections below this score are excluded
    /// before aggregation (0.0-1.0).
    #[arg(short = 'c', long, value_parser = parse_confidence, env = "TRAPVID_CONFIDENCE_THRESHOLD")]
    pub confidence_threshold: Option<f32>,

    /// Merge strategy (max, top-k, all).
    #[arg(short = 's', long, env = "TRAPVID_MERGE_STRATEGY")]
    pub merge_strategy: Option<MergeStrategyName>,

    /// Detections retained per category under the top-k strategy.
    #[arg(short = 'k', long, env = "TRAPVID_TOP_K")]
    pub top_k: Option<usize>,

    /// Minimum contributing frames before a video is flagged low-sample.
    #[arg(long, env = "TRAPVID_MIN_FRAMES")]
    pub min_frames: Option<usize>,

    /// Remove detections recurring at a near-identical location across a
    /// video's frames (static false positives).
    #[arg(long, env = "TRAPVID_SUPPRESS_REPEATS")]
    pub suppress_repeats: bool,

    /// IoU above which two boxes count as the same location.
    #[arg(long, value_parser = parse_confidence, env = "TRAPVID_REPEAT_IOU")]
    pub repeat_iou: Option<f32>,

    /// Occurrences at one location before it is treated as a repeat.
    #[arg(long, env = "TRAPVID_REPEAT_OCCURRENCES")]
    pub repeat_occurrences: Option<usize>,

    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_delimiter = ',', env = "TRAPVID_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "TRAPVID_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Video root directory; enables the output-vs-filesystem consistency
    /// check.
    #[arg(long, env = "TRAPVID_VIDEO_ROOT")]
    pub video_root: Option<PathBuf>,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Omit the UTF-8 BOM from CSV output.
    #[arg(long)]
    pub no_csv_bom: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate confidence value.
fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "confidence must be between 0.0 and 1.0, got {value}"
        ));
    }

    Ok(value)
}
