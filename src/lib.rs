//! Trapvid - camera-trap frame-to-video detection aggregation CLI.
//!
//! Consumes per-frame batch detection results (`MegaDetector` format),
//! groups detections by source video, and writes per-video results under a
//! configurable aggregation policy.

#![warn(missing_docs)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod resolve;
pub mod results;

use clap::Parser;
use cli::{AggregateArgs, Cli, Command};
use config::{Config, config_file_path, load_default_config, save_default_config};
use pipeline::{ProcessOptions, output_dir_for, process_results_file};
use resolve::FolderFrameResolver;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the trapvid CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.aggregate.verbose, cli.aggregate.quiet);

    let config = load_default_config()?;
    config::validate_config(&config)?;

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        return Err(Error::NoResultsFiles);
    }

    aggregate_files(&cli.inputs, &cli.aggregate, &config)
}

/// Aggregate the given results files with the given options.
fn aggregate_files(inputs: &[PathBuf], args: &AggregateArgs, config: &Config) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();

    let policy = build_policy(args, config)?;
    let formats = args
        .format
        .clone()
        .unwrap_or_else(|| config.defaults.formats.clone());
    let options = ProcessOptions {
        policy,
        formats,
        video_root: args.video_root.clone(),
        csv_bom: config.output.csv_bom && !args.no_csv_bom,
    };

    info!(
        "Aggregating {} results file(s) (threshold={}, strategy={})",
        inputs.len(),
        options.policy.confidence_threshold,
        options.policy.merge_strategy
    );

    let progress = create_progress(inputs.len(), args.quiet);
    let resolver = FolderFrameResolver;

    let mut processed = 0;
    let mut errors = 0;
    let mut total_videos = 0;
    let mut total_detections = 0;

    for input in inputs {
        let output_dir = output_dir_for(input, args.output_dir.as_deref());
        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreateFailed {
                path: output_dir.clone(),
                source: e,
            })?;
        }

        match process_results_file(input, &output_dir, &resolver, &options) {
            Ok(result) => {
                processed += 1;
                total_videos += result.videos;
                total_detections += result.detections;
            }
            Err(e) => {
                error!("Failed to process {}: {}", input.display(), e);
                errors += 1;
                if args.fail_fast {
                    if let Some(pb) = progress.as_ref() {
                        pb.abandon_with_message("Failed");
                    }
                    return Err(e);
                }
            }
        }
        if let Some(pb) = progress.as_ref() {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress.as_ref() {
        pb.finish_with_message("Complete");
    }

    info!(
        "Complete: {} file(s) processed, {} error(s), {} video(s), {} detection(s) in {:.2}s",
        processed,
        errors,
        total_videos,
        total_detections,
        total_start.elapsed().as_secs_f64()
    );

    if errors > 0 {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

/// Resolve the aggregation policy from CLI arguments and config defaults.
fn build_policy(args: &AggregateArgs, config: &Config) -> Result<aggregate::AggregationPolicy> {
    let strategy_name = args
        .merge_strategy
        .unwrap_or(config.defaults.merge_strategy);
    let top_k = args.top_k.unwrap_or(config.defaults.top_k);

    let repeat_suppression = if args.suppress_repeats || config.repeat.enabled {
        let mut options = config.repeat.to_options();
        if let Some(iou) = args.repeat_iou {
            options.iou_threshold = iou;
        }
        if let Some(occurrences) = args.repeat_occurrences {
            options.occurrence_threshold = occurrences;
        }
        Some(options)
    } else {
        None
    };

    let policy = aggregate::AggregationPolicy {
        confidence_threshold: args
            .confidence_threshold
            .unwrap_or(config.defaults.confidence_threshold),
        merge_strategy: strategy_name.to_strategy(top_k),
        min_frames_required: args
            .min_frames
            .unwrap_or(config.defaults.min_frames_required),
        repeat_suppression,
    };

    policy
        .validate()
        .map_err(|message| Error::ConfigValidation { message })?;
    Ok(policy)
}

/// Create a batch progress bar when more than one file is processed.
fn create_progress(total: usize, quiet: bool) -> Option<indicatif::ProgressBar> {
    use indicatif::{ProgressBar, ProgressStyle};

    if quiet || total < 2 {
        return None;
    }

    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("=> "));
    pb.set_style(style);
    Some(pb)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[allow(clippy::print_stdout)]
fn handle_command(command: Command) -> Result<()> {
    use cli::ConfigAction;

    match command {
        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = config_file_path()?;
                if path.exists() {
                    println!("Configuration file already exists: {}", path.display());
                } else {
                    let saved_path = save_default_config(&Config::default())?;
                    println!("Created configuration file: {}", saved_path.display());
                }
                Ok(())
            }
            ConfigAction::Show => {
                let config = load_default_config()?;
                println!("{config:#?}");
                Ok(())
            }
            ConfigAction::Path => {
                let path = config_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
