//! End-to-end processing of one results artifact.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::aggregate::{AggregationPolicy, aggregate};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::coordinator::{check_video_consistency, collect_video_ids, output_path_for};
use crate::resolve::{FrameResolver, resolve_records};
use crate::results::{load_results_file, write_csv_results, write_json_results};

/// Options for processing one results file.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Aggregation policy.
    pub policy: AggregationPolicy,
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,
    /// Video root for the consistency check (None = check disabled).
    pub video_root: Option<std::path::PathBuf>,
    /// Include a UTF-8 BOM in CSV output.
    pub csv_bom: bool,
}

/// Counts from processing one results file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessResult {
    /// Videos summarized.
    pub videos: usize,
    /// Detections retained across all summaries.
    pub detections: usize,
    /// Frame records that contributed.
    pub frames: usize,
    /// Records skipped (detector failures plus unresolvable frames).
    pub records_skipped: usize,
    /// Detections dropped by validation or for unknown category codes.
    pub detections_dropped: usize,
    /// Detections removed as repeats of a static location.
    pub repeats_suppressed: usize,
    /// Videos flagged as low-sample.
    pub low_sample_videos: usize,
}

/// Process a single per-frame results file into per-video results.
///
/// Loads and decodes the artifact, resolves frame-to-video identity,
/// aggregates under the policy, writes every requested format, and runs
/// the filesystem consistency check when a video root is given.
pub fn process_results_file<R: FrameResolver>(
    input_path: &Path,
    output_dir: &Path,
    resolver: &R,
    options: &ProcessOptions,
) -> Result<ProcessResult> {
    info!("Processing: {}", input_path.display());

    let loaded = load_results_file(input_path)?;
    debug!(
        "Loaded {} frame entries ({} failed images, {} unknown-category detections)",
        loaded.frames.len(),
        loaded.failed_images,
        loaded.unknown_categories
    );

    let (records, unresolved) = resolve_records(loaded.frames, resolver);
    let frames = records.len();

    let mut output = aggregate(records, &options.policy);
    output.diagnostics.records_skipped = unresolved + loaded.failed_images;
    // Unknown-category drops happen at the decode boundary; fold them in
    // so the run summary accounts for every dropped detection.
    output.diagnostics.detections_dropped += loaded.unknown_categories;

    for dropped in &output.diagnostics.dropped {
        debug!(
            "Dropped detection in '{}': {}",
            dropped.frame_path, dropped.reason
        );
    }
    if !output.diagnostics.is_clean() {
        warn!(
            "Diagnostics: {} record(s) skipped, {} detection(s) dropped, {} repeat(s) suppressed, {} low-sample video(s)",
            output.diagnostics.records_skipped,
            output.diagnostics.detections_dropped,
            output.diagnostics.repeats_suppressed,
            output.diagnostics.low_sample_videos.len()
        );
    }

    if let Some(video_root) = options.video_root.as_deref() {
        let video_ids = collect_video_ids(video_root)?;
        let report = check_video_consistency(&output.summaries, &video_ids);
        for id in &report.missing_from_results {
            warn!("Video on disk has no frame results (frames never extracted?): {id}");
        }
        for id in &report.unknown_video_ids {
            warn!("Results reference a video not found under the root: {id}");
        }
        if report.is_consistent() {
            info!("Consistency check passed: {} video(s)", video_ids.len());
        }
    }

    for format in &options.formats {
        let output_path = output_path_for(input_path, output_dir, *format);
        debug!("Writing {} output: {}", format, output_path.display());
        match format {
            OutputFormat::Json => write_json_results(&output.summaries, &output_path)?,
            OutputFormat::Csv => {
                write_csv_results(&output.summaries, &output_path, options.csv_bom)?;
            }
        }
    }

    let detections = output
        .summaries
        .iter()
        .map(|s| s.detections.len())
        .sum::<usize>();
    info!(
        "Aggregated {} frame(s) into {} video summar{} ({} detection(s) retained)",
        frames,
        output.summaries.len(),
        if output.summaries.len() == 1 { "y" } else { "ies" },
        detections
    );

    Ok(ProcessResult {
        videos: output.summaries.len(),
        detections,
        frames,
        records_skipped: output.diagnostics.records_skipped,
        detections_dropped: output.diagnostics.detections_dropped,
        repeats_suppressed: output.diagnostics.repeats_suppressed,
        low_sample_videos: output.diagnostics.low_sample_videos.len(),
    })
}
