//! Batch results artifact format.
//!
//! Serde model of the `MegaDetector` batch-results JSON shape consumed and
//! produced by this tool. The per-video output is structurally parallel to
//! the per-frame input so downstream tooling needs no format change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-frame batch results file, as produced by the detector pipeline.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsFile {
    /// Per-image detection entries.
    pub images: Vec<ImageEntry>,
    /// Detector metadata block (passed through opaquely).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
    /// Category code to name mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_categories: Option<BTreeMap<String, String>>,
}

/// Detection results for one image.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Image file path, relative to the frame root.
    pub file: String,
    /// Detections in this image. Absent when the image failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<DetectionEntry>>,
    /// Failure marker for images the detector could not process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// One detection in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEntry {
    /// Category code (e.g. "1" for animal).
    pub category: String,
    /// Confidence score.
    pub conf: f32,
    /// Normalized `[x, y, width, height]` bounding box.
    pub bbox: [f32; 4],
}

/// A per-video results file, the output of aggregation.
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResultsFile {
    /// Per-video detection entries, in first-appearance order.
    pub images: Vec<VideoEntry>,
    /// Aggregation metadata.
    pub info: OutputInfo,
    /// Category code to name mapping.
    pub detection_categories: BTreeMap<String, String>,
}

/// Aggregated detection results for one video.
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoEntry {
    /// Video file path, relative to the input root.
    pub file: String,
    /// Detections retained by the merge strategy.
    pub detections: Vec<DetectionEntry>,
    /// Number of frames that contributed to this entry.
    pub frame_count: usize,
    /// Frame that produced the highest-confidence detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_confidence_frame: Option<String>,
    /// Contributing frame count fell below the configured minimum.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub low_sample: bool,
}

/// Metadata block written to the output artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutputInfo {
    /// Output format version.
    pub format_version: String,
    /// Tool name and version that produced the file.
    pub aggregator: String,
    /// When the aggregation ran.
    pub aggregation_time: DateTime<Utc>,
}
