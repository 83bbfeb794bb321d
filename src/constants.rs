//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "trapvid";

/// Default confidence threshold applied before aggregation.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.0;

/// Default number of detections retained per category under `top-k`.
pub const DEFAULT_TOP_K: usize = 3;

/// Default minimum number of contributing frames before a video is
/// flagged as a low sample.
pub const DEFAULT_MIN_FRAMES_REQUIRED: usize = 1;

/// Default IoU above which two boxes count as the same location during
/// repeat-detection suppression.
pub const DEFAULT_REPEAT_IOU_THRESHOLD: f32 = 0.9;

/// Default occurrences at one location before it is treated as a repeat.
pub const DEFAULT_REPEAT_OCCURRENCE_THRESHOLD: usize = 20;

/// Default confidence floor for repeat-suppression eligibility.
pub const DEFAULT_REPEAT_MIN_CONFIDENCE: f32 = 0.1;

/// Default maximum box area (fraction of the image) eligible for
/// repeat suppression.
pub const DEFAULT_REPEAT_MAX_BOX_AREA: f32 = 0.2;

/// Output file extensions by format.
pub mod output_extensions {
    /// Per-video JSON results extension.
    pub const JSON: &str = ".video_results.json";
    /// Per-video CSV summary extension.
    pub const CSV: &str = ".video_results.csv";
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// Bounding box validation constants.
pub mod bbox {
    /// Floating tolerance for the containment invariant (x+w <= 1, y+h <= 1).
    pub const TOLERANCE: f32 = 1e-4;
}

/// Frame file naming produced by the upstream extraction step.
pub mod frames {
    /// Frame file stem prefix (`frame000123.jpg`).
    pub const FILE_PREFIX: &str = "frame";
}

/// Video file extensions recognized when enumerating an input root.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "mpg", "mpeg"];

/// Results artifact format version written to the output `info` block.
pub const OUTPUT_FORMAT_VERSION: &str = "1.4";

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
