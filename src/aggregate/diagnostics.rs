//! Skip and flag accounting for an aggregation run.

/// A detection dropped during validation, with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDetection {
    /// Frame the detection came from.
    pub frame_path: String,
    /// Why it was dropped.
    pub reason: String,
}

/// Diagnostics surfaced alongside aggregation output.
///
/// Per-record and per-detection problems are recovered locally; this is the
/// record of what was skipped or flagged so nothing is silently absorbed.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Frame records whose video identity could not be resolved.
    pub records_skipped: usize,
    /// Detections dropped for failing range or bounding box validation.
    pub detections_dropped: usize,
    /// Detail for each dropped detection.
    pub dropped: Vec<DroppedDetection>,
    /// Detections removed as repeats of a static location.
    pub repeats_suppressed: usize,
    /// Videos whose contributing frame count fell below the minimum.
    pub low_sample_videos: Vec<String>,
}

impl Diagnostics {
    /// Record a dropped detection.
    pub fn drop_detection(&mut self, frame_path: &str, reason: String) {
        self.detections_dropped += 1;
        self.dropped.push(DroppedDetection {
            frame_path: frame_path.to_string(),
            reason,
        });
    }

    /// Whether any skip or flag event occurred.
    pub fn is_clean(&self) -> bool {
        self.records_skipped == 0
            && self.detections_dropped == 0
            && self.repeats_suppressed == 0
            && self.low_sample_videos.is_empty()
    }
}
