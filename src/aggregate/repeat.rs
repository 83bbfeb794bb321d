//! Repeat-detection suppression.
//!
//! A static object in a camera trap's field of view (a rock, a branch, a
//! fence post) is detected at a near-identical location in frame after
//! frame, and such a location would win any confidence-based merge. This
//! pass groups detections that recur at the same location within one video,
//! treats locations exceeding an occurrence threshold as static false
//! positives, and removes their instances before the merge strategy runs.

use serde::{Deserialize, Serialize};

use crate::aggregate::types::{BoundingBox, Category, VideoDetection};
use crate::constants::{
    DEFAULT_REPEAT_IOU_THRESHOLD, DEFAULT_REPEAT_MAX_BOX_AREA, DEFAULT_REPEAT_MIN_CONFIDENCE,
    DEFAULT_REPEAT_OCCURRENCE_THRESHOLD,
};

/// Options controlling repeat-detection suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatOptions {
    /// Two boxes with at least this IoU count as the same location.
    pub iou_threshold: f32,
    /// Occurrences at one location before it is treated as a repeat.
    pub occurrence_threshold: usize,
    /// Detections below this confidence are never treated as repeats.
    pub min_confidence: f32,
    /// Boxes larger than this area fraction are never treated as repeats;
    /// a box filling most of the frame is usually a real animal up close.
    pub max_box_area: f32,
}

impl Default for RepeatOptions {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_REPEAT_IOU_THRESHOLD,
            occurrence_threshold: DEFAULT_REPEAT_OCCURRENCE_THRESHOLD,
            min_confidence: DEFAULT_REPEAT_MIN_CONFIDENCE,
            max_box_area: DEFAULT_REPEAT_MAX_BOX_AREA,
        }
    }
}

impl RepeatOptions {
    /// Validate option value ranges.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.iou_threshold <= 0.0 || self.iou_threshold > 1.0 {
            return Err(format!(
                "repeat iou_threshold must be in (0.0, 1.0], got {}",
                self.iou_threshold
            ));
        }
        if self.occurrence_threshold < 2 {
            return Err("repeat occurrence_threshold must be >= 2".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "repeat min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            ));
        }
        if self.max_box_area <= 0.0 || self.max_box_area > 1.0 {
            return Err(format!(
                "repeat max_box_area must be in (0.0, 1.0], got {}",
                self.max_box_area
            ));
        }
        Ok(())
    }
}

/// A recurring location within one video: the first box seen there plus the
/// indices of every detection matched to it.
struct LocationGroup {
    category: Category,
    bounding_box: BoundingBox,
    members: Vec<usize>,
}

/// Remove detections recurring at the same location often enough to be
/// static false positives.
///
/// Operates on one video's detections, expected in frame order. Detections
/// below `min_confidence` or larger than `max_box_area` are never grouped
/// and never removed. A detection may fall within IoU range of several
/// locations; it counts toward each, and membership in any location that
/// reaches the occurrence threshold removes it. Returns the survivors in
/// input order and the number removed.
pub fn suppress_repeats(
    candidates: Vec<VideoDetection>,
    options: &RepeatOptions,
) -> (Vec<VideoDetection>, usize) {
    let mut locations: Vec<LocationGroup> = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        if !is_eligible(candidate, options) {
            continue;
        }

        let bounding_box = candidate.detection.bounding_box;
        let mut matched = false;
        for location in &mut locations {
            // Locations never match across categories.
            if location.category != candidate.detection.category {
                continue;
            }
            if iou(&bounding_box, &location.bounding_box) >= options.iou_threshold {
                location.members.push(index);
                matched = true;
            }
        }

        if !matched {
            locations.push(LocationGroup {
                category: candidate.detection.category,
                bounding_box,
                members: vec![index],
            });
        }
    }

    let mut suppressed = vec![false; candidates.len()];
    for location in &locations {
        if location.members.len() >= options.occurrence_threshold {
            for &index in &location.members {
                suppressed[index] = true;
            }
        }
    }

    let suppressed_count = suppressed.iter().filter(|&&s| s).count();
    if suppressed_count == 0 {
        return (candidates, 0);
    }

    let kept = candidates
        .into_iter()
        .zip(suppressed)
        .filter_map(|(candidate, s)| (!s).then_some(candidate))
        .collect();
    (kept, suppressed_count)
}

/// Whether a detection can participate in location grouping.
fn is_eligible(candidate: &VideoDetection, options: &RepeatOptions) -> bool {
    let detection = &candidate.detection;
    if detection.confidence < options.min_confidence {
        return false;
    }
    let area = detection.bounding_box.width * detection.bounding_box.height;
    area > 0.0 && area <= options.max_box_area
}

/// Intersection over union of two normalized boxes.
fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = (a.x + a.width).min(b.x + b.width);
    let bottom = (a.y + a.height).min(b.y + b.height);

    if right <= left || bottom <= top {
        return 0.0;
    }

    let intersection = (right - left) * (bottom - top);
    let union = a.width * a.height + b.width * b.height - intersection;
    if union <= 0.0 { 0.0 } else { intersection / union }
}
