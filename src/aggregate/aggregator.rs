//! Frame-to-video detection aggregation.
//!
//! A pure, single-pass transformation: no I/O, no clock, no randomness.
//! Output depends only on the input records and the policy, so repeated
//! runs over the same input are byte-identical.

use std::collections::HashMap;

use crate::aggregate::diagnostics::Diagnostics;
use crate::aggregate::policy::{AggregationPolicy, MergeStrategy};
use crate::aggregate::repeat::suppress_repeats;
use crate::aggregate::types::{
    Category, FrameDetectionRecord, VideoDetection, VideoDetectionSummary,
};

/// Result of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateOutput {
    /// One summary per distinct video, in first-appearance order.
    pub summaries: Vec<VideoDetectionSummary>,
    /// Skip and flag accounting for the run.
    pub diagnostics: Diagnostics,
}

/// Per-video working state during grouping.
struct VideoGroup {
    video_id: String,
    frame_count: usize,
    candidates: Vec<VideoDetection>,
}

/// Reduce per-frame detection records into one summary per source video.
///
/// Grouping is insertion-order stable: summaries appear in the order each
/// `video_id` was first seen, regardless of how upstream parallelism
/// interleaved the records. Invalid detections (confidence or bounding box
/// out of range) are dropped and counted; they never fail the run. When the
/// policy carries repeat-suppression options, detections recurring at a
/// static location are removed per video before the merge strategy runs.
pub fn aggregate(records: Vec<FrameDetectionRecord>, policy: &AggregationPolicy) -> AggregateOutput {
    let mut diagnostics = Diagnostics::default();
    let mut groups: Vec<VideoGroup> = Vec::new();
    let mut index_by_video: HashMap<String, usize> = HashMap::new();

    for record in records {
        let idx = match index_by_video.get(&record.video_id) {
            Some(&idx) => idx,
            None => {
                index_by_video.insert(record.video_id.clone(), groups.len());
                groups.push(VideoGroup {
                    video_id: record.video_id.clone(),
                    frame_count: 0,
                    candidates: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        group.frame_count += 1;

        for detection in record.detections {
            if let Err(reason) = detection.validate() {
                diagnostics.drop_detection(&record.frame_path, reason);
                continue;
            }
            group.candidates.push(VideoDetection {
                detection,
                frame_path: record.frame_path.clone(),
                frame_index: record.frame_index,
            });
        }
    }

    let summaries = groups
        .into_iter()
        .map(|group| summarize_group(group, policy, &mut diagnostics))
        .collect();

    AggregateOutput {
        summaries,
        diagnostics,
    }
}

/// Apply the merge strategy to one video group and build its summary.
fn summarize_group(
    mut group: VideoGroup,
    policy: &AggregationPolicy,
    diagnostics: &mut Diagnostics,
) -> VideoDetectionSummary {
    // Frame-index order first so every later scan resolves confidence ties
    // toward the earlier frame, independent of record arrival order.
    group
        .candidates
        .sort_by(|a, b| a.frame_index.cmp(&b.frame_index));

    // Suppression sees the full confidence range; its own floor decides
    // eligibility, not the policy threshold.
    if let Some(options) = policy.repeat_suppression.as_ref() {
        let (kept, suppressed) = suppress_repeats(group.candidates, options);
        group.candidates = kept;
        diagnostics.repeats_suppressed += suppressed;
    }

    group
        .candidates
        .retain(|c| c.detection.confidence >= policy.confidence_threshold);

    let max_confidence_frame = group
        .candidates
        .iter()
        .max_by(|a, b| {
            a.detection
                .confidence
                .total_cmp(&b.detection.confidence)
                .then(b.frame_index.cmp(&a.frame_index))
        })
        .map(|d| d.frame_path.clone());

    let detections = match policy.merge_strategy {
        MergeStrategy::MaxConfidencePerCategory => merge_per_category(group.candidates, 1),
        MergeStrategy::TopKPerCategory(k) => merge_per_category(group.candidates, k),
        MergeStrategy::All => {
            let mut all = group.candidates;
            all.sort_by(|a, b| {
                a.frame_index
                    .cmp(&b.frame_index)
                    .then(b.detection.confidence.total_cmp(&a.detection.confidence))
            });
            all
        }
    };

    let low_sample = group.frame_count < policy.min_frames_required;
    if low_sample {
        diagnostics.low_sample_videos.push(group.video_id.clone());
    }

    VideoDetectionSummary {
        video_id: group.video_id,
        detections,
        frame_count: group.frame_count,
        max_confidence_frame,
        low_sample,
    }
}

/// Keep the k highest-confidence detections per category, then list the
/// survivors by descending confidence (ties toward the earlier frame).
fn merge_per_category(candidates: Vec<VideoDetection>, k: usize) -> Vec<VideoDetection> {
    let mut per_category: HashMap<Category, Vec<VideoDetection>> = HashMap::new();
    for candidate in candidates {
        per_category
            .entry(candidate.detection.category)
            .or_default()
            .push(candidate);
    }

    // Category iteration in a fixed order keeps exact-tie output stable.
    let mut categories: Vec<Category> = per_category.keys().copied().collect();
    categories.sort();

    let mut merged = Vec::new();
    for category in categories {
        if let Some(mut list) = per_category.remove(&category) {
            // Stable sort over frame-index-ordered input: equal confidences
            // stay in earlier-frame-first order.
            list.sort_by(|a, b| b.detection.confidence.total_cmp(&a.detection.confidence));
            list.truncate(k);
            merged.extend(list);
        }
    }

    merged.sort_by(|a, b| {
        b.detection
            .confidence
            .total_cmp(&a.detection.confidence)
            .then(a.frame_index.cmp(&b.frame_index))
    });
    merged
}
