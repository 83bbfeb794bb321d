//! Aggregation policy configuration.

use serde::{Deserialize, Serialize};

use crate::aggregate::repeat::RepeatOptions;
use crate::constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MIN_FRAMES_REQUIRED};

/// How per-frame detections are reduced into a per-video set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy", content = "k")]
pub enum MergeStrategy {
    /// Keep the single highest-confidence detection per category.
    MaxConfidencePerCategory,
    /// Keep the k highest-confidence detections per category.
    TopKPerCategory(usize),
    /// Keep every detection above the threshold, unmerged.
    All,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        Self::MaxConfidencePerCategory
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxConfidencePerCategory => write!(f, "max"),
            Self::TopKPerCategory(k) => write!(f, "top-{k}"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Policy controlling one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    /// Detections below this score are excluded before aggregation.
    pub confidence_threshold: f32,
    /// Merge strategy applied within each video group.
    pub merge_strategy: MergeStrategy,
    /// Videos with fewer contributing frames are flagged `low_sample`.
    pub min_frames_required: usize,
    /// When set, remove detections recurring at a static location before
    /// the merge strategy runs.
    pub repeat_suppression: Option<RepeatOptions>,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            merge_strategy: MergeStrategy::default(),
            min_frames_required: DEFAULT_MIN_FRAMES_REQUIRED,
            repeat_suppression: None,
        }
    }
}

impl AggregationPolicy {
    /// Validate policy value ranges.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }
        if let MergeStrategy::TopKPerCategory(k) = self.merge_strategy {
            if k == 0 {
                return Err("top-k merge strategy requires k >= 1".to_string());
            }
        }
        if self.min_frames_required == 0 {
            return Err("min_frames_required must be >= 1".to_string());
        }
        if let Some(repeat) = &self.repeat_suppression {
            repeat.validate()?;
        }
        Ok(())
    }

    /// Default top-k policy with the configured k.
    pub fn top_k(k: usize) -> Self {
        Self {
            merge_strategy: MergeStrategy::TopKPerCategory(k),
            ..Self::default()
        }
    }
}
