//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::aggregate::{MergeStrategy, RepeatOptions};
use crate::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MIN_FRAMES_REQUIRED, DEFAULT_TOP_K,
};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default aggregation settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Repeat-detection suppression settings.
    #[serde(default)]
    pub repeat: RepeatConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Confidence threshold applied before aggregation.
    pub confidence_threshold: f32,

    /// Merge strategy name.
    pub merge_strategy: MergeStrategyName,

    /// k for the top-k merge strategy.
    pub top_k: usize,

    /// Minimum contributing frames before a video is flagged low-sample.
    pub min_frames_required: usize,

    /// Output formats.
    pub formats: Vec<OutputFormat>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            merge_strategy: MergeStrategyName::Max,
            top_k: DEFAULT_TOP_K,
            min_frames_required: DEFAULT_MIN_FRAMES_REQUIRED,
            formats: vec![OutputFormat::Json],
        }
    }
}

/// Repeat-detection suppression settings.
///
/// Static objects detected at the same location in frame after frame are
/// removed before merging when this pass is enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    /// Run the suppression pass by default.
    pub enabled: bool,

    /// IoU above which two boxes count as the same location.
    pub iou_threshold: f32,

    /// Occurrences at one location before it is treated as a repeat.
    pub occurrence_threshold: usize,

    /// Confidence floor for suppression eligibility.
    pub min_confidence: f32,

    /// Maximum box area (fraction of the image) eligible for suppression.
    pub max_box_area: f32,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        let options = RepeatOptions::default();
        Self {
            enabled: false,
            iou_threshold: options.iou_threshold,
            occurrence_threshold: options.occurrence_threshold,
            min_confidence: options.min_confidence,
            max_box_area: options.max_box_area,
        }
    }
}

impl RepeatConfig {
    /// The suppression options these settings describe.
    pub fn to_options(&self) -> RepeatOptions {
        RepeatOptions {
            iou_threshold: self.iou_threshold,
            occurrence_threshold: self.occurrence_threshold,
            min_confidence: self.min_confidence,
            max_box_area: self.max_box_area,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include a UTF-8 BOM in CSV output for Excel compatibility.
    pub csv_bom: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { csv_bom: true }
    }
}

/// Named merge strategy, as it appears in config and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategyName {
    /// Highest-confidence detection per category.
    #[default]
    Max,
    /// k highest-confidence detections per category.
    TopK,
    /// Every detection above the threshold.
    All,
}

impl MergeStrategyName {
    /// Combine with a k value into a concrete merge strategy.
    pub fn to_strategy(self, top_k: usize) -> MergeStrategy {
        match self {
            Self::Max => MergeStrategy::MaxConfidencePerCategory,
            Self::TopK => MergeStrategy::TopKPerCategory(top_k),
            Self::All => MergeStrategy::All,
        }
    }
}

impl std::fmt::Display for MergeStrategyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Max => write!(f, "max"),
            Self::TopK => write!(f, "top-k"),
            Self::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for MergeStrategyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" | "max-confidence" => Ok(Self::Max),
            "top-k" | "topk" => Ok(Self::TopK),
            "all" => Ok(Self::All),
            other => Err(format!("unknown merge strategy: {other}")),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-video JSON results artifact.
    Json,
    /// Per-video CSV summary.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!("CSV".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_merge_strategy_name_from_str() {
        assert_eq!("max".parse::<MergeStrategyName>().ok(), Some(MergeStrategyName::Max));
        assert_eq!("top-k".parse::<MergeStrategyName>().ok(), Some(MergeStrategyName::TopK));
        assert_eq!("all".parse::<MergeStrategyName>().ok(), Some(MergeStrategyName::All));
        assert!("best".parse::<MergeStrategyName>().is_err());
    }

    #[test]
    fn test_merge_strategy_name_to_strategy() {
        assert_eq!(
            MergeStrategyName::TopK.to_strategy(5),
            MergeStrategy::TopKPerCategory(5)
        );
        assert_eq!(
            MergeStrategyName::Max.to_strategy(5),
            MergeStrategy::MaxConfidencePerCategory
        );
    }

    #[test]
    fn test_repeat_config_defaults_match_options() {
        let config = RepeatConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.to_options(), RepeatOptions::default());
    }

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.confidence_threshold, 0.0);
        assert_eq!(defaults.top_k, 3);
        assert_eq!(defaults.min_frames_required, 1);
        assert_eq!(defaults.formats, vec![OutputFormat::Json]);
    }
}
