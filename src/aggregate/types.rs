//! Detection record and summary type definitions.

use serde::{Deserialize, Serialize};

use crate::constants::{bbox, confidence};

/// Detection category produced by the detector.
///
/// `MegaDetector` emits a fixed three-class vocabulary; anything else in the
/// input is rejected at the decode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Any animal.
    Animal,
    /// A person.
    Person,
    /// A vehicle.
    Vehicle,
}

impl Category {
    /// The standard `MegaDetector` numeric category code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Animal => "1",
            Self::Person => "2",
            Self::Vehicle => "3",
        }
    }

    /// Parse a category from its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "animal" => Some(Self::Animal),
            "person" => Some(Self::Person),
            "vehicle" => Some(Self::Vehicle),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Animal => write!(f, "animal"),
            Self::Person => write!(f, "person"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// Normalized image-relative bounding box.
///
/// Coordinates are fractions of image width/height, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl BoundingBox {
    /// Create a bounding box from the `[x, y, w, h]` array form used in
    /// results artifacts.
    pub fn from_array(b: [f32; 4]) -> Self {
        Self {
            x: b[0],
            y: b[1],
            width: b[2],
            height: b[3],
        }
    }

    /// The `[x, y, w, h]` array form.
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Check coordinate ranges and the containment invariant.
    ///
    /// Returns a human-readable reason when the box is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !(in_unit(self.x) && in_unit(self.y) && in_unit(self.width) && in_unit(self.height)) {
            return Err(format!(
                "coordinates outside [0,1]: [{}, {}, {}, {}]",
                self.x, self.y, self.width, self.height
            ));
        }
        if self.x + self.width > 1.0 + bbox::TOLERANCE {
            return Err(format!(
                "box extends past right edge (x+w = {})",
                self.x + self.width
            ));
        }
        if self.y + self.height > 1.0 + bbox::TOLERANCE {
            return Err(format!(
                "box extends past bottom edge (y+h = {})",
                self.y + self.height
            ));
        }
        Ok(())
    }
}

/// A single detection in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detected class.
    pub category: Category,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Normalized bounding box.
    pub bounding_box: BoundingBox,
}

impl Detection {
    /// Validate confidence range and bounding box invariants.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(confidence::MIN..=confidence::MAX).contains(&self.confidence) {
            return Err(format!("confidence out of range: {}", self.confidence));
        }
        self.bounding_box.validate()
    }
}

/// Detections found in one extracted frame, with its video identity resolved.
#[derive(Debug, Clone)]
pub struct FrameDetectionRecord {
    /// Path of the extracted frame image.
    pub frame_path: String,
    /// Identifier of the source video (relative path from the input root).
    pub video_id: String,
    /// Ordinal position of this frame within its source video.
    pub frame_index: u64,
    /// Detections found in this frame (possibly empty).
    pub detections: Vec<Detection>,
}

/// A detection retained in a video summary, with frame traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetection {
    /// The retained detection.
    pub detection: Detection,
    /// Frame the detection came from.
    pub frame_path: String,
    /// Index of that frame within the video.
    pub frame_index: u64,
}

/// Aggregated detection results for one source video.
#[derive(Debug, Clone)]
pub struct VideoDetectionSummary {
    /// Identifier of the source video.
    pub video_id: String,
    /// Detections retained by the merge strategy.
    pub detections: Vec<VideoDetection>,
    /// Number of frames that contributed to this summary.
    pub frame_count: usize,
    /// Frame that produced the highest-confidence retained detection.
    pub max_confidence_frame: Option<String>,
    /// Contributing frame count fell below the configured minimum.
    pub low_sample: bool,
}
