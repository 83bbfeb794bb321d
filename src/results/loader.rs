//! Results artifact loading and decoding.
//!
//! Reads a per-frame batch results file and turns raw entries into typed
//! frames at the boundary, so downstream code never touches loose JSON.
//! A file that does not match the expected shape fails fast before any
//! partial output is produced; per-detection problems are recovered locally.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::aggregate::{BoundingBox, Category, Detection};
use crate::error::{Error, Result};
use crate::results::format::ResultsFile;

/// One decoded frame: typed detections, video identity not yet resolved.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Frame image path as recorded in the artifact.
    pub frame_path: String,
    /// Typed detections (bounding boxes not yet validated).
    pub detections: Vec<Detection>,
}

/// Decoded contents of a batch results file.
#[derive(Debug)]
pub struct LoadedResults {
    /// Frames that carried detection results.
    pub frames: Vec<DecodedFrame>,
    /// Images the detector marked as failed.
    pub failed_images: usize,
    /// Detections dropped for carrying an unknown category code.
    pub unknown_categories: usize,
}

/// The standard `MegaDetector` category map, used when the artifact
/// carries none.
pub fn default_category_map() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("1".to_string(), "animal".to_string()),
        ("2".to_string(), "person".to_string()),
        ("3".to_string(), "vehicle".to_string()),
    ])
}

/// Load and decode a per-frame batch results file.
pub fn load_results_file(path: &Path) -> Result<LoadedResults> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::ResultsRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let parsed: ResultsFile =
        serde_json::from_str(&contents).map_err(|e| Error::ResultsParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    decode_results(parsed)
}

/// Decode a parsed results file into typed frames.
pub fn decode_results(parsed: ResultsFile) -> Result<LoadedResults> {
    let category_map = parsed
        .detection_categories
        .unwrap_or_else(default_category_map);

    let mut frames = Vec::with_capacity(parsed.images.len());
    let mut failed_images = 0;
    let mut unknown_categories = 0;

    for image in parsed.images {
        if image.failure.is_some() {
            failed_images += 1;
            continue;
        }

        let Some(raw_detections) = image.detections else {
            return Err(Error::InvalidResultsFormat {
                message: format!(
                    "image entry '{}' has neither detections nor a failure marker",
                    image.file
                ),
            });
        };

        let mut detections = Vec::with_capacity(raw_detections.len());
        for raw in raw_detections {
            let category = category_map
                .get(&raw.category)
                .and_then(|name| Category::from_name(name));
            let Some(category) = category else {
                unknown_categories += 1;
                warn!(
                    "Dropping detection with unknown category '{}' in '{}'",
                    raw.category, image.file
                );
                continue;
            };
            detections.push(Detection {
                category,
                confidence: raw.conf,
                bounding_box: BoundingBox::from_array(raw.bbox),
            });
        }

        frames.push(DecodedFrame {
            frame_path: image.file,
            detections,
        });
    }

    Ok(LoadedResults {
        frames,
        failed_images,
        unknown_categories,
    })
}
