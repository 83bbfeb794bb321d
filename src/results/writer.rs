//! Per-video results writers.
//!
//! JSON is the canonical output artifact, shaped parallel to the per-frame
//! input. A CSV summary can be written alongside it for spreadsheet review.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::aggregate::VideoDetectionSummary;
use crate::constants::{OUTPUT_FORMAT_VERSION, UTF8_BOM};
use crate::error::{Error, Result};
use crate::results::format::{DetectionEntry, OutputInfo, VideoEntry, VideoResultsFile};
use crate::results::loader::default_category_map;

/// Write per-video summaries as a JSON results artifact.
pub fn write_json_results(summaries: &[VideoDetectionSummary], path: &Path) -> Result<()> {
    let images = summaries
        .iter()
        .map(|summary| VideoEntry {
            file: summary.video_id.clone(),
            detections: summary
                .detections
                .iter()
                .map(|d| DetectionEntry {
                    category: d.detection.category.code().to_string(),
                    conf: d.detection.confidence,
                    bbox: d.detection.bounding_box.to_array(),
                })
                .collect(),
            frame_count: summary.frame_count,
            max_confidence_frame: summary.max_confidence_frame.clone(),
            low_sample: summary.low_sample,
        })
        .collect();

    let result = VideoResultsFile {
        images,
        info: OutputInfo {
            format_version: OUTPUT_FORMAT_VERSION.to_string(),
            aggregator: format!("trapvid {}", env!("CARGO_PKG_VERSION")),
            aggregation_time: Utc::now(),
        },
        detection_categories: default_category_map(),
    };

    let io_err = |e: std::io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &result).map_err(|e| Error::JsonWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(io_err)
}

/// Write per-video summaries as a CSV file, one row per retained detection.
///
/// Videos with no retained detections still get a row so the summary stays
/// complete.
pub fn write_csv_results(
    summaries: &[VideoDetectionSummary],
    path: &Path,
    bom_enabled: bool,
) -> Result<()> {
    let io_err = |e: std::io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(io_err)?;
    if bom_enabled {
        file.write_all(UTF8_BOM).map_err(io_err)?;
    }

    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    let map_err = |e: csv::Error| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    writer
        .write_record([
            "Video",
            "Category",
            "Confidence",
            "Frame",
            "Frame count",
            "Low sample",
        ])
        .map_err(map_err)?;

    for summary in summaries {
        let low_sample = if summary.low_sample { "yes" } else { "no" };
        let frame_count = summary.frame_count.to_string();
        if summary.detections.is_empty() {
            writer
                .write_record([
                    summary.video_id.as_str(),
                    "",
                    "",
                    "",
                    frame_count.as_str(),
                    low_sample,
                ])
                .map_err(map_err)?;
            continue;
        }
        for d in &summary.detections {
            let category = d.detection.category.to_string();
            let confidence = format!("{:.4}", d.detection.confidence);
            writer
                .write_record([
                    summary.video_id.as_str(),
                    category.as_str(),
                    confidence.as_str(),
                    d.frame_path.as_str(),
                    frame_count.as_str(),
                    low_sample,
                ])
                .map_err(map_err)?;
        }
    }

    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aggregate::{BoundingBox, Category, Detection, VideoDetection};
    use tempfile::tempdir;

    fn summary_with_detection() -> VideoDetectionSummary {
        VideoDetectionSummary {
            video_id: "cams/a.mp4".to_string(),
            detections: vec![VideoDetection {
                detection: Detection {
                    category: Category::Animal,
                    confidence: 0.95,
                    bounding_box: BoundingBox::from_array([0.1, 0.1, 0.2, 0.2]),
                },
                frame_path: "cams/a.mp4/frame000005.jpg".to_string(),
                frame_index: 5,
            }],
            frame_count: 2,
            max_confidence_frame: Some("cams/a.mp4/frame000005.jpg".to_string()),
            low_sample: false,
        }
    }

    fn empty_summary() -> VideoDetectionSummary {
        VideoDetectionSummary {
            video_id: "cams/b.mp4".to_string(),
            detections: vec![],
            frame_count: 1,
            max_confidence_frame: None,
            low_sample: true,
        }
    }

    #[test]
    fn test_json_writer_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.video_results.json");

        write_json_results(&[summary_with_detection(), empty_summary()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: VideoResultsFile = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.images.len(), 2);
        assert_eq!(parsed.images[0].file, "cams/a.mp4");
        assert_eq!(parsed.images[0].detections[0].category, "1");
        assert_eq!(parsed.images[0].frame_count, 2);
        assert_eq!(
            parsed.images[0].max_confidence_frame.as_deref(),
            Some("cams/a.mp4/frame000005.jpg")
        );
        assert!(parsed.images[1].detections.is_empty());
        assert!(parsed.images[1].low_sample);
        assert!(parsed.info.aggregator.starts_with("trapvid"));
    }

    #[test]
    fn test_csv_writer_includes_empty_video_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.video_results.csv");

        write_csv_results(&[summary_with_detection(), empty_summary()], &path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("cams/a.mp4,animal,0.9500"));
        assert!(lines[2].starts_with("cams/b.mp4,,"));
        assert!(lines[2].ends_with("yes"));
    }

    #[test]
    fn test_json_create_failure_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.video_results.json");
        let err = write_json_results(&[summary_with_detection()], &path).unwrap_err();
        assert!(err.to_string().contains("out.video_results.json"));
    }

    #[test]
    fn test_csv_create_failure_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.video_results.csv");
        let err = write_csv_results(&[summary_with_detection()], &path, true).unwrap_err();
        assert!(err.to_string().contains("out.video_results.csv"));
    }

    #[test]
    fn test_csv_writer_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.video_results.csv");

        write_csv_results(&[empty_summary()], &path, true).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }
}
