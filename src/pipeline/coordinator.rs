//! Pipeline coordination: file enumeration, output paths, consistency check.

use std::path::{Path, PathBuf};

use crate::aggregate::VideoDetectionSummary;
use crate::config::OutputFormat;
use crate::constants::{VIDEO_EXTENSIONS, output_extensions};
use crate::error::{Error, Result};

/// Determine the output directory for a results file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get the output file path for a given format.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    // to_string_lossy() handles non-UTF-8 filenames gracefully
    let stem = input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );

    let extension = match format {
        OutputFormat::Json => output_extensions::JSON,
        OutputFormat::Csv => output_extensions::CSV,
    };

    output_dir.join(format!("{stem}{extension}"))
}

/// Enumerate video files under a root, as root-relative identifiers.
///
/// Identifiers use forward slashes regardless of platform, matching the
/// `video_id` form used in results artifacts. The list is sorted for
/// deterministic reporting.
pub fn collect_video_ids(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(Error::VideoRootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut ids = Vec::new();
    collect_video_ids_recursive(root, root, &mut ids)?;
    ids.sort();
    Ok(ids)
}

fn collect_video_ids_recursive(root: &Path, dir: &Path, ids: &mut Vec<String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_video_ids_recursive(root, &path, ids)?;
        } else if is_video_file(&path) {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            ids.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }

    Ok(())
}

/// Check if a file is a recognized video format.
pub fn is_video_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        VIDEO_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(OsStr::new(candidate)))
    })
}

/// Result of checking aggregation output against the videos on disk.
#[derive(Debug, Default)]
pub struct ConsistencyReport {
    /// Videos present on disk but absent from the results (frames were
    /// never extracted for them).
    pub missing_from_results: Vec<String>,
    /// Emitted video ids with no matching file on disk.
    pub unknown_video_ids: Vec<String>,
}

impl ConsistencyReport {
    /// Whether output and filesystem agree.
    pub fn is_consistent(&self) -> bool {
        self.missing_from_results.is_empty() && self.unknown_video_ids.is_empty()
    }
}

/// Compare emitted summaries against the independently-enumerated video
/// list. Mismatches are diagnostics for the caller, never fabricated
/// entries in the output.
pub fn check_video_consistency(
    summaries: &[VideoDetectionSummary],
    video_ids: &[String],
) -> ConsistencyReport {
    use std::collections::HashSet;

    let on_disk: HashSet<&str> = video_ids.iter().map(String::as_str).collect();
    let emitted: HashSet<&str> = summaries.iter().map(|s| s.video_id.as_str()).collect();

    let mut report = ConsistencyReport::default();
    for id in video_ids {
        if !emitted.contains(id.as_str()) {
            report.missing_from_results.push(id.clone());
        }
    }
    for summary in summaries {
        if !on_disk.contains(summary.video_id.as_str()) {
            report.unknown_video_ids.push(summary.video_id.clone());
        }
    }
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(video_id: &str) -> VideoDetectionSummary {
        VideoDetectionSummary {
            video_id: video_id.to_string(),
            detections: vec![],
            frame_count: 1,
            max_confidence_frame: None,
            low_sample: false,
        }
    }

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/results.json");
        assert_eq!(
            output_dir_for(input, Some(Path::new("/out"))),
            PathBuf::from("/out")
        );
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let input = Path::new("/data/results.json");
        assert_eq!(output_dir_for(input, None), PathBuf::from("/data"));
    }

    #[test]
    fn test_output_path_for_json() {
        let path = output_path_for(
            Path::new("md_results.json"),
            Path::new("/out"),
            OutputFormat::Json,
        );
        assert!(path.to_string_lossy().ends_with("md_results.video_results.json"));
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("clip.mp4")));
        assert!(is_video_file(Path::new("clip.AVI")));
        assert!(is_video_file(Path::new("clip.mov")));
        assert!(!is_video_file(Path::new("frame000001.jpg")));
        assert!(!is_video_file(Path::new("notes.txt")));
    }

    #[test]
    fn test_collect_video_ids_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("site-b")).unwrap();
        std::fs::write(dir.path().join("site-b/cam2.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("cam1.avi"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let ids = collect_video_ids(dir.path()).unwrap();
        assert_eq!(ids, vec!["cam1.avi".to_string(), "site-b/cam2.mp4".to_string()]);
    }

    #[test]
    fn test_collect_video_ids_missing_root() {
        let result = collect_video_ids(Path::new("/nonexistent/videos"));
        assert!(matches!(result, Err(Error::VideoRootNotFound { .. })));
    }

    #[test]
    fn test_consistency_check_reports_both_directions() {
        let summaries = vec![summary("a.mp4"), summary("ghost.mp4")];
        let on_disk = vec!["a.mp4".to_string(), "b.mp4".to_string()];

        let report = check_video_consistency(&summaries, &on_disk);
        assert_eq!(report.missing_from_results, vec!["b.mp4".to_string()]);
        assert_eq!(report.unknown_video_ids, vec!["ghost.mp4".to_string()]);
        assert!(!report.is_consistent());
    }

    #[test]
    fn test_consistency_check_clean() {
        let summaries = vec![summary("a.mp4")];
        let on_disk = vec!["a.mp4".to_string()];
        assert!(check_video_consistency(&summaries, &on_disk).is_consistent());
    }
}
