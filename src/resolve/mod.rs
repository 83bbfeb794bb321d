//! Frame-to-video identity resolution.
//!
//! The rule mapping an extracted frame path back to its source video is
//! dataset-layout-dependent, so it is an injected capability rather than
//! hard-coded parsing inside the aggregator. The default implementation
//! matches the layout the standard frame-extraction step produces.

use tracing::warn;

use crate::aggregate::FrameDetectionRecord;
use crate::constants::frames;
use crate::results::DecodedFrame;

/// Video identity and frame position resolved from a frame path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRef {
    /// Source video identifier (relative path from the input root).
    pub video_id: String,
    /// Ordinal position of the frame within the video.
    pub frame_index: u64,
}

/// Resolves a frame path to its source video and frame index.
pub trait FrameResolver {
    /// Resolve one frame path. `None` means the record cannot be attributed
    /// to a video and will be skipped with a warning.
    fn resolve(&self, frame_path: &str) -> Option<FrameRef>;
}

/// Resolver for the standard frame-extraction layout.
///
/// Extracted frames land in a folder named after the source video file,
/// with the frame index embedded in the file stem:
/// `clips/cam03.mp4/frame000123.jpg` -> video `clips/cam03.mp4`, frame 123.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderFrameResolver;

impl FrameResolver for FolderFrameResolver {
    fn resolve(&self, frame_path: &str) -> Option<FrameRef> {
        let normalized = frame_path.replace('\\', "/");
        let (parent, file_name) = normalized.rsplit_once('/')?;
        if parent.is_empty() {
            return None;
        }

        let stem = file_name.rsplit_once('.').map_or(file_name, |(s, _)| s);
        let digits: String = stem
            .strip_prefix(frames::FILE_PREFIX)
            .unwrap_or(stem)
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let frame_index = digits.parse().ok()?;

        Some(FrameRef {
            video_id: parent.to_string(),
            frame_index,
        })
    }
}

/// Attach video identities to decoded frames.
///
/// Frames the resolver cannot place are skipped and counted; the failure is
/// local, never fatal to the batch. Returns the resolved records and the
/// number of skipped frames.
pub fn resolve_records<R: FrameResolver>(
    frames: Vec<DecodedFrame>,
    resolver: &R,
) -> (Vec<FrameDetectionRecord>, usize) {
    let mut records = Vec::with_capacity(frames.len());
    let mut skipped = 0;

    for frame in frames {
        match resolver.resolve(&frame.frame_path) {
            Some(frame_ref) => records.push(FrameDetectionRecord {
                frame_path: frame.frame_path,
                video_id: frame_ref.video_id,
                frame_index: frame_ref.frame_index,
                detections: frame.detections,
            }),
            None => {
                warn!(
                    "Could not resolve source video for frame '{}', skipping",
                    frame.frame_path
                );
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_resolver_standard_layout() {
        let resolver = FolderFrameResolver;
        let frame_ref = resolver.resolve("clips/cam03.mp4/frame000123.jpg").unwrap();
        assert_eq!(frame_ref.video_id, "clips/cam03.mp4");
        assert_eq!(frame_ref.frame_index, 123);
    }

    #[test]
    fn test_folder_resolver_nested_path() {
        let resolver = FolderFrameResolver;
        let frame_ref = resolver
            .resolve("site-a/2024/cam1.avi/frame000004.png")
            .unwrap();
        assert_eq!(frame_ref.video_id, "site-a/2024/cam1.avi");
        assert_eq!(frame_ref.frame_index, 4);
    }

    #[test]
    fn test_folder_resolver_windows_separators() {
        let resolver = FolderFrameResolver;
        let frame_ref = resolver.resolve("clips\\cam1.mp4\\frame000002.jpg").unwrap();
        assert_eq!(frame_ref.video_id, "clips/cam1.mp4");
        assert_eq!(frame_ref.frame_index, 2);
    }

    #[test]
    fn test_folder_resolver_rejects_bare_file() {
        let resolver = FolderFrameResolver;
        assert!(resolver.resolve("frame000001.jpg").is_none());
    }

    #[test]
    fn test_folder_resolver_rejects_no_digits() {
        let resolver = FolderFrameResolver;
        assert!(resolver.resolve("a.mp4/thumbnail.jpg").is_none());
    }

    #[test]
    fn test_resolve_records_skips_and_counts() {
        let frames = vec![
            DecodedFrame {
                frame_path: "a.mp4/frame000000.jpg".to_string(),
                detections: vec![],
            },
            DecodedFrame {
                frame_path: "orphan.jpg".to_string(),
                detections: vec![],
            },
        ];
        let (records, skipped) = resolve_records(frames, &FolderFrameResolver);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(records[0].video_id, "a.mp4");
    }
}
