//! Frame-to-video detection aggregation.
//!
//! This module is the pure core of the tool: it consumes resolved per-frame
//! detection records and reduces them into one summary per source video
//! under a configurable policy. All I/O lives in the surrounding modules.

mod aggregator;
mod diagnostics;
mod policy;
mod repeat;
mod types;

pub use aggregator::{AggregateOutput, aggregate};
pub use diagnostics::{Diagnostics, DroppedDetection};
pub use policy::{AggregationPolicy, MergeStrategy};
pub use repeat::{RepeatOptions, suppress_repeats};
pub use types::{
    BoundingBox, Category, Detection, FrameDetectionRecord, VideoDetection,
    VideoDetectionSummary,
};
