//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    ConsistencyReport, check_video_consistency, collect_video_ids, is_video_file, output_dir_for,
    output_path_for,
};
pub use processor::{ProcessOptions, ProcessResult, process_results_file};
