//! Results artifact input/output boundary.
//!
//! Typed decode of the per-frame batch results format on the way in,
//! structurally-parallel per-video artifacts on the way out.

pub mod format;
mod loader;
mod writer;

pub use loader::{DecodedFrame, LoadedResults, default_category_map, load_results_file};
pub use writer::{write_csv_results, write_json_results};
