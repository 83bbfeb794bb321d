//! Command-line interface definitions.

mod args;

pub use args::{AggregateArgs, Cli, Command, ConfigAction};
