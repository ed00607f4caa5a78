//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the visionary binary.

mod commands;
mod input;
mod run;
mod segment;

pub use commands::{Cli, Commands, RunArgs, StoryInput};
pub use run::run_story;
pub use segment::print_segments;
