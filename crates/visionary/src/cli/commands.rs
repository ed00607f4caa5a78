//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Visionary - illustrate a story frame by frame
#[derive(Parser, Debug)]
#[command(name = "visionary")]
#[command(about = "Illustrate a story frame by frame with consistent characters and settings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Illustrate a story
    Run(RunArgs),

    /// Print the segments a story is split into
    Segment {
        #[command(flatten)]
        input: StoryInput,
    },
}

/// Where the story text comes from. Standard input when neither is given.
#[derive(Args, Debug, Clone, Default)]
pub struct StoryInput {
    /// Read the story from a file
    #[arg(long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Story text given inline
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments of `visionary run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub story: StoryInput,

    /// Directory for frames and story.json
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Draw placeholder frames instead of calling the image model
    #[arg(long)]
    pub placeholder: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
