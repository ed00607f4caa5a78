//! Visionary CLI binary.
//!
//! - Illustrate a story, writing frames and a manifest
//! - Show how a story is segmented

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_segments, run_story};

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => {
            let config = match &cli.config {
                Some(path) => visionary::VisionaryConfig::from_file(path)?,
                None => visionary::VisionaryConfig::load()?,
            };
            run_story(&args, &config).await?;
        }

        Commands::Segment { input } => {
            print_segments(&input)?;
        }
    }

    Ok(())
}
