//! Story run command handler.

use super::RunArgs;
use super::input::read_story;
use tracing::{error, info, warn};
use visionary::{
    CancellationToken, GeminiImageGenerator, ImageGenerator, JsonError, PlaceholderGenerator,
    SegmentStatus, StoryManifest, StoryPipeline, VisionaryConfig, VisionaryResult,
    write_storyboard,
};

/// Illustrate a story and write the results.
///
/// Progress is logged as each snapshot arrives. Ctrl-C stops the run after
/// the frame in flight; unstarted segments stay pending in the manifest.
pub async fn run_story(args: &RunArgs, config: &VisionaryConfig) -> VisionaryResult<()> {
    let text = read_story(&args.story)?;

    let generator: Box<dyn ImageGenerator> = if args.placeholder {
        Box::new(PlaceholderGenerator::new())
    } else {
        Box::new(GeminiImageGenerator::new(config.gemini().to_image_config()?)?)
    };
    info!(
        provider = generator.provider_name(),
        model = generator.model_name(),
        "Using image generator"
    );

    let (mut pipeline, mut snapshots) = StoryPipeline::new(generator);

    let reporter = tokio::spawn(async move {
        while let Some(snapshot) = snapshots.recv().await {
            if *snapshot.is_running() {
                info!(
                    completed = snapshot.count(SegmentStatus::Completed),
                    failed = snapshot.count(SegmentStatus::Error),
                    "{} Frames",
                    snapshot.progress()
                );
            }
        }
    });

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current frame");
                cancel.cancel();
            }
        })
    };

    let finished = pipeline.run_story_with_cancel(&text, &cancel).await;
    interrupt.abort();
    // Closes the snapshot channel so the reporter drains and exits.
    drop(pipeline);
    if let Err(e) = reporter.await {
        error!(error = %e, "Progress reporter stopped unexpectedly");
    }
    let finished = finished?;

    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output().directory().clone());
    let manifest = match output_dir {
        Some(dir) => write_storyboard(&finished, &dir).await?,
        None => StoryManifest::from_snapshot(&finished),
    };

    info!(
        completed = *manifest.completed(),
        failed = *manifest.failed(),
        total = manifest.frames().len(),
        "Story run complete"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| JsonError::new(format!("Failed to serialize summary: {}", e)))?;
        println!("{}", json);
    }

    Ok(())
}
