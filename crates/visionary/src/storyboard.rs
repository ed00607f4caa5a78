//! Writing a finished run to disk.
//!
//! A storyboard directory holds one `frame-NNN.<ext>` file per completed
//! segment and a `story.json` manifest describing every segment, with image
//! payloads replaced by file names.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};
use visionary_core::{Image, RunProgress, RunSnapshot, SegmentId, SegmentStatus};
use visionary_error::{IoError, JsonError, VisionaryResult};

/// File name of the manifest inside a storyboard directory.
pub const MANIFEST_FILE: &str = "story.json";

/// One segment as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct FrameEntry {
    /// Segment id
    id: SegmentId,
    /// Position in the story
    index: usize,
    /// Segment text
    text: String,
    /// Final status
    status: SegmentStatus,
    /// Image file name, for completed segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    /// Failure message, for failed segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

/// Summary of a run, written as `story.json`.
///
/// # Examples
///
/// ```
/// use visionary::{RunSnapshot, StoryManifest};
///
/// let manifest = StoryManifest::from_snapshot(&RunSnapshot::default());
/// assert!(manifest.frames().is_empty());
/// assert_eq!(manifest.progress().to_string(), "0 / 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryManifest {
    /// Every segment, in story order
    frames: Vec<FrameEntry>,
    /// Progress when the manifest was taken
    progress: RunProgress,
    /// Number of completed frames
    completed: usize,
    /// Number of failed frames
    failed: usize,
}

impl StoryManifest {
    /// Build the manifest for a snapshot.
    pub fn from_snapshot(snapshot: &RunSnapshot) -> Self {
        let frames = snapshot
            .segments()
            .iter()
            .map(|segment| FrameEntry {
                id: segment.id().clone(),
                index: *segment.index(),
                text: segment.text().clone(),
                status: *segment.status(),
                file: segment
                    .image()
                    .as_ref()
                    .map(|image| frame_file_name(*segment.index(), image)),
                error_message: segment.error_message().clone(),
            })
            .collect();

        Self {
            frames,
            progress: *snapshot.progress(),
            completed: snapshot.count(SegmentStatus::Completed),
            failed: snapshot.count(SegmentStatus::Error),
        }
    }
}

/// File name for the frame at `index`.
///
/// ```
/// use visionary::{Image, frame_file_name};
///
/// let image = Image::new("image/png", vec![0u8]);
/// assert_eq!(frame_file_name(7, &image), "frame-007.png");
/// ```
pub fn frame_file_name(index: usize, image: &Image) -> String {
    format!("frame-{:03}.{}", index, image.extension())
}

/// Write every completed frame and the manifest into `dir`.
///
/// The directory is created if needed. Files are written to a temporary
/// name and renamed into place. Frame files left by an earlier run that the
/// new manifest does not list are removed.
#[instrument(skip_all, fields(dir = %dir.display(), segments = snapshot.segments().len()))]
pub async fn write_storyboard(
    snapshot: &RunSnapshot,
    dir: &Path,
) -> VisionaryResult<StoryManifest> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| IoError::new(format!("{}: {}", dir.display(), e)))?;

    let manifest = StoryManifest::from_snapshot(snapshot);
    remove_stale_frames(dir, &manifest).await?;

    for segment in snapshot.segments() {
        if let Some(image) = segment.image() {
            let name = frame_file_name(*segment.index(), image);
            write_atomic(&dir.join(&name), image.data()).await?;
            debug!(file = %name, bytes = image.len(), "Wrote frame");
        }
    }

    let json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| JsonError::new(format!("Failed to serialize manifest: {}", e)))?;
    write_atomic(&dir.join(MANIFEST_FILE), &json).await?;

    info!(
        completed = *manifest.completed(),
        failed = *manifest.failed(),
        "Storyboard written"
    );
    Ok(manifest)
}

async fn remove_stale_frames(dir: &Path, manifest: &StoryManifest) -> VisionaryResult<()> {
    let keep: HashSet<&str> = manifest
        .frames()
        .iter()
        .filter_map(|frame| frame.file().as_deref())
        .collect();

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| IoError::new(format!("{}: {}", dir.display(), e)))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| IoError::new(format!("{}: {}", dir.display(), e)))?
    {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with("frame-") || keep.contains(name) {
            continue;
        }
        let path = entry.path();
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| IoError::new(format!("{}: {}", path.display(), e)))?;
        debug!(file = %name, "Removed stale frame");
    }
    Ok(())
}

async fn write_atomic(path: &Path, data: &[u8]) -> VisionaryResult<()> {
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, data)
        .await
        .map_err(|e| IoError::new(format!("{}: {}", temp_path.display(), e)))?;
    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        IoError::new(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        ))
    })?;
    Ok(())
}
