//! Asynchronous file intake.
//!
//! Each file is read by its own future into an [`ImageReady`] event; the
//! events are applied one at a time through [`Controller::apply_intake`].

use crate::error::Result;
use crate::image::{to_data_url, ImageFormat};
use crate::session::controller::Controller;
use futures::future::join_all;
use std::path::{Path, PathBuf};

/// A file finished loading as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReady {
    /// The image as a base64 data URL.
    pub data: String,
}

/// What happened to a batch of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeReport {
    /// Ids of images appended.
    pub added: Vec<String>,
    /// Files that are not images.
    pub skipped: Vec<PathBuf>,
    /// Files not read because no slot was free.
    pub over_limit: Vec<PathBuf>,
    /// Files that could not be read.
    pub failed: Vec<PathBuf>,
}

/// Reads one file. Returns `None` if it is not a recognizable image.
pub async fn read_image_file(path: impl AsRef<Path>) -> Result<Option<ImageReady>> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;

    let format = ImageFormat::from_magic_bytes(&data).or_else(|| {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
    });

    Ok(format.map(|f| ImageReady {
        data: to_data_url(f.mime_type(), &data),
    }))
}

/// Loads files into the controller.
///
/// Only as many files as there are free slots are read; the rest are
/// reported as over the limit.
pub async fn intake_files(controller: &mut Controller, paths: &[PathBuf]) -> IntakeReport {
    let mut report = IntakeReport::default();
    let slots = controller.state().remaining_slots();
    let (accepted, rest) = paths.split_at(slots.min(paths.len()));
    report.over_limit.extend(rest.iter().cloned());

    if accepted.is_empty() {
        return report;
    }

    let reads = join_all(accepted.iter().map(|p| async move { (p, read_image_file(p).await) })).await;

    for (path, outcome) in reads {
        match outcome {
            Ok(Some(event)) => match controller.apply_intake(event) {
                Some(id) => report.added.push(id),
                None => report.over_limit.push(path.clone()),
            },
            Ok(None) => {
                tracing::debug!(path = %path.display(), "skipping non-image file");
                report.skipped.push(path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read image");
                report.failed.push(path.clone());
            }
        }
    }

    report
}
