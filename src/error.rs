//! Error types surfaced by a pipeline run.

use std::path::PathBuf;

use crate::models::PipelineStage;

/// Generic result type used across the crate.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal conditions that abort a run.
///
/// Missing companions, descriptors without a marker segment and empty roots are ordinary
/// outcomes reported through counts, never through this type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  /// Directory traversal failed below the root.
  #[error("failed to scan {}: {source}", .path.display())]
  Scan {
    /// Path being visited when the traversal failed.
    path: PathBuf,
    /// Underlying traversal error.
    #[source]
    source: walkdir::Error,
  },
  /// A manifest could not be written.
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    /// Manifest path that failed.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// The run was cancelled before `stage` started.
  #[error("cancelled before {} stage", .stage.as_str())]
  Cancelled {
    /// Stage that was about to run.
    stage: PipelineStage,
  },
  /// The pipeline thread or one of its existence-check workers panicked.
  #[error("pipeline worker thread panicked")]
  WorkerPanicked,
}

impl PipelineError {
  /// Path associated with the failure, if any.
  pub fn path(&self) -> Option<&std::path::Path> {
    match self {
      Self::Scan { path, .. } | Self::Write { path, .. } => Some(path),
      Self::Cancelled { .. } | Self::WorkerPanicked => None,
    }
  }
}
