//! Data structures produced while running the manifest pipeline.

use std::path::PathBuf;

use serde::Serialize;

use crate::project::ManifestPaths;

/// Position of a run in the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
  /// Not started yet.
  Idle,
  /// Enumerating descriptor files.
  Scanning,
  /// Deriving companion texture paths.
  Deriving,
  /// Checking which companions exist.
  Filtering,
  /// Extracting final identifiers.
  Normalizing,
  /// Writing the manifests.
  Writing,
  /// Finished successfully.
  Done,
  /// Aborted by a fatal error or cancellation.
  Errored,
}

impl PipelineStage {
  /// Stable lowercase name used in logs and status events.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Idle => "idle",
      Self::Scanning => "scanning",
      Self::Deriving => "deriving",
      Self::Filtering => "filtering",
      Self::Normalizing => "normalizing",
      Self::Writing => "writing",
      Self::Done => "done",
      Self::Errored => "errored",
    }
  }

  /// Progress reached once this stage has completed.
  pub fn progress_percent(self) -> u8 {
    match self {
      Self::Idle | Self::Errored => 0,
      Self::Scanning => 20,
      Self::Deriving => 40,
      Self::Filtering => 60,
      Self::Normalizing => 80,
      Self::Writing | Self::Done => 100,
    }
  }

  /// Whether the run can no longer progress.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Done | Self::Errored)
  }
}

impl std::fmt::Display for PipelineStage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Outcome of the existence filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceReport {
  /// Number of companion candidates checked.
  pub total: usize,
  /// Companions found on disk, in candidate order.
  pub retained: Vec<PathBuf>,
}

/// Outcome of identifier normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierReport {
  /// Identifiers rooted at the marker segment, in companion order.
  pub identifiers: Vec<String>,
  /// Companions whose descriptor lacked the marker segment.
  pub dropped: usize,
}

/// Counts and outputs of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  /// Root directory that was scanned.
  pub root: PathBuf,
  /// Descriptor files found.
  pub descriptors: usize,
  /// Companion paths derived (always equal to `descriptors`).
  pub companions: usize,
  /// Companion textures that exist on disk.
  pub valid_companions: usize,
  /// Identifiers written to the identifier manifest.
  pub identifiers: usize,
  /// Valid companions whose descriptor had no marker segment.
  pub dropped_identifiers: usize,
  /// Manifests written by the run; `None` when the scan found nothing.
  pub manifests: Option<ManifestPaths>,
  /// Set when the scan found no descriptors and the later stages were skipped.
  pub short_circuited: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_is_monotonic_along_the_happy_path() {
    let path = [
      PipelineStage::Idle,
      PipelineStage::Scanning,
      PipelineStage::Deriving,
      PipelineStage::Filtering,
      PipelineStage::Normalizing,
      PipelineStage::Writing,
      PipelineStage::Done,
    ];
    assert!(path
      .windows(2)
      .all(|pair| pair[0].progress_percent() <= pair[1].progress_percent()));
    assert_eq!(PipelineStage::Done.progress_percent(), 100);
  }

  #[test]
  fn only_done_and_errored_are_terminal() {
    assert!(PipelineStage::Done.is_terminal());
    assert!(PipelineStage::Errored.is_terminal());
    assert!(!PipelineStage::Writing.is_terminal());
  }
}
