//! Pipeline orchestrator driving the stage sequence and publishing status events.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::manifest::{
  derive_companions, filter_existing, normalize_identifiers, scan_descriptors, write_manifests,
};
use crate::models::{PipelineStage, RunSummary};
use crate::status::{StatusEvent, StatusSink};

/// Cooperative cancellation flag checked between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  /// Create a token that has not been cancelled.
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation; the run stops before its next stage.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  /// Whether cancellation was requested.
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// High-level helper running the descriptor manifest pipeline over one root directory.
#[derive(Debug)]
pub struct ManifestBuilder {
  root: PathBuf,
  config: PipelineConfig,
  stage: Arc<Mutex<PipelineStage>>,
}

impl ManifestBuilder {
  /// Create a builder for `root` with an explicit configuration.
  ///
  /// The caller is expected to have checked that `root` is an existing directory.
  pub fn new(root: impl Into<PathBuf>, config: PipelineConfig) -> Self {
    Self {
      root: root.into(),
      config,
      stage: Arc::new(Mutex::new(PipelineStage::Idle)),
    }
  }

  /// Create a builder using the configuration discovered inside `root`.
  pub fn discover(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let config = PipelineConfig::discover(&root);
    Self::new(root, config)
  }

  /// Root directory being processed.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Configuration in effect.
  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// Current position in the state machine.
  pub fn stage(&self) -> PipelineStage {
    read_stage(&self.stage)
  }

  /// Run every stage on the calling thread, publishing progress to `sink`.
  ///
  /// Exactly one terminal event is published: [`StatusEvent::Completed`] on success or
  /// [`StatusEvent::Failed`] when a fatal error or cancellation stops the run.
  pub fn run(&self, sink: &dyn StatusSink, cancel: &CancelToken) -> PipelineResult<RunSummary> {
    let mut progress = Progress {
      sink,
      stage: &self.stage,
      percent: 0,
    };
    progress.enter(PipelineStage::Idle, "ready");

    match self.execute(&mut progress, cancel) {
      Ok(summary) => {
        progress.enter(PipelineStage::Done, &completion_message(&summary));
        sink.publish(StatusEvent::Completed(summary.clone()));
        Ok(summary)
      }
      Err(err) => {
        let failed_in = read_stage(&self.stage);
        write_stage(&self.stage, PipelineStage::Errored);
        tracing::error!(stage = failed_in.as_str(), "run aborted: {err}");
        sink.publish(StatusEvent::Failed {
          stage: failed_in,
          error: err.to_string(),
        });
        Err(err)
      }
    }
  }

  /// Run the pipeline on a dedicated thread so the caller stays responsive.
  pub fn spawn<S>(self, sink: S) -> std::io::Result<PipelineHandle>
  where
    S: StatusSink + 'static,
  {
    let cancel = CancelToken::new();
    let stage = Arc::clone(&self.stage);
    let worker_cancel = cancel.clone();
    let thread = std::thread::Builder::new()
      .name("vmat-manifest".into())
      .spawn(move || self.run(&sink, &worker_cancel))?;

    Ok(PipelineHandle {
      thread,
      cancel,
      stage,
    })
  }

  fn execute(&self, progress: &mut Progress<'_>, cancel: &CancelToken) -> PipelineResult<RunSummary> {
    let layout = self.config.to_layout();
    let mut summary = RunSummary {
      root: self.root.clone(),
      ..RunSummary::default()
    };

    checkpoint(cancel, PipelineStage::Scanning)?;
    progress.enter(PipelineStage::Scanning, "step 1: finding descriptor files");
    let descriptors = scan_descriptors(&self.root, &layout)?;
    summary.descriptors = descriptors.len();
    progress.finish(&format!("found {} descriptor files", descriptors.len()));

    if descriptors.is_empty() {
      tracing::debug!(root = %self.root.display(), "no descriptor files found");
      summary.short_circuited = true;
      return Ok(summary);
    }

    checkpoint(cancel, PipelineStage::Deriving)?;
    progress.enter(PipelineStage::Deriving, "step 2: deriving companion texture paths");
    let companions = derive_companions(&layout, &descriptors);
    summary.companions = companions.len();
    progress.finish(&format!("derived {} companion paths", companions.len()));

    checkpoint(cancel, PipelineStage::Filtering)?;
    progress.enter(PipelineStage::Filtering, "step 3: validating companion textures");
    let existence = filter_existing(&companions, self.config.resolved_workers())?;
    summary.valid_companions = existence.retained.len();
    progress.finish(&format!(
      "found {} valid companion textures out of {}",
      existence.retained.len(),
      existence.total
    ));

    checkpoint(cancel, PipelineStage::Normalizing)?;
    progress.enter(PipelineStage::Normalizing, "step 4: creating final identifier list");
    let identifiers = normalize_identifiers(&layout, &existence.retained);
    summary.identifiers = identifiers.identifiers.len();
    summary.dropped_identifiers = identifiers.dropped;
    progress.finish(&format!(
      "kept {} identifiers, dropped {} without a {} segment",
      identifiers.identifiers.len(),
      identifiers.dropped,
      layout.marker_segment
    ));

    checkpoint(cancel, PipelineStage::Writing)?;
    progress.enter(PipelineStage::Writing, "saving output files");
    let manifests = write_manifests(
      &self.root,
      &layout,
      &existence.retained,
      &identifiers.identifiers,
    )?;
    progress.finish("saved output files");
    summary.manifests = Some(manifests);

    Ok(summary)
  }
}

/// Handle to a pipeline running on a background thread.
#[derive(Debug)]
pub struct PipelineHandle {
  thread: JoinHandle<PipelineResult<RunSummary>>,
  cancel: CancelToken,
  stage: Arc<Mutex<PipelineStage>>,
}

impl PipelineHandle {
  /// Ask the run to stop before its next stage.
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  /// Token controlling this run, for sharing with other parts of the caller.
  pub fn cancel_token(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// Current position in the state machine.
  pub fn stage(&self) -> PipelineStage {
    read_stage(&self.stage)
  }

  /// Whether the background thread has exited.
  pub fn is_finished(&self) -> bool {
    self.thread.is_finished()
  }

  /// Wait for the run to finish and return its outcome.
  pub fn join(self) -> PipelineResult<RunSummary> {
    self
      .thread
      .join()
      .map_err(|_| PipelineError::WorkerPanicked)?
  }
}

struct Progress<'a> {
  sink: &'a dyn StatusSink,
  stage: &'a Mutex<PipelineStage>,
  percent: u8,
}

impl Progress<'_> {
  fn enter(&mut self, stage: PipelineStage, message: &str) {
    write_stage(self.stage, stage);
    if stage == PipelineStage::Done {
      self.percent = stage.progress_percent();
    }
    tracing::debug!(stage = stage.as_str(), "{message}");
    self.publish(stage, message);
  }

  fn finish(&mut self, message: &str) {
    let stage = read_stage(self.stage);
    self.percent = self.percent.max(stage.progress_percent());
    tracing::debug!(stage = stage.as_str(), "{message}");
    self.publish(stage, message);
  }

  fn publish(&self, stage: PipelineStage, message: &str) {
    self.sink.publish(StatusEvent::Progress {
      stage,
      percent: self.percent,
      message: message.to_string(),
    });
  }
}

fn checkpoint(cancel: &CancelToken, next: PipelineStage) -> PipelineResult<()> {
  if cancel.is_cancelled() {
    return Err(PipelineError::Cancelled { stage: next });
  }
  Ok(())
}

fn completion_message(summary: &RunSummary) -> String {
  if summary.short_circuited {
    "no descriptor files found".to_string()
  } else {
    format!(
      "processing complete, created {} material entries",
      summary.identifiers
    )
  }
}

fn read_stage(stage: &Mutex<PipelineStage>) -> PipelineStage {
  *stage.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_stage(stage: &Mutex<PipelineStage>, next: PipelineStage) {
  *stage.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
}
