//! Status reporting decoupled from any particular UI or threading model.
//!
//! The pipeline publishes [`StatusEvent`]s to a [`StatusSink`]. Events arrive in the order
//! they were produced, progress percentages never decrease, and every run ends with exactly
//! one terminal event ([`StatusEvent::Completed`] or [`StatusEvent::Failed`]).

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;

use crate::models::{PipelineStage, RunSummary};

/// Progress and completion notifications emitted by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
  /// A stage started or finished.
  Progress {
    /// Stage the message refers to.
    stage: PipelineStage,
    /// Overall progress, 0 to 100.
    percent: u8,
    /// Human readable description.
    message: String,
  },
  /// The run finished successfully.
  Completed(RunSummary),
  /// The run aborted.
  Failed {
    /// Stage that was running when the failure happened.
    stage: PipelineStage,
    /// Description of the failure.
    error: String,
  },
}

impl StatusEvent {
  /// Whether this event ends the run.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Self::Progress { .. })
  }
}

/// Receiver of pipeline status events.
pub trait StatusSink: Send + Sync {
  /// Deliver a single event. Implementations must not block for long.
  fn publish(&self, event: StatusEvent);
}

/// Adapter turning a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> StatusSink for FnSink<F>
where
  F: Fn(StatusEvent) + Send + Sync,
{
  fn publish(&self, event: StatusEvent) {
    (self.0)(event)
  }
}

impl StatusSink for Sender<StatusEvent> {
  fn publish(&self, event: StatusEvent) {
    // A dropped receiver only means nobody is listening any more.
    let _ = self.send(event);
  }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
  fn publish(&self, _event: StatusEvent) {}
}

/// Sink forwarding events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
  fn publish(&self, event: StatusEvent) {
    match event {
      StatusEvent::Progress {
        stage,
        percent,
        message,
      } => tracing::info!(stage = stage.as_str(), percent, "{message}"),
      StatusEvent::Completed(summary) => tracing::info!(
        descriptors = summary.descriptors,
        valid_companions = summary.valid_companions,
        identifiers = summary.identifiers,
        "run completed"
      ),
      StatusEvent::Failed { stage, error } => {
        tracing::error!(stage = stage.as_str(), "run failed: {error}")
      }
    }
  }
}

/// Publish/subscribe fan-out of status events.
///
/// Each call to [`StatusBus::subscribe`] returns an independent receiver that sees every
/// event published afterwards. Subscribers whose receiver was dropped are pruned on the
/// next publish.
#[derive(Debug, Default)]
pub struct StatusBus {
  subscribers: Mutex<Vec<Sender<StatusEvent>>>,
}

impl StatusBus {
  /// Create a bus with no subscribers.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a new subscriber.
  pub fn subscribe(&self) -> Receiver<StatusEvent> {
    let (sender, receiver) = mpsc::channel();
    self
      .subscribers
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .push(sender);
    receiver
  }

  /// Number of live subscribers as of the last publish.
  pub fn subscriber_count(&self) -> usize {
    self
      .subscribers
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .len()
  }
}

impl StatusSink for StatusBus {
  fn publish(&self, event: StatusEvent) {
    let mut subscribers = self
      .subscribers
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    subscribers.retain(|subscriber| subscriber.send(event.clone()).is_ok());
  }
}

impl<S: StatusSink + ?Sized> StatusSink for std::sync::Arc<S> {
  fn publish(&self, event: StatusEvent) {
    (**self).publish(event)
  }
}
