#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod error;
pub mod manifest;
pub mod material_paths;
pub mod models;
pub mod project;
pub mod status;

pub use builder::{CancelToken, ManifestBuilder, PipelineHandle};
pub use config::{ConfigError, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use models::{PipelineStage, RunSummary};
pub use project::{ManifestPaths, MaterialLayout};
pub use status::{FnSink, NullSink, StatusBus, StatusEvent, StatusSink, TracingSink};
