//! Configuration loader for overriding the material naming conventions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::MaterialLayout;

/// File looked up in the scanned root when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "vmat_manifest.config.json";

/// Discoverable pipeline configuration describing file naming and worker counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Trailing token identifying material descriptor files.
  pub descriptor_extension: String,
  /// Trailing token naming the colour texture next to a descriptor.
  pub companion_suffix: String,
  /// Image extension of companion textures.
  pub image_extension: String,
  /// Extension substituted into the alternate manifest.
  pub alternate_image_extension: String,
  /// Directory segment anchoring final identifiers.
  pub marker_segment: String,
  /// Output file listing existing companion textures.
  pub companion_manifest_file: String,
  /// Output file listing alternate-extension texture paths.
  pub alternate_manifest_file: String,
  /// Output file listing final descriptor identifiers.
  pub identifier_manifest_file: String,
  /// Threads used for existence checks; `0` picks a value from the host.
  pub existence_workers: usize,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    let layout = MaterialLayout::default_layout();
    Self {
      descriptor_extension: layout.descriptor_extension.into(),
      companion_suffix: layout.companion_suffix.into(),
      image_extension: layout.image_extension.into(),
      alternate_image_extension: layout.alternate_image_extension.into(),
      marker_segment: layout.marker_segment.into(),
      companion_manifest_file: layout.companion_manifest_file.into(),
      alternate_manifest_file: layout.alternate_manifest_file.into(),
      identifier_manifest_file: layout.identifier_manifest_file.into(),
      existence_workers: 0,
    }
  }
}

/// Errors raised when an explicitly requested configuration file cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse the JSON configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
}

impl PipelineConfig {
  /// Attempt to load configuration from the scanned root directory.
  ///
  /// A missing or malformed file falls back to the default conventions so a bare content
  /// folder can be processed without any setup.
  pub fn discover(root: &Path) -> Self {
    let candidate = root.join(DEFAULT_CONFIG_FILE);
    match Self::load_from_path(&candidate) {
      Ok(config) => config,
      Err(ConfigError::Io { .. }) => Self::default(),
      Err(err) => {
        tracing::warn!("ignoring configuration: {err}");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file, discarding the failure reason.
  pub fn from_path(path: &Path) -> Option<Self> {
    Self::load_from_path(path).ok()
  }

  /// Read configuration from a specific JSON file.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Borrow the naming conventions as a layout.
  pub fn to_layout(&self) -> MaterialLayout<'_> {
    MaterialLayout {
      descriptor_extension: &self.descriptor_extension,
      companion_suffix: &self.companion_suffix,
      image_extension: &self.image_extension,
      alternate_image_extension: &self.alternate_image_extension,
      marker_segment: &self.marker_segment,
      companion_manifest_file: &self.companion_manifest_file,
      alternate_manifest_file: &self.alternate_manifest_file,
      identifier_manifest_file: &self.identifier_manifest_file,
    }
  }

  /// Number of existence-check workers to spawn for this host.
  pub fn resolved_workers(&self) -> usize {
    if self.existence_workers > 0 {
      return self.existence_workers;
    }
    std::thread::available_parallelism()
      .map(|count| count.get())
      .unwrap_or(1)
      .min(16)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_match_default_layout() {
    let config = PipelineConfig::default();
    assert_eq!(config.to_layout(), MaterialLayout::default_layout());
  }

  #[test]
  fn discover_falls_back_when_file_is_missing() {
    let temp = tempdir().expect("failed to create temp dir");
    assert_eq!(PipelineConfig::discover(temp.path()), PipelineConfig::default());
  }

  #[test]
  fn discover_falls_back_when_file_is_malformed() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
    assert_eq!(PipelineConfig::discover(temp.path()), PipelineConfig::default());
  }

  #[test]
  fn partial_files_override_only_named_fields() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"marker_segment": "mats", "existence_workers": 3}"#,
    )
    .unwrap();

    let config = PipelineConfig::discover(temp.path());
    assert_eq!(config.marker_segment, "mats");
    assert_eq!(config.resolved_workers(), 3);
    assert_eq!(config.descriptor_extension, ".vmat");
  }

  #[test]
  fn load_from_path_reports_parse_errors_with_path() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("custom.json");
    fs::write(&path, r#"{"existence_workers": "many"}"#).unwrap();

    let err = PipelineConfig::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("custom.json"));
    assert!(PipelineConfig::from_path(&path).is_none());
  }

  #[test]
  fn resolved_workers_is_never_zero() {
    assert!(PipelineConfig::default().resolved_workers() >= 1);
  }
}
