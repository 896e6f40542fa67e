//! Naming conventions shared by every pipeline stage.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Borrowed description of the file naming conventions the pipeline relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialLayout<'a> {
  /// Trailing token identifying material descriptor files.
  pub descriptor_extension: &'a str,
  /// Trailing token that replaces the descriptor extension to name the colour texture.
  pub companion_suffix: &'a str,
  /// Image extension carried by every companion texture.
  pub image_extension: &'a str,
  /// Replacement for `image_extension` in the alternate manifest.
  pub alternate_image_extension: &'a str,
  /// Directory segment that anchors final identifiers.
  pub marker_segment: &'a str,
  /// File name of the manifest listing existing companion textures.
  pub companion_manifest_file: &'a str,
  /// File name of the manifest listing alternate-extension texture paths.
  pub alternate_manifest_file: &'a str,
  /// File name of the manifest listing final descriptor identifiers.
  pub identifier_manifest_file: &'a str,
}

impl MaterialLayout<'static> {
  /// Layout matching the Source 2 content conventions.
  pub const fn default_layout() -> Self {
    Self {
      descriptor_extension: ".vmat",
      companion_suffix: "_color.png",
      image_extension: ".png",
      alternate_image_extension: ".jpg",
      marker_segment: "materials",
      companion_manifest_file: "valid_png_paths.txt",
      alternate_manifest_file: "valid_jpg_paths.txt",
      identifier_manifest_file: "final_vmat_list.txt",
    }
  }
}

impl Default for MaterialLayout<'static> {
  fn default() -> Self {
    Self::default_layout()
  }
}

impl MaterialLayout<'_> {
  /// Resolve the three manifest destinations inside `root`.
  pub fn manifest_paths(&self, root: &Path) -> ManifestPaths {
    ManifestPaths {
      companions: root.join(self.companion_manifest_file),
      alternates: root.join(self.alternate_manifest_file),
      identifiers: root.join(self.identifier_manifest_file),
    }
  }
}

/// Absolute locations of the manifests written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestPaths {
  /// Existing companion textures.
  pub companions: PathBuf,
  /// Companion textures with the alternate image extension.
  pub alternates: PathBuf,
  /// Final descriptor identifiers.
  pub identifiers: PathBuf,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn joins_manifest_names_onto_root() {
    let layout = MaterialLayout::default_layout();
    let paths = layout.manifest_paths(Path::new("/content/addon"));

    assert_eq!(paths.companions, PathBuf::from("/content/addon/valid_png_paths.txt"));
    assert_eq!(paths.alternates, PathBuf::from("/content/addon/valid_jpg_paths.txt"));
    assert_eq!(paths.identifiers, PathBuf::from("/content/addon/final_vmat_list.txt"));
  }
}
