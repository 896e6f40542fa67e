//! Persisting the three plain-text manifests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::material_paths::alternate_for_companion;
use crate::project::{ManifestPaths, MaterialLayout};

/// Write the companion, alternate-extension and identifier manifests into `root`.
///
/// Files are written in that order and overwritten unconditionally. Each entry is followed
/// by a newline. Writes are not transactional: a failure on a later manifest leaves the
/// earlier ones in place.
pub fn write_manifests(
  root: &Path,
  layout: &MaterialLayout,
  valid_companions: &[PathBuf],
  identifiers: &[String],
) -> PipelineResult<ManifestPaths> {
  let paths = layout.manifest_paths(root);

  let companion_lines: Vec<String> = valid_companions
    .iter()
    .map(|path| path.to_string_lossy().into_owned())
    .collect();
  write_lines(&paths.companions, &companion_lines)?;

  let alternate_lines: Vec<String> = companion_lines
    .iter()
    .map(|line| alternate_for_companion(layout, line))
    .collect();
  write_lines(&paths.alternates, &alternate_lines)?;

  write_lines(&paths.identifiers, identifiers)?;

  for path in [&paths.companions, &paths.alternates, &paths.identifiers] {
    tracing::debug!("saved {}", path.display());
  }

  Ok(paths)
}

fn write_lines(path: &Path, lines: &[String]) -> PipelineResult<()> {
  let capacity = lines.iter().map(|line| line.len() + 1).sum();
  let mut content = String::with_capacity(capacity);
  for line in lines {
    content.push_str(line);
    content.push('\n');
  }

  fs::write(path, content).map_err(|source| PipelineError::Write {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn writes_three_manifests() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    let layout = MaterialLayout::default_layout();
    let companions = vec![
      PathBuf::from("/png_assets/materials/wood/base_color.png"),
      PathBuf::from("/other/stone_color.png"),
    ];
    let identifiers = vec!["materials/wood/base.vmat".to_string()];

    let paths = write_manifests(root, &layout, &companions, &identifiers).unwrap();

    assert_eq!(
      fs::read_to_string(&paths.companions)?,
      "/png_assets/materials/wood/base_color.png\n/other/stone_color.png\n"
    );
    assert_eq!(
      fs::read_to_string(&paths.alternates)?,
      "/png_assets/materials/wood/base_color.jpg\n/other/stone_color.jpg\n"
    );
    assert_eq!(
      fs::read_to_string(&paths.identifiers)?,
      "materials/wood/base.vmat\n"
    );
    Ok(())
  }

  #[test]
  fn overwrites_previous_manifests() -> std::io::Result<()> {
    let temp = tempdir()?;
    let layout = MaterialLayout::default_layout();
    let stale = temp.path().join(layout.identifier_manifest_file);
    fs::write(&stale, "stale entry\nanother\n")?;

    write_manifests(temp.path(), &layout, &[], &[]).unwrap();

    assert_eq!(fs::read_to_string(&stale)?, "");
    Ok(())
  }

  #[test]
  fn reports_failing_manifest_path() {
    let temp = tempdir().unwrap();
    let layout = MaterialLayout::default_layout();
    let missing_root = temp.path().join("does-not-exist");

    let err = write_manifests(&missing_root, &layout, &[], &[]).unwrap_err();

    assert!(matches!(err, PipelineError::Write { .. }));
    assert_eq!(
      err.path(),
      Some(missing_root.join(layout.companion_manifest_file).as_path())
    );
  }
}
