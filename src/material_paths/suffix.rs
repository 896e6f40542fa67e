use std::path::{Path, PathBuf};

use crate::project::MaterialLayout;

/// Replace the trailing `from` token of `value` with `to`.
///
/// Returns `None` when `value` does not end with `from`; earlier occurrences of the token
/// are left untouched.
pub fn replace_suffix(value: &str, from: &str, to: &str) -> Option<String> {
  let stem = value.strip_suffix(from)?;
  let mut replaced = String::with_capacity(stem.len() + to.len());
  replaced.push_str(stem);
  replaced.push_str(to);
  Some(replaced)
}

/// Name the colour texture expected next to a descriptor.
///
/// Descriptors that do not carry the descriptor extension are returned unchanged.
pub fn companion_for_descriptor(layout: &MaterialLayout, descriptor: &Path) -> PathBuf {
  swap_path_suffix(descriptor, layout.descriptor_extension, layout.companion_suffix)
}

/// Recover the descriptor a companion texture was derived from.
pub fn descriptor_for_companion(layout: &MaterialLayout, companion: &Path) -> PathBuf {
  swap_path_suffix(companion, layout.companion_suffix, layout.descriptor_extension)
}

/// Render a companion path with the alternate image extension.
pub fn alternate_for_companion(layout: &MaterialLayout, companion: &str) -> String {
  replace_suffix(
    companion,
    layout.image_extension,
    layout.alternate_image_extension,
  )
  .unwrap_or_else(|| companion.to_string())
}

fn swap_path_suffix(path: &Path, from: &str, to: &str) -> PathBuf {
  let Some(value) = path.to_str() else {
    return path.to_path_buf();
  };
  match replace_suffix(value, from, to) {
    Some(replaced) => PathBuf::from(replaced),
    None => path.to_path_buf(),
  }
}
