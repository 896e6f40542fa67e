//! Directory scanning for material descriptors.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};
use crate::project::MaterialLayout;

/// Walk the whole subtree below `root` collecting descriptor files.
///
/// Only files whose name ends with the descriptor extension (case-sensitive) are collected.
/// Symbolic links are followed, so linked descriptors are reported under their link path.
/// Any traversal error aborts the scan, including link cycles and dangling links.
/// The result is sorted so repeated runs over the same tree produce identical manifests.
pub fn scan_descriptors(root: &Path, layout: &MaterialLayout) -> PipelineResult<Vec<PathBuf>> {
    let mut descriptors = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| PipelineError::Scan {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !name.ends_with(layout.descriptor_extension) {
            continue;
        }

        if entry.path().to_str().is_none() {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 descriptor path");
            continue;
        }

        descriptors.push(entry.into_path());
    }

    descriptors.sort();
    Ok(descriptors)
}
