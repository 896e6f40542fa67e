//! Existence checks for derived companion textures.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::models::ExistenceReport;

/// Below this many candidates the checks run on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

/// Keep the companions that exist on disk as regular files.
///
/// Candidates are split into contiguous shards checked on up to `workers` scoped threads.
/// Shards are stitched back together in order, so the retained list is always a
/// subsequence of `companions`.
pub fn filter_existing(companions: &[PathBuf], workers: usize) -> PipelineResult<ExistenceReport> {
  let workers = workers.max(1);
  let retained = if workers == 1 || companions.len() < PARALLEL_THRESHOLD {
    retain_existing(companions)
  } else {
    filter_sharded(companions, workers)?
  };

  Ok(ExistenceReport {
    total: companions.len(),
    retained,
  })
}

fn filter_sharded(companions: &[PathBuf], workers: usize) -> PipelineResult<Vec<PathBuf>> {
  let shard_len = companions.len().div_ceil(workers);

  std::thread::scope(|scope| {
    let handles: Vec<_> = companions
      .chunks(shard_len)
      .map(|shard| scope.spawn(move || retain_existing(shard)))
      .collect();

    let mut retained = Vec::new();
    for handle in handles {
      let shard = handle.join().map_err(|_| PipelineError::WorkerPanicked)?;
      retained.extend(shard);
    }
    Ok(retained)
  })
}

fn retain_existing(candidates: &[PathBuf]) -> Vec<PathBuf> {
  candidates
    .iter()
    .filter(|path| is_regular_file(path))
    .cloned()
    .collect()
}

fn is_regular_file(path: &Path) -> bool {
  path.is_file()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn keeps_existing_files_in_order() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    fs::write(root.join("b_color.png"), b"png")?;
    fs::write(root.join("d_color.png"), b"png")?;

    let candidates = vec![
      root.join("d_color.png"),
      root.join("a_color.png"),
      root.join("b_color.png"),
      root.join("c_color.png"),
    ];
    let report = filter_existing(&candidates, 1).unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.retained, vec![root.join("d_color.png"), root.join("b_color.png")]);
    Ok(())
  }

  #[test]
  fn directories_do_not_count_as_companions() -> std::io::Result<()> {
    let temp = tempdir()?;
    fs::create_dir(temp.path().join("x_color.png"))?;

    let report = filter_existing(&[temp.path().join("x_color.png")], 1).unwrap();

    assert_eq!(report.total, 1);
    assert!(report.retained.is_empty());
    Ok(())
  }

  #[test]
  fn sharded_checks_preserve_candidate_order() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();

    let mut candidates = Vec::new();
    let mut expected = Vec::new();
    for index in (0..500).rev() {
      let path = root.join(format!("tex_{index:04}_color.png"));
      if index % 3 == 0 {
        fs::write(&path, b"png")?;
        expected.push(path.clone());
      }
      candidates.push(path);
    }

    let report = filter_existing(&candidates, 7).unwrap();

    assert_eq!(report.total, 500);
    assert_eq!(report.retained, expected);
    assert_eq!(filter_existing(&candidates, 1).unwrap(), report);
    Ok(())
  }

  #[test]
  fn empty_input_yields_empty_report() {
    assert_eq!(filter_existing(&[], 4).unwrap(), ExistenceReport::default());
  }
}
