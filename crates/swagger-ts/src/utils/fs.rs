//! Output sink: stale module pruning and file writes under the output root.

use std::{
  collections::HashSet,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use anyhow::Context;

use crate::generator::orchestrator::GeneratedFile;

/// Every generated module directory carries this file; directories without it are left alone.
const MODULE_MARKER: &str = "index.ts";

/// Removes generated module directories from an earlier run whose module no
/// longer exists. Returns the removed directories, sorted.
pub async fn prune_stale_module_dirs(root: &Path, active_modules: &[String]) -> anyhow::Result<Vec<PathBuf>> {
  let mut entries = match tokio::fs::read_dir(root).await {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(err) => return Err(err).with_context(|| format!("Failed to read output directory {}", root.display())),
  };

  let active: HashSet<&str> = active_modules.iter().map(String::as_str).collect();
  let mut removed = Vec::new();

  while let Some(entry) = entries.next_entry().await? {
    if !entry.file_type().await?.is_dir() {
      continue;
    }
    let name = entry.file_name();
    if name.to_str().is_some_and(|name| active.contains(name)) {
      continue;
    }

    let dir = entry.path();
    if !tokio::fs::try_exists(dir.join(MODULE_MARKER)).await? {
      continue;
    }
    tokio::fs::remove_dir_all(&dir)
      .await
      .with_context(|| format!("Failed to remove stale module directory {}", dir.display()))?;
    removed.push(dir);
  }

  removed.sort();
  Ok(removed)
}

/// Writes every file below `root`, creating parent directories as needed.
pub async fn write_generated_files(root: &Path, files: &[GeneratedFile]) -> anyhow::Result<()> {
  for file in files {
    let path = root.join(&file.path);
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(&path, &file.content)
      .await
      .with_context(|| format!("Failed to write {}", path.display()))?;
  }
  Ok(())
}
