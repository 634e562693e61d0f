//! Recursive tree copy with an explicit collision policy.

use anyhow::{Context, Result, bail};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when a copy destination already exists.
///
/// Skipping is the steady-state outcome on re-runs, so it is a policy
/// choice here rather than a caught error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    Overwrite,
    Skip,
    Fail,
}

/// Copy a single file, honoring `policy` for an existing destination.
///
/// Returns `true` if the file was written, `false` if it was skipped.
pub fn copy_file(src: &Path, dest: &Path, policy: CopyPolicy) -> Result<bool> {
    if dest.exists() {
        match policy {
            CopyPolicy::Overwrite => {}
            CopyPolicy::Skip => {
                debug!("Skipping existing {:?}", dest);
                return Ok(false);
            }
            CopyPolicy::Fail => bail!("Destination already exists: {}", dest.display()),
        }
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(true)
}

/// Copy the tree rooted at `src` into `dest`, creating `dest` if needed.
///
/// Returns the number of files written; skipped files are not counted.
pub fn copy_tree(src: &Path, dest: &Path, policy: CopyPolicy) -> Result<u64> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory {}", dest.display()))?;

    let mut entries: Vec<PathBuf> = fs::read_dir(src)
        .with_context(|| format!("Failed to read {}", src.display()))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<_>>()?;
    entries.sort();

    let mut copied = 0;
    for entry in entries {
        let name = entry.file_name().expect("read_dir entries have file names");
        let target = dest.join(name);
        if entry.is_dir() {
            copied += copy_tree(&entry, &target, policy)?;
        } else if copy_file(&entry, &target, policy)? {
            copied += 1;
        }
    }
    Ok(copied)
}
