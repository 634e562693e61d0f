//! Deterministic ZIP emission of a staging tree.
//!
//! One archive per produced package. Entry names are relative to the
//! staging root with forward slashes regardless of host conventions, walk
//! order is sorted, and timestamps are fixed, so re-running over unchanged
//! input yields byte-identical archives.

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Serialize the tree under `staging` into a single deflate archive at
/// `output`. A stale archive at `output` is deleted first; the result is
/// never partially overwritten.
#[tracing::instrument(skip(staging, output))]
pub fn emit_archive(staging: &Path, output: &Path) -> Result<()> {
    if output.exists() {
        debug!("Removing stale archive {:?}", output);
        fs::remove_file(output)
            .with_context(|| format!("Failed to remove stale archive {}", output.display()))?;
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create archive {}", output.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = entry_name(staging, entry.path())?;
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            let mut source = File::open(entry.path())
                .with_context(|| format!("Failed to open {}", entry.path().display()))?;
            io::copy(&mut source, &mut zip)
                .with_context(|| format!("Failed to archive {name}"))?;
        }
    }

    zip.finish()?;
    debug!("Wrote archive {:?}", output);
    Ok(())
}

/// Archive entry name for `path`: relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside the staging tree", path.display()))?;
    let segments: Vec<String> = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Non-UTF-8 path component in {}", path.display()))
        })
        .collect::<Result<_>>()?;
    Ok(segments.join("/"))
}
