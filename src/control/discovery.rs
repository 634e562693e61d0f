//! Scan a packages root for CONTROL records.

use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::Control;
use crate::platform::ANDROID_ARCH_SUFFIX;

/// Everything discovery learned from the packages root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Android-targeting records, one per architecture slice.
    pub controls: Vec<Control>,
    /// Distinct `Type` values across all parsed records, including the
    /// filtered-out ones. Diagnostic only.
    pub types: BTreeSet<String>,
}

/// Parse every package directory under `root`.
///
/// Directory structure: `<root>/<package>/CONTROL`. Entries without a
/// CONTROL file are ignored; records whose architecture does not end in
/// `-android` are excluded (not an error). A malformed record aborts the
/// scan.
#[tracing::instrument(skip(root))]
pub fn discover(root: &Path) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    let mut package_dirs: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("Failed to read packages directory {}", root.display()))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<_>>()?;
    package_dirs.sort();

    for dir in package_dirs {
        if !dir.is_dir() {
            continue;
        }
        let control_path = dir.join("CONTROL");
        if !control_path.is_file() {
            debug!("No CONTROL file in {:?}, ignoring", dir);
            continue;
        }

        let text = fs::read_to_string(&control_path)
            .with_context(|| format!("Failed to read {}", control_path.display()))?;
        let control = Control::parse(&text, &control_path, dir)?;

        discovery.types.insert(control.kind.clone());

        if !control.architecture.ends_with(ANDROID_ARCH_SUFFIX) {
            debug!(
                "Excluding {} ({}): not an Android architecture",
                control.package, control.architecture
            );
            continue;
        }
        discovery.controls.push(control);
    }

    debug!("Package types seen: {:?}", discovery.types);
    Ok(discovery)
}
