//! Pipeline orchestration: discover, stage, synthesize, emit.
//!
//! Fully sequential. Every architecture slice is staged before any
//! metadata is synthesized, because dependency filtering and the
//! empty-package check both need the complete post-staging package set.

mod config;

pub use config::PackConfig;

use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeSet;
use std::fs;

use crate::archive::emit_archive;
use crate::control::discover;
use crate::prefab::synthesize;
use crate::stage::stage_slice;

/// Run the whole pipeline over the configured packages directory.
#[tracing::instrument(skip(config))]
pub fn run(config: &PackConfig) -> Result<()> {
    let aar_dir = config.aar_dir();
    let aar_build = config.aar_build_dir();
    fs::create_dir_all(&aar_dir)
        .with_context(|| format!("Failed to create {}", aar_dir.display()))?;
    fs::create_dir_all(&aar_build)
        .with_context(|| format!("Failed to create {}", aar_build.display()))?;

    let discovery = discover(&config.packages_dir)?;
    info!(
        "Found {} Android package slices ({} package types)",
        discovery.controls.len(),
        discovery.types.len()
    );

    let mut produced: BTreeSet<String> = BTreeSet::new();
    for control in &discovery.controls {
        if stage_slice(control, config, &aar_build)? {
            produced.insert(control.package.clone());
        }
    }

    // Second pass, one synthesis + emission per output archive.
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut written = 0usize;
    for control in &discovery.controls {
        let output_name = control.output_name()?;
        if !seen.insert(output_name.clone()) {
            continue;
        }
        let staging = aar_build.join(&output_name);
        if !staging.is_dir() {
            info!("Skipping {}: nothing was staged", output_name);
            continue;
        }
        synthesize(control, &produced, config, &staging)?;
        emit_archive(&staging, &aar_dir.join(&output_name))?;
        written += 1;
    }

    info!("Wrote {} archives to {:?}", written, aar_dir);
    Ok(())
}
