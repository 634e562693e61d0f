//! Prefab descriptor files and the metadata synthesis pass.
//!
//! Runs once per output archive, after every architecture slice has been
//! staged: writes `prefab/prefab.json` with the resolved dependency set
//! and the `AndroidManifest.xml` Gradle expects at the archive root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::control::Control;
use crate::naming;
use crate::pack::PackConfig;
use crate::platform::Architecture;

/// Prefab schema version understood by current Android Gradle plugins.
pub const SCHEMA_VERSION: u32 = 1;

/// Fixed platform-version pair stamped into every generated manifest.
pub const MANIFEST_MIN_SDK: u32 = 16;
pub const MANIFEST_TARGET_SDK: u32 = 33;

/// Top-level `prefab.json` package descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrefabMetadata {
    pub schema_version: u32,
    pub name: String,
    pub version: String,
    pub dependencies: Vec<String>,
}

/// Per-module `module.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModuleMetadata {
    pub library_name: String,
}

/// Per-ABI `abi.json`, recording what one slice was built against.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AbiMetadata {
    pub abi: String,
    pub api: u32,
    pub ndk: u32,
    pub stl: String,
}

impl PrefabMetadata {
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }
}

impl ModuleMetadata {
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }
}

impl AbiMetadata {
    /// Descriptor for one architecture slice, from build-wide configuration.
    pub fn for_slice(arch: Architecture, config: &PackConfig) -> Self {
        AbiMetadata {
            abi: arch.abi().to_string(),
            api: config.api_level_for(arch),
            ndk: config.ndk_version,
            stl: config.stl.clone(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Resolve raw dependency names against the produced-package set.
///
/// A `name:qualifier` entry is reduced to `name` before matching. Names
/// not produced by this run (external or unresolvable) are dropped
/// silently; the result is sorted and deduplicated.
pub fn resolve_dependencies(depends: &[String], produced: &BTreeSet<String>) -> Vec<String> {
    let mut resolved: Vec<String> = depends
        .iter()
        .map(|dep| dep.split(':').next().unwrap_or(dep).trim().to_string())
        .filter(|dep| produced.contains(dep))
        .collect();
    resolved.sort();
    resolved.dedup();
    resolved
}

/// Write the package-level descriptors for one output archive.
#[tracing::instrument(skip_all, fields(package = %control.package))]
pub fn synthesize(
    control: &Control,
    produced: &BTreeSet<String>,
    config: &PackConfig,
    staging: &Path,
) -> Result<()> {
    let prefab_dir = staging.join("prefab");
    fs::create_dir_all(&prefab_dir)
        .with_context(|| format!("Failed to create directory {}", prefab_dir.display()))?;

    PrefabMetadata {
        schema_version: SCHEMA_VERSION,
        name: control.package.clone(),
        version: control.normalized_version()?,
        dependencies: resolve_dependencies(&control.depends, produced),
    }
    .write(&prefab_dir.join("prefab.json"))?;

    write_manifest(control, config, &staging.join("AndroidManifest.xml"))
}

fn write_manifest(control: &Control, config: &PackConfig, path: &Path) -> Result<()> {
    let package_id =
        naming::sanitize_package_id(&config.namespace, &control.package, naming::JAVA_KEYWORDS);
    let manifest = format!(
        r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="{package_id}" android:versionCode="1" android:versionName="1.0">
  <uses-sdk android:minSdkVersion="{MANIFEST_MIN_SDK}" android:targetSdkVersion="{MANIFEST_TARGET_SDK}" />
</manifest>
"#
    );
    fs::write(path, manifest).with_context(|| format!("Failed to write {}", path.display()))
}
