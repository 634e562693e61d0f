//! Build-wide configuration for one packaging run.

use std::path::PathBuf;

use crate::platform::Architecture;

/// Scalar inputs shared by every package in a run. All of these come from
/// process configuration; none are derived per package.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Directory containing one subdirectory per source package.
    pub packages_dir: PathBuf,
    /// Namespace prefix for generated manifest package identifiers.
    pub namespace: String,
    /// Platform API level recorded for 32-bit ABIs.
    pub api_level: u32,
    /// Platform API level recorded for 64-bit ABIs.
    pub api_level_64: u32,
    /// NDK major version recorded in ABI descriptors.
    pub ndk_version: u32,
    /// C++ runtime/STL identifier recorded in ABI descriptors.
    pub stl: String,
}

impl PackConfig {
    /// API level for one architecture slice, by bitness family.
    pub fn api_level_for(&self, arch: Architecture) -> u32 {
        if arch.is_64bit() {
            self.api_level_64
        } else {
            self.api_level
        }
    }

    /// Directory receiving the finished archives, a sibling of the
    /// packages root.
    pub fn aar_dir(&self) -> PathBuf {
        self.sibling("aar")
    }

    /// Staging directory, a sibling of the packages root. Left in place
    /// after a run for inspection.
    pub fn aar_build_dir(&self) -> PathBuf {
        self.sibling("aar-build")
    }

    fn sibling(&self, name: &str) -> PathBuf {
        match self.packages_dir.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}
