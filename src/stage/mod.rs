//! Staging-tree construction, one architecture slice at a time.
//!
//! All slices of a package+version write into the same staging directory
//! under `aar-build/`, producing the Prefab module layout:
//!
//! ```text
//! {name}-{version}.aar/
//!   prefab/modules/{module}/module.json
//!   prefab/modules/{module}/libs/android.{abi}/   (binaries, abi.json, include/)
//!   prefab/modules/{module}/include/              (header-only packages)
//! ```

mod copy;

pub use copy::{CopyPolicy, copy_file, copy_tree};

use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::control::Control;
use crate::pack::PackConfig;
use crate::platform::Architecture;
use crate::prefab::{AbiMetadata, ModuleMetadata};

/// File extensions that mark a shared or static library.
pub const LIB_EXTENSIONS: &[&str] = &["so", "a"];

/// Materialize one slice's contribution to its package's staging tree.
///
/// Returns `false` when the package ships neither binaries nor headers for
/// this architecture, in which case nothing is created on disk and the
/// package is not considered produced by this slice.
#[tracing::instrument(
    skip(control, config, aar_build),
    fields(package = %control.package, architecture = %control.architecture)
)]
pub fn stage_slice(control: &Control, config: &PackConfig, aar_build: &Path) -> Result<bool> {
    let arch = Architecture::from_tag(&control.architecture)?;

    let libs = list_library_files(&control.source_dir.join("lib"))?;
    let includes = control.source_dir.join("include");
    let has_includes = includes.is_dir();

    if libs.is_empty() && !has_includes {
        debug!(
            "{} ships nothing for {}, not staging",
            control.package,
            arch.abi()
        );
        return Ok(false);
    }

    // If several binaries exist, the last one in listing order names the
    // module. Known upstream simplification; see module_name().
    let module = match libs.last() {
        Some(lib) => module_name(lib),
        None => control.package.clone(),
    };
    let module_dir = aar_build
        .join(control.output_name()?)
        .join("prefab/modules")
        .join(&module);

    if libs.is_empty() {
        // Header-only: the include tree sits at the module root, shared by
        // every ABI.
        copy_tree(&includes, &module_dir.join("include"), CopyPolicy::Skip)?;
    } else {
        let abi_dir = module_dir.join("libs").join(arch.libs_dir());
        fs::create_dir_all(&abi_dir)
            .with_context(|| format!("Failed to create directory {}", abi_dir.display()))?;

        for lib in &libs {
            let name = lib.file_name().expect("library paths have file names");
            copy_file(lib, &abi_dir.join(name), CopyPolicy::Skip)?;
        }

        AbiMetadata::for_slice(arch, config).write(&abi_dir.join("abi.json"))?;

        if has_includes {
            copy_tree(&includes, &abi_dir.join("include"), CopyPolicy::Skip)?;
        }
    }

    // Refreshed by every slice; the last one wins on conflicting names.
    ModuleMetadata {
        library_name: module,
    }
    .write(&module_dir.join("module.json"))?;

    Ok(true)
}

/// Shared and static libraries directly under `lib_dir`, in sorted listing
/// order. Empty when the directory is absent (header-only package).
fn list_library_files(lib_dir: &Path) -> Result<Vec<PathBuf>> {
    if !lib_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(lib_dir)
        .with_context(|| format!("Failed to read {}", lib_dir.display()))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<_>>()?;
    files.retain(|path| {
        path.is_file()
            && path
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| LIB_EXTENSIONS.contains(&ext))
    });
    files.sort();
    Ok(files)
}

/// Module name for a library file: the conventional `lib` prefix and the
/// extension are dropped (`libfoo.so` -> `foo`).
fn module_name(lib: &Path) -> String {
    let stem = lib.file_stem().and_then(OsStr::to_str).unwrap_or_default();
    stem.strip_prefix("lib").unwrap_or(stem).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_config, write_package};
    use tempfile::tempdir;

    const CONTROL_ARM64: &str =
        "Package: foo\nVersion: 1.2-beta\nArchitecture: arm64-android\nAbi: a\nType: library\n";

    fn parse_control(packages: &Path, name: &str) -> Control {
        let dir = packages.join(name);
        let text = fs::read_to_string(dir.join("CONTROL")).unwrap();
        Control::parse(&text, &dir.join("CONTROL"), dir).unwrap()
    }

    #[test]
    fn test_stage_slice_with_binaries() {
        let dir = tempdir().unwrap();
        write_package(
            dir.path(),
            "foo",
            CONTROL_ARM64,
            &[("foo.h", "#pragma once")],
            &[("libfoo.so", b"\x7fELF")],
        );
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");

        let staged = stage_slice(&control, &test_config(dir.path()), &aar_build).unwrap();
        assert!(staged);

        let abi_dir = aar_build.join("foo-1.2.aar/prefab/modules/foo/libs/android.arm64-v8a");
        assert!(abi_dir.join("libfoo.so").is_file());
        assert!(abi_dir.join("include/foo.h").is_file());

        let abi: AbiMetadata =
            serde_json::from_str(&fs::read_to_string(abi_dir.join("abi.json")).unwrap()).unwrap();
        assert_eq!(abi.abi, "arm64-v8a");
        assert_eq!(abi.api, 21);
        assert_eq!(abi.stl, "c++_shared");

        let module: ModuleMetadata = serde_json::from_str(
            &fs::read_to_string(
                aar_build.join("foo-1.2.aar/prefab/modules/foo/module.json"),
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(module.library_name, "foo");
    }

    #[test]
    fn test_stage_slice_header_only() {
        let dir = tempdir().unwrap();
        write_package(
            dir.path(),
            "foo",
            CONTROL_ARM64,
            &[("foo.h", "#pragma once")],
            &[],
        );
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");

        assert!(stage_slice(&control, &test_config(dir.path()), &aar_build).unwrap());

        let module_dir = aar_build.join("foo-1.2.aar/prefab/modules/foo");
        // Headers live at the module root and there is no libs/ tree.
        assert!(module_dir.join("include/foo.h").is_file());
        assert!(!module_dir.join("libs").exists());
    }

    #[test]
    fn test_stage_slice_empty_package_is_not_staged() {
        let dir = tempdir().unwrap();
        write_package(dir.path(), "foo", CONTROL_ARM64, &[], &[]);
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");

        assert!(!stage_slice(&control, &test_config(dir.path()), &aar_build).unwrap());
        assert!(!aar_build.join("foo-1.2.aar").exists());
    }

    #[test]
    fn test_stage_slice_last_library_names_the_module() {
        let dir = tempdir().unwrap();
        write_package(
            dir.path(),
            "foo",
            CONTROL_ARM64,
            &[],
            &[("libaaa.so", b"a"), ("libzzz.so", b"z")],
        );
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");

        assert!(stage_slice(&control, &test_config(dir.path()), &aar_build).unwrap());

        let module_dir = aar_build.join("foo-1.2.aar/prefab/modules/zzz");
        // Both binaries are staged, but only the last name survives.
        assert!(module_dir.join("libs/android.arm64-v8a/libaaa.so").is_file());
        assert!(module_dir.join("libs/android.arm64-v8a/libzzz.so").is_file());
        let module: ModuleMetadata =
            serde_json::from_str(&fs::read_to_string(module_dir.join("module.json")).unwrap())
                .unwrap();
        assert_eq!(module.library_name, "zzz");
    }

    #[test]
    fn test_stage_slice_rerun_does_not_overwrite() {
        let dir = tempdir().unwrap();
        write_package(dir.path(), "foo", CONTROL_ARM64, &[], &[("libfoo.so", b"v1")]);
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");
        let config = test_config(dir.path());

        assert!(stage_slice(&control, &config, &aar_build).unwrap());
        let staged_lib =
            aar_build.join("foo-1.2.aar/prefab/modules/foo/libs/android.arm64-v8a/libfoo.so");
        assert_eq!(fs::read(&staged_lib).unwrap(), b"v1");

        // Mutate the source; a re-run must skip the existing staged copy.
        fs::write(control.source_dir.join("lib/libfoo.so"), b"v2").unwrap();
        assert!(stage_slice(&control, &config, &aar_build).unwrap());
        assert_eq!(fs::read(&staged_lib).unwrap(), b"v1");
    }

    #[test]
    fn test_stage_slice_ignores_non_library_files() {
        let dir = tempdir().unwrap();
        write_package(
            dir.path(),
            "foo",
            CONTROL_ARM64,
            &[],
            &[("libfoo.so", b"\x7fELF"), ("notes.txt", b"not a library")],
        );
        let control = parse_control(dir.path(), "foo");
        let aar_build = dir.path().join("aar-build");

        assert!(stage_slice(&control, &test_config(dir.path()), &aar_build).unwrap());
        let abi_dir = aar_build.join("foo-1.2.aar/prefab/modules/foo/libs/android.arm64-v8a");
        assert!(abi_dir.join("libfoo.so").is_file());
        assert!(!abi_dir.join("notes.txt").exists());
    }

    #[test]
    fn test_module_name_strips_prefix_and_extension() {
        assert_eq!(module_name(Path::new("lib/libfoo.so")), "foo");
        assert_eq!(module_name(Path::new("lib/libz.a")), "z");
        assert_eq!(module_name(Path::new("lib/weird.so")), "weird");
    }
}
