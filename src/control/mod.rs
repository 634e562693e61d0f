//! CONTROL metadata records.
//!
//! Each source package directory carries a Debian-style `CONTROL` file of
//! `Key: Value` lines describing one built library for one architecture.

mod discovery;

pub use discovery::{Discovery, discover};

use crate::error::PackError;
use crate::naming;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Archive file extension for emitted packages.
pub const ARCHIVE_EXT: &str = "aar";

/// Parsed metadata for one architecture slice of a package.
///
/// Immutable once parsed; several slices of the same package+version merge
/// into one output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub package: String,
    /// Version exactly as written in the record; may contain characters
    /// Gradle rejects. See [`Control::normalized_version`].
    pub version: String,
    /// Direct dependency names, trimmed. Empty when `Depends` is absent.
    pub depends: Vec<String>,
    /// Raw source architecture tag, e.g. `arm64-android`.
    pub architecture: String,
    /// ABI compatibility hash from the build system.
    pub abi_hash: String,
    pub description: Option<String>,
    /// The record's `Type` field; aggregated for diagnostics only.
    pub kind: String,
    /// Package directory holding `include/` and `lib/`. Read-only.
    pub source_dir: PathBuf,
}

impl Control {
    /// Parse a CONTROL header block.
    ///
    /// Lines are `Key: Value`; a line starting with a space continues the
    /// previous value (joined with a newline). Parsing stops at the first
    /// line without a `:` separator; anything after is ignored.
    ///
    /// A record missing any of `Package`, `Version`, `Architecture`, `Abi`
    /// or `Type` fails with [`PackError::MissingField`] naming the field
    /// and the source path; no partial record is produced.
    pub fn parse(text: &str, path: &Path, source_dir: PathBuf) -> Result<Self, PackError> {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut last_key: Option<String> = None;

        for line in text.lines() {
            if line.starts_with(' ')
                && let Some(key) = &last_key
                && let Some(value) = fields.get_mut(key)
            {
                value.push('\n');
                value.push_str(line.trim());
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                break;
            };
            let key = key.trim().to_string();
            fields.insert(key.clone(), value.trim().to_string());
            last_key = Some(key);
        }

        let mut required = |field: &'static str| {
            fields.remove(field).ok_or(PackError::MissingField {
                field,
                path: path.to_path_buf(),
            })
        };

        let package = required("Package")?;
        let version = required("Version")?;
        let architecture = required("Architecture")?;
        let abi_hash = required("Abi")?;
        let kind = required("Type")?;

        let depends = fields
            .remove("Depends")
            .map(|value| {
                value
                    .split(',')
                    .map(|dep| dep.trim().to_string())
                    .filter(|dep| !dep.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Control {
            package,
            version,
            depends,
            architecture,
            abi_hash,
            description: fields.remove("Description"),
            kind,
            source_dir,
        })
    }

    /// Version normalized to the dotted numeric form Gradle accepts.
    pub fn normalized_version(&self) -> Result<String, PackError> {
        naming::normalize_version(&self.version)
    }

    /// File name of the output archive this slice contributes to. Slices
    /// of the same package+version share one name and merge.
    pub fn output_name(&self) -> Result<String, PackError> {
        Ok(format!(
            "{}-{}.{ARCHIVE_EXT}",
            self.package,
            self.normalized_version()?
        ))
    }
}
