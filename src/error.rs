//! Fatal error taxonomy for the packaging pipeline.
//!
//! Everything here aborts the run. Recoverable conditions (a copy target
//! that already exists on a re-run) are handled by
//! [`CopyPolicy`](crate::stage::CopyPolicy) instead of an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    /// A CONTROL record is missing one of its required fields.
    #[error("missing required field `{field}` in {}", .path.display())]
    MissingField { field: &'static str, path: PathBuf },

    /// An `-android` architecture tag outside the fixed four-entry table.
    /// The table is exhaustive by design; hitting this is a configuration
    /// bug in the package source, not a soft skip.
    #[error("unknown architecture `{0}`")]
    UnknownArchitecture(String),

    /// No normalization stage produced a dotted numeric version.
    #[error("version `{0}` cannot be normalized to a dotted numeric form")]
    UnrepresentableVersion(String),
}
