//! Source architecture tags and their Android ABI mapping.
//!
//! Source packages carry tags like `arm64-android`; each maps 1:1 to an
//! Android ABI. Anything else ending in the Android suffix is a hard error,
//! while non-Android tags are filtered out during discovery and never reach
//! this table.

use crate::error::PackError;

/// Architecture-family suffix a record must carry to be packaged at all.
pub const ANDROID_ARCH_SUFFIX: &str = "-android";

/// One of the four supported source architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    Arm,
    Arm64,
    X86,
    X86_64,
}

impl Architecture {
    /// Map a source architecture tag to its ABI.
    ///
    /// The caller is expected to have already filtered out tags that do not
    /// end in [`ANDROID_ARCH_SUFFIX`]; a tag that gets here and still does
    /// not match is an [`PackError::UnknownArchitecture`].
    pub fn from_tag(tag: &str) -> Result<Self, PackError> {
        match tag {
            "arm-android" => Ok(Self::Arm),
            "arm64-android" => Ok(Self::Arm64),
            "x86-android" => Ok(Self::X86),
            "x64-android" => Ok(Self::X86_64),
            other => Err(PackError::UnknownArchitecture(other.to_string())),
        }
    }

    /// ABI tag as recorded in `abi.json`.
    pub fn abi(&self) -> &'static str {
        match self {
            Self::Arm => "armeabi-v7a",
            Self::Arm64 => "arm64-v8a",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        }
    }

    /// Per-ABI directory name under `modules/{name}/libs/`.
    pub fn libs_dir(&self) -> String {
        format!("android.{}", self.abi())
    }

    /// Whether this ABI belongs to the 64-bit family, which selects the
    /// platform API level recorded for the slice.
    pub fn is_64bit(&self) -> bool {
        matches!(self, Self::Arm64 | Self::X86_64)
    }
}
