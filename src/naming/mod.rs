//! Version normalization and manifest package-identifier sanitization.
//!
//! Android Gradle tooling only accepts dotted numeric versions of up to
//! four components, and manifest package identifiers must be valid Java
//! package names. Neither constraint holds for raw upstream metadata, so
//! both are repaired here before anything is written out.

use crate::error::PackError;
use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){0,3}$").expect("version pattern is valid"));

/// Java language keywords that cannot appear as a package-identifier
/// segment. Callers may pass their own list to [`sanitize_package_id`] if
/// the downstream identifier constraint ever grows.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
];

/// Normalize a raw version string to a dotted numeric form of 1-4
/// components.
///
/// Transformation stages, first match wins:
/// 1. the raw string already matches;
/// 2. hyphens replaced with dots (`1.2-3` -> `1.2.3`);
/// 3. each dot-separated segment reduced to its digits, empty segments
///    dropped (`v1.2` -> `1.2`, `1.2-beta` -> `1.2`).
///
/// If no stage matches the result is a hard
/// [`PackError::UnrepresentableVersion`]; there is no silent default.
pub fn normalize_version(raw: &str) -> Result<String, PackError> {
    if VERSION_RE.is_match(raw) {
        return Ok(raw.to_string());
    }

    let dotted = raw.replace('-', ".");
    if VERSION_RE.is_match(&dotted) {
        return Ok(dotted);
    }

    let stripped = dotted
        .split('.')
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    if VERSION_RE.is_match(&stripped) {
        return Ok(stripped);
    }

    Err(PackError::UnrepresentableVersion(raw.to_string()))
}

/// Build a manifest package identifier from a namespace prefix and a raw
/// package name.
///
/// A hyphenated name is split on its first hyphen into two segments, with
/// any remaining hyphens dropped from the second
/// (`boost-system-stacktrace` -> `{ns}.boost.systemstacktrace`). Segments
/// colliding with a reserved word are prefixed with `_`.
pub fn sanitize_package_id(namespace: &str, name: &str, reserved: &[&str]) -> String {
    let qualified = match name.split_once('-') {
        Some((left, right)) => format!("{namespace}.{left}.{}", right.replace('-', "")),
        None => format!("{namespace}.{name}"),
    };

    qualified
        .split('.')
        .map(|segment| {
            if reserved.contains(&segment) {
                format!("_{segment}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
