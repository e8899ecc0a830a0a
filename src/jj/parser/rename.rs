//! Rename-path decomposition (`prefix{from => to}suffix`)

use regex::Regex;
use std::sync::LazyLock;

/// Regex for the brace-arrow rename syntax jj uses in diff summaries
///
/// Groups:
/// 1. prefix (shared leading path fragment, may be empty)
/// 2. from (old middle segment, may be empty)
/// 3. to (new middle segment, may be empty)
/// 4. suffix (shared trailing path fragment, may be empty)
static RENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\{\s*(.*?)\s*=>\s*(.*?)\s*\}(.*)$").expect("Invalid rename regex")
});

/// Both sides of a rename, as repository-relative paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePaths {
    pub from_path: String,
    pub to_path: String,
}

/// Expand `src/{old => new}/file.rs` into its old and new paths
///
/// Returns `None` when the input has no `{from => to}` segment, including a
/// bare `old => new` without braces.
pub fn parse_rename_paths(input: &str) -> Option<RenamePaths> {
    let caps = RENAME_REGEX.captures(input)?;
    let prefix = caps.get(1).map_or("", |m| m.as_str());
    let from = caps.get(2).map_or("", |m| m.as_str());
    let to = caps.get(3).map_or("", |m| m.as_str());
    let suffix = caps.get(4).map_or("", |m| m.as_str());

    Some(RenamePaths {
        from_path: join_rename_side(prefix, from, suffix),
        to_path: join_rename_side(prefix, to, suffix),
    })
}

/// Substitute one side into the skeleton, eliding the separator an empty
/// side would otherwise leave doubled or dangling
fn join_rename_side(prefix: &str, middle: &str, suffix: &str) -> String {
    if !middle.is_empty() {
        return format!("{prefix}{middle}{suffix}");
    }

    if prefix.is_empty() {
        return suffix.strip_prefix('/').unwrap_or(suffix).to_string();
    }
    if suffix.is_empty() {
        return prefix.strip_suffix('/').unwrap_or(prefix).to_string();
    }
    match (prefix.strip_suffix('/'), suffix.starts_with('/')) {
        (Some(trimmed), true) => format!("{trimmed}{suffix}"),
        _ => format!("{prefix}{suffix}"),
    }
}
