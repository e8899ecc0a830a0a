//! Classification of individual status / diff-summary lines

use std::path::Path;

use regex::Regex;
use std::sync::LazyLock;

use super::super::JjError;
use super::super::ansi::{extract_colored_regions, strip_ansi_codes};
use super::rename::parse_rename_paths;
use crate::model::{Change, FileStatus, FileStatusType, NO_DESCRIPTION_PLACEHOLDER};

/// Diff-summary line (matched against ANSI-stripped text)
///
/// Groups:
/// 1. status indicator
/// 2. path (may be a `{from => to}` rename)
static DIFF_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([AMDR]) (.+)$").expect("Invalid diff line regex"));

/// Commit header line of `jj status`, matched against the raw colored line
///
/// Handles every label form jj has printed: `Working copy :`,
/// `Working copy  (@) :`, `Parent commit:` and `Parent commit (@-):`.
///
/// Groups:
/// 1. label
/// 2. change id (may carry color codes)
/// 3. commit id (may carry color codes)
/// 4. bookmark, when followed by ` |`
/// 5. description and markers
static COMMIT_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\x1b\[[0-9;]*m)*(Working copy|Parent commit)[^:]*:\s+(\S+)\s+(\S+)(?:\s+(\S+)\s+\|)?(?:\s+(.*))?$",
    )
    .expect("Invalid commit header regex")
});

const EMPTY_MARKER: &str = "(empty)";
const CONFLICT_MARKER: &str = "(conflict)";

/// Which revision a commit header line describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    WorkingCopy,
    Parent,
}

/// One diff-summary entry before it is resolved against the repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub kind: FileStatusType,
    pub file: String,
}

impl DiffEntry {
    /// Resolve into a `FileStatus`, decomposing `{from => to}` renames
    pub fn into_file_status(self, repo_root: &Path) -> FileStatus {
        let (file, renamed_from) = match self.kind {
            FileStatusType::Renamed => match parse_rename_paths(&self.file) {
                Some(rename) => (rename.to_path, Some(rename.from_path)),
                None => (self.file, None),
            },
            _ => (self.file, None),
        };

        FileStatus {
            kind: self.kind,
            path: repo_root.join(&file),
            file,
            renamed_from,
        }
    }
}

/// A line of CLI output, tagged by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    DiffEntry(DiffEntry),
    CommitHeader(HeaderKind, Change),
    /// Blank lines and section headings
    Ignorable,
    /// Anything else (conflict listings, hints, newer output forms)
    Unrecognized,
}

/// Classify a single line of `jj status` or diff-summary output
///
/// Only a line that announces itself as a commit header but does not have
/// the header shape is an error.
pub fn classify_line(line: &str) -> Result<ParsedLine, JjError> {
    let plain = strip_ansi_codes(line);
    let plain = plain.trim_end();

    if plain.trim().is_empty() {
        return Ok(ParsedLine::Ignorable);
    }

    if let Some(caps) = DIFF_LINE_REGEX.captures(plain)
        && let Some(kind) = caps[1].chars().next().and_then(FileStatusType::from_indicator)
    {
        return Ok(ParsedLine::DiffEntry(DiffEntry {
            kind,
            file: caps[2].to_string(),
        }));
    }

    // Section headings such as "Working copy changes:"
    if (plain.ends_with(':') && !plain.contains(": ")) || plain.starts_with("The working copy") {
        return Ok(ParsedLine::Ignorable);
    }

    if plain.starts_with("Working copy") || plain.starts_with("Parent commit") {
        return parse_commit_header(line.trim_end());
    }

    Ok(ParsedLine::Unrecognized)
}

/// Parse a commit header, stripping ANSI codes per captured field
fn parse_commit_header(line: &str) -> Result<ParsedLine, JjError> {
    let unexpected = || JjError::UnexpectedLineFormat {
        line: strip_ansi_codes(line),
    };
    let caps = COMMIT_HEADER_REGEX.captures(line).ok_or_else(unexpected)?;

    let kind = match &caps[1] {
        "Working copy" => HeaderKind::WorkingCopy,
        _ => HeaderKind::Parent,
    };

    let change_id = strip_ansi_codes(&caps[2]);
    let commit_id = strip_ansi_codes(&caps[3]);
    if change_id.is_empty() || commit_id.is_empty() {
        return Err(unexpected());
    }

    // On a colored line an uncolored `word |` belongs to the description
    let colored_line = line.contains('\x1b');
    let bookmark = caps
        .get(4)
        .filter(|m| !colored_line || m.as_str().contains('\x1b'));
    let tail = match (caps.get(4), bookmark) {
        (Some(rejected), None) => &line[rejected.start()..],
        _ => caps.get(5).map_or("", |m| m.as_str()),
    };
    let branch = bookmark
        .map(|m| strip_ansi_codes(m.as_str()))
        .filter(|b| !b.is_empty());
    let summary = parse_summary(tail);

    Ok(ParsedLine::CommitHeader(
        kind,
        Change {
            change_id,
            commit_id,
            branch,
            description: summary.description,
            is_empty: summary.is_empty,
            is_conflict: summary.is_conflict,
        },
    ))
}

struct Summary {
    description: String,
    is_empty: bool,
    is_conflict: bool,
}

/// Split the tail of a header into description and markers
///
/// jj colors the markers and the placeholder but never the description, so
/// colored runs are markers to inspect and discard. Without any color the
/// markers are recognised textually instead.
fn parse_summary(raw: &str) -> Summary {
    let regions = extract_colored_regions(raw);

    if regions.iter().any(|r| r.colored) {
        let has_marker = |marker: &str| {
            regions
                .iter()
                .any(|r| r.colored && r.text.split_whitespace().any(|t| t == marker))
        };
        let description: String = regions
            .iter()
            .filter(|r| !r.colored)
            .map(|r| r.text.as_str())
            .collect();
        return Summary {
            description: description.trim().to_string(),
            is_empty: has_marker(EMPTY_MARKER),
            is_conflict: has_marker(CONFLICT_MARKER),
        };
    }

    let plain: String = regions.iter().map(|r| r.text.as_str()).collect();
    let mut rest = plain.trim();
    let mut is_empty = false;
    let mut is_conflict = false;
    loop {
        if let Some(after) = rest.strip_prefix(CONFLICT_MARKER) {
            is_conflict = true;
            rest = after.trim_start();
        } else if let Some(after) = rest.strip_prefix(EMPTY_MARKER) {
            is_empty = true;
            rest = after.trim_start();
        } else {
            break;
        }
    }
    let description = if rest == NO_DESCRIPTION_PLACEHOLDER {
        String::new()
    } else {
        rest.to_string()
    };

    Summary {
        description,
        is_empty,
        is_conflict,
    }
}
