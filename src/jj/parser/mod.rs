//! jj output parser
//!
//! Parses the output from jj commands into structured data.

mod annotation;
mod graph;
mod line;
mod operation;
mod rename;
mod show;
mod status;

pub use line::{DiffEntry, HeaderKind, ParsedLine, classify_line};
pub use rename::{RenamePaths, parse_rename_paths};


use regex::Regex;
use std::sync::LazyLock;

/// Line of the built-in `jj file annotate` format
///
/// Groups:
/// 1. change id (first token)
/// 2. line number (after the author and timestamp, before the colon)
static ANNOTATE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+.+?\s+\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\s+(\d+): ?")
        .expect("Invalid annotate line regex")
});

/// Parser for jj command output
pub struct Parser;
