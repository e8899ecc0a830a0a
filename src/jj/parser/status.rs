//! Status output parser (jj status)

use std::path::Path;

use log::debug;

use super::super::JjError;
use super::Parser;
use super::line::{HeaderKind, ParsedLine, classify_line};
use crate::model::{Change, RepositoryStatus};

impl Parser {
    /// Parse `jj status --color=always` output
    ///
    /// Expected shape (colors omitted):
    /// ```text
    /// Working copy changes:
    /// A new_file.rs
    /// R src/{old => new}/lib.rs
    /// Working copy  (@) : kkmpptxz 3a8f2c1d Add parser
    /// Parent commit (@-): qpvuntsm 61b5e0a9 main | Initial commit
    /// ```
    ///
    /// A merge working copy has one `Parent commit` line per parent.
    pub fn parse_status(repo_root: &Path, output: &str) -> Result<RepositoryStatus, JjError> {
        let mut file_statuses = Vec::new();
        let mut working_copy = Change::default();
        let mut parent_changes = Vec::new();

        for line in output.lines() {
            match classify_line(line)? {
                ParsedLine::DiffEntry(entry) => {
                    file_statuses.push(entry.into_file_status(repo_root));
                }
                ParsedLine::CommitHeader(HeaderKind::WorkingCopy, change) => {
                    working_copy = change;
                }
                ParsedLine::CommitHeader(HeaderKind::Parent, change) => {
                    parent_changes.push(change);
                }
                ParsedLine::Ignorable => {}
                ParsedLine::Unrecognized => {
                    debug!("skipping unrecognized status line: {line:?}");
                }
            }
        }

        Ok(RepositoryStatus {
            file_statuses,
            working_copy,
            parent_changes,
        })
    }
}
