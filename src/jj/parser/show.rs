//! Show parser (jj log -r <rev> with the show template)

use std::path::Path;

use log::debug;

use super::super::JjError;
use super::super::template::{Templates, decode_records, parse_bool};
use super::Parser;
use super::line::{ParsedLine, classify_line};
use crate::model::{Author, Change, ChangeWithDetails, FileStatus, Show};

impl Parser {
    /// Parse show-template output for a revset that must name one revision
    pub fn parse_show(repo_root: &Path, revision: &str, output: &str) -> Result<Show, JjError> {
        let mut shows = Self::parse_show_many(repo_root, output)?;
        match shows.len() {
            0 => Err(JjError::NoRevisionOutput {
                revision: revision.to_string(),
            }),
            1 => Ok(shows.remove(0)),
            count => Err(JjError::MultipleRevisionsResolved {
                revision: revision.to_string(),
                count,
            }),
        }
    }

    /// Parse show-template output for any number of revisions
    pub fn parse_show_many(repo_root: &Path, output: &str) -> Result<Vec<Show>, JjError> {
        decode_records(output, Templates::SHOW_FIELD_COUNT)?
            .into_iter()
            .map(|fields| Self::parse_show_fields(repo_root, fields))
            .collect()
    }

    fn parse_show_fields(repo_root: &Path, fields: Vec<String>) -> Result<Show, JjError> {
        let [
            change_id,
            commit_id,
            author_name,
            author_email,
            authored_date,
            description,
            empty,
            conflict,
            summary,
        ]: [String; Templates::SHOW_FIELD_COUNT] =
            fields
                .try_into()
                .map_err(|fields: Vec<String>| JjError::FieldCountMismatch {
                    expected: Templates::SHOW_FIELD_COUNT,
                    actual: fields.len(),
                    record: fields.join(" "),
                })?;

        Ok(Show {
            change: ChangeWithDetails {
                change: Change {
                    change_id,
                    commit_id,
                    branch: None,
                    description,
                    is_empty: parse_bool(&empty),
                    is_conflict: parse_bool(&conflict),
                },
                author: Author {
                    name: author_name,
                    email: author_email,
                },
                authored_date,
            },
            file_statuses: Self::parse_diff_summary(repo_root, &summary)?,
        })
    }

    /// Parse newline-separated `X path` lines of a diff summary
    pub fn parse_diff_summary(repo_root: &Path, summary: &str) -> Result<Vec<FileStatus>, JjError> {
        let mut file_statuses = Vec::new();
        for line in summary.lines() {
            match classify_line(line)? {
                ParsedLine::DiffEntry(entry) => file_statuses.push(entry.into_file_status(repo_root)),
                ParsedLine::Ignorable => {}
                _ => debug!("skipping unrecognized diff summary line: {line:?}"),
            }
        }
        Ok(file_statuses)
    }
}
