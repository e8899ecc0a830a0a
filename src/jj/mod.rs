//! jj command execution layer
//!
//! This module handles executing jj commands and parsing their output.
//! Every typed command goes through [`JjExecutor`]; parsers are pure
//! functions over captured stdout.

pub mod ansi;
pub mod constants;
mod executor;
mod operations;
/// Parser module (public for integration testing)
pub mod parser;
pub mod template;

pub use executor::{JjExecutor, is_version_supported};
pub(crate) use executor::spawn_jj;

use std::io;
use std::sync::Arc;
use thiserror::Error;

use constants::errors;

/// Errors that can occur when executing jj commands or parsing their output
///
/// `Clone` so one in-flight result can be handed to every caller waiting on it.
#[derive(Error, Debug, Clone)]
pub enum JjError {
    #[error("Not a jj repository")]
    NotARepository,

    #[error("failed to launch {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("jj {args} failed ({}): {stderr}{}", describe_exit(.exit_code, .signal), describe_stdout(.stdout))]
    CommandFailed {
        args: String,
        stdout: String,
        stderr: String,
        exit_code: Option<i32>,
        signal: Option<i32>,
    },

    #[error("expected {expected} template fields, got {actual}: {record:?}")]
    FieldCountMismatch {
        expected: usize,
        actual: usize,
        record: String,
    },

    #[error("unexpected line format: {line:?}")]
    UnexpectedLineFormat { line: String },

    #[error("no output for revision {revision:?}")]
    NoRevisionOutput { revision: String },

    #[error("revision {revision:?} resolved to {count} revisions")]
    MultipleRevisionsResolved { revision: String, count: usize },

    #[error("jj {version} is not supported (minimum {minimum})")]
    UnsupportedVersion { version: String, minimum: String },

    #[error("IO error: {0}")]
    Io(Arc<io::Error>),

    #[error("refresh was aborted before completing")]
    RefreshAborted,
}

impl From<io::Error> for JjError {
    fn from(e: io::Error) -> Self {
        JjError::Io(Arc::new(e))
    }
}

impl JjError {
    /// The command ran outside any jj repository
    pub fn is_not_a_repository(&self) -> bool {
        match self {
            JjError::NotARepository => true,
            JjError::CommandFailed { stderr, .. } => stderr.contains(errors::NOT_A_REPO),
            _ => false,
        }
    }

    /// A revset that should name one revision named several
    pub fn is_ambiguous_revision(&self) -> bool {
        match self {
            JjError::MultipleRevisionsResolved { .. } => true,
            JjError::CommandFailed { stderr, .. } => stderr.contains(errors::AMBIGUOUS_REVISION),
            _ => false,
        }
    }

    /// Revset problems the caller can work around by adjusting the query
    pub fn is_recoverable(&self) -> bool {
        match self {
            JjError::NoRevisionOutput { .. } => true,
            JjError::CommandFailed { stderr, .. } => {
                self.is_ambiguous_revision() || stderr.contains(errors::REVISION_NOT_FOUND)
            }
            _ => self.is_ambiguous_revision(),
        }
    }
}

fn describe_exit(exit_code: &Option<i32>, signal: &Option<i32>) -> String {
    match (*exit_code, *signal) {
        (Some(code), _) => format!("exit code {code}"),
        (None, Some(signal)) => format!("signal {signal}"),
        (None, None) => "terminated".to_string(),
    }
}

fn describe_stdout(stdout: &str) -> String {
    if stdout.trim().is_empty() {
        String::new()
    } else {
        format!("\nstdout: {}", stdout.trim_end())
    }
}
