//! File status data model

use std::path::PathBuf;

use serde::Serialize;

use super::Change;

/// Point-in-time snapshot of a repository, as reported by `jj status`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStatus {
    /// Files changed in the working-copy change
    pub file_statuses: Vec<FileStatus>,

    /// The working-copy change (`@`)
    pub working_copy: Change,

    /// Immediate parents of the working-copy change
    pub parent_changes: Vec<Change>,
}

impl RepositoryStatus {
    /// Check if the working copy is clean (no changes)
    pub fn is_clean(&self) -> bool {
        self.file_statuses.is_empty()
    }

    /// Get count of files by type
    pub fn count_by_type(&self, kind: FileStatusType) -> usize {
        self.file_statuses.iter().filter(|f| f.kind == kind).count()
    }

    /// Does any parent or the working copy carry a conflict?
    pub fn has_conflicts(&self) -> bool {
        self.working_copy.is_conflict || self.parent_changes.iter().any(|c| c.is_conflict)
    }
}

/// One line of a diff summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    #[serde(rename = "type")]
    pub kind: FileStatusType,

    /// Path relative to the repository root (the new path for renames)
    pub file: String,

    /// Absolute path
    pub path: PathBuf,

    /// Relative path before the rename; only set for `Renamed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
}

impl FileStatus {
    /// Get the status indicator character
    pub fn indicator(&self) -> char {
        self.kind.indicator()
    }
}

/// Kind of change recorded for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileStatusType {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
}

impl FileStatusType {
    /// Map a diff-summary indicator to a type
    pub fn from_indicator(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Added),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            _ => None,
        }
    }

    pub fn indicator(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
        }
    }
}
