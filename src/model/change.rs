//! Change (revision) data model

use serde::Serialize;

/// Placeholder jj prints in place of an empty description
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "(no description set)";

/// Represents one jj revision as seen by `jj status` or `jj log`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Change ID (jj's stable identifier)
    pub change_id: String,

    /// Commit ID (Git-compatible hash of the current snapshot)
    pub commit_id: String,

    /// Bookmark pointing at this revision, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Description with jj's placeholder text removed
    pub description: String,

    /// Is this change empty (no file changes)?
    pub is_empty: bool,

    /// Does this change contain conflicts?
    pub is_conflict: bool,
}

impl Change {
    /// Get a display string for the description
    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            NO_DESCRIPTION_PLACEHOLDER
        } else {
            &self.description
        }
    }
}

/// Author signature of a revision
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A change with the extra metadata only the show template provides
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeWithDetails {
    #[serde(flatten)]
    pub change: Change,

    pub author: Author,

    /// Author timestamp in local time (`%Y-%m-%d %H:%M:%S`)
    pub authored_date: String,
}

impl std::ops::Deref for ChangeWithDetails {
    type Target = Change;

    fn deref(&self) -> &Change {
        &self.change
    }
}
