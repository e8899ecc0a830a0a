//! UI-facing projections of a status snapshot

use crate::model::{Change, FileStatus, RepositoryStatus};

/// Key of the working-copy resource group
pub const WORKING_COPY_GROUP: &str = "@";

/// Files changed in one revision, grouped for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// `@` for the working copy, otherwise the parent's change id
    pub id: String,
    pub label: String,
    pub change: Change,
    pub resources: Vec<FileStatus>,
}

impl ResourceGroup {
    pub fn working_copy(status: &RepositoryStatus) -> Self {
        Self {
            id: WORKING_COPY_GROUP.to_string(),
            label: "Working Copy".to_string(),
            change: status.working_copy.clone(),
            resources: status.file_statuses.clone(),
        }
    }

    pub fn parent(change: &Change, resources: Vec<FileStatus>) -> Self {
        Self {
            id: change.change_id.clone(),
            label: format!("Parent Commit {}", change.change_id),
            change: change.clone(),
            resources,
        }
    }

    pub fn is_working_copy(&self) -> bool {
        self.id == WORKING_COPY_GROUP
    }
}

/// One row of the change list shown next to the resource groups
///
/// Two lists are equal when every node matches field by field, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNode {
    pub label: String,
    pub description: String,
    pub tooltip: String,
    pub context_value: String,
}

impl ChangeNode {
    fn new(change: &Change, role: &str) -> Self {
        let label = match &change.branch {
            Some(branch) => format!("{} ({branch})", change.change_id),
            None => change.change_id.clone(),
        };

        let mut markers = Vec::new();
        if change.is_conflict {
            markers.push("(conflict)");
        }
        if change.is_empty {
            markers.push("(empty)");
        }
        markers.push(change.display_description());

        let context_value = if change.is_conflict {
            format!("{role}:conflict")
        } else {
            role.to_string()
        };

        Self {
            label,
            description: markers.join(" "),
            tooltip: format!(
                "Change {}\nCommit {}\n\n{}",
                change.change_id,
                change.commit_id,
                change.display_description()
            ),
            context_value,
        }
    }
}

/// Nodes for the working copy followed by its parents
pub fn change_nodes(status: &RepositoryStatus) -> Vec<ChangeNode> {
    std::iter::once(ChangeNode::new(&status.working_copy, "workingCopy"))
        .chain(
            status
                .parent_changes
                .iter()
                .map(|parent| ChangeNode::new(parent, "parent")),
        )
        .collect()
}
