//! Change-graph node model

use serde::Serialize;

use super::NO_DESCRIPTION_PLACEHOLDER;

/// One revision in the change graph, with edges to its parents
///
/// Ids are the 8-character short forms, so `parent_change_ids` entries match
/// the `change_id` of other nodes in the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub change_id: String,
    pub commit_id: String,
    /// First line of the description; empty when unset
    pub description: String,
    pub author_email: String,
    /// Author timestamp in local time (`%Y-%m-%d %H:%M:%S`)
    pub timestamp: String,
    pub is_empty: bool,
    pub is_conflict: bool,
    pub is_working_copy: bool,
    /// Parents in jj's order; empty only for the root
    pub parent_change_ids: Vec<String>,
}

impl GraphNode {
    /// `[(empty) ]<description> • <change> • <commit>`
    pub fn label(&self) -> String {
        let description = if self.description.is_empty() {
            NO_DESCRIPTION_PLACEHOLDER
        } else {
            &self.description
        };
        let empty = if self.is_empty { "(empty) " } else { "" };
        format!(
            "{empty}{description} • {} • {}",
            self.change_id, self.commit_id
        )
    }

    /// Author and time, for hover text
    pub fn tooltip(&self) -> String {
        format!("{} {}", self.author_email, self.timestamp)
    }

    /// Glyph the graph draws for this node
    pub fn glyph(&self) -> char {
        if self.is_working_copy { '@' } else { '◆' }
    }

    pub fn is_merge(&self) -> bool {
        self.parent_change_ids.len() > 1
    }
}
