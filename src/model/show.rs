//! Result of inspecting one revision

use serde::Serialize;

use super::{ChangeWithDetails, FileStatus};

/// A revision with its diff summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub change: ChangeWithDetails,
    pub file_statuses: Vec<FileStatus>,
}
