//! Per-line blame model (jj file annotate)

use serde::Serialize;

/// The change that last touched each line of a file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnnotation {
    /// Repository-relative path
    pub path: String,
    /// Short change id per line; index 0 is line 1
    pub change_ids_by_line: Vec<String>,
}
