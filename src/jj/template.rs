//! jj template definitions and the decoder for their output
//!
//! Templates concatenate field expressions with sentinel separators that do
//! not occur in real descriptions or paths, so multi-line fields (full
//! descriptions, diff summaries) survive the round trip.

use super::JjError;

/// Separator between fields of one record (SYMBOL FOR UNIT SEPARATOR)
pub const FIELD_SEPARATOR: &str = "\u{241F}";

/// Terminator of each record (SYMBOL FOR RECORD SEPARATOR)
pub const RECORD_SEPARATOR: &str = "\u{241E}";

/// Field expressions of the show template, in decode order
const SHOW_FIELDS: [&str; 9] = [
    "change_id",
    "commit_id",
    "author.name()",
    "author.email()",
    "author.timestamp().local().format(\"%Y-%m-%d %H:%M:%S\")",
    "description",
    "empty",
    "conflict",
    "self.diff().summary()",
];

/// Field expressions of the operation-log template, in decode order
const OP_LOG_FIELDS: [&str; 6] = [
    "self.id()",
    "self.description()",
    "self.tags()",
    "self.time().start().local().format(\"%Y-%m-%d %H:%M:%S\")",
    "self.user()",
    "self.snapshot()",
];

/// Field expressions of the change-graph template, in decode order
const GRAPH_FIELDS: [&str; 9] = [
    "change_id.short(8)",
    "commit_id.short(8)",
    "description.first_line()",
    "author.email()",
    "author.timestamp().local().format(\"%Y-%m-%d %H:%M:%S\")",
    "empty",
    "conflict",
    "current_working_copy",
    "parents.map(|p| p.change_id().short(8)).join(\" \")",
];

/// Field expressions of the annotate template, one record per line
const ANNOTATE_FIELDS: [&str; 2] = ["commit.change_id().short(8)", "self.line_number()"];

/// Templates for jj commands
pub struct Templates;

impl Templates {
    /// Number of fields produced by [`Templates::show`]
    pub const SHOW_FIELD_COUNT: usize = SHOW_FIELDS.len();

    /// Number of fields produced by [`Templates::op_log`]
    pub const OP_LOG_FIELD_COUNT: usize = OP_LOG_FIELDS.len();

    /// Number of fields produced by [`Templates::graph`]
    pub const GRAPH_FIELD_COUNT: usize = GRAPH_FIELDS.len();

    /// Number of fields produced by [`Templates::file_annotate`]
    pub const ANNOTATE_FIELD_COUNT: usize = ANNOTATE_FIELDS.len();

    /// Template for `jj log -r <rev>` describing one revision in full
    ///
    /// Fields: change_id, commit_id, author name, author email, author local
    /// timestamp, description, empty flag, conflict flag, diff summary.
    pub fn show() -> String {
        build_template(&SHOW_FIELDS)
    }

    /// Template for `jj operation log`
    ///
    /// Fields: id, description, tags, start time, user, snapshot flag.
    pub fn op_log() -> String {
        build_template(&OP_LOG_FIELDS)
    }

    /// Template for `jj log` feeding the change graph
    ///
    /// Ids are shortened to 8 characters so parent ids match node ids.
    /// Fields: change_id, commit_id, first description line, author email,
    /// author local timestamp, empty flag, conflict flag, working-copy flag,
    /// space-separated parent change ids.
    pub fn graph() -> String {
        build_template(&GRAPH_FIELDS)
    }

    /// Template for `jj file annotate`, evaluated once per file line
    ///
    /// Needs the `AnnotationLine` template type; older jj only prints the
    /// default annotate format.
    pub fn file_annotate() -> String {
        build_template(&ANNOTATE_FIELDS)
    }
}

/// Join field expressions with the field separator and terminate the record
pub fn build_template(fields: &[&str]) -> String {
    let separator = format!(" ++ \"{FIELD_SEPARATOR}\" ++ ");
    format!("{} ++ \"{RECORD_SEPARATOR}\"", fields.join(&separator))
}

/// Split template output into records of exactly `expected` trimmed fields
///
/// A field-count mismatch means a separator collided with real content or
/// the template contract changed; it is always an error, never repaired.
pub fn decode_records(output: &str, expected: usize) -> Result<Vec<Vec<String>>, JjError> {
    let mut segments: Vec<&str> = output.split(RECORD_SEPARATOR).collect();
    if segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }

    segments
        .into_iter()
        .map(|record| {
            let fields: Vec<String> = record
                .split(FIELD_SEPARATOR)
                .map(|f| f.trim().to_string())
                .collect();
            if fields.len() != expected {
                return Err(JjError::FieldCountMismatch {
                    expected,
                    actual: fields.len(),
                    record: record.to_string(),
                });
            }
            Ok(fields)
        })
        .collect()
}

/// Template booleans print as `true`/`false`; anything but `true` is false
pub fn parse_bool(field: &str) -> bool {
    field == "true"
}
