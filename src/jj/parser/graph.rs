//! Change-graph parser (jj log with the graph template)

use super::super::JjError;
use super::super::template::{Templates, decode_records, parse_bool};
use super::Parser;
use crate::model::GraphNode;

impl Parser {
    /// Parse graph-template output into nodes, newest first
    pub fn parse_graph(output: &str) -> Result<Vec<GraphNode>, JjError> {
        decode_records(output, Templates::GRAPH_FIELD_COUNT)?
            .into_iter()
            .map(|fields| {
                let [
                    change_id,
                    commit_id,
                    description,
                    author_email,
                    timestamp,
                    empty,
                    conflict,
                    working_copy,
                    parents,
                ]: [String; Templates::GRAPH_FIELD_COUNT] =
                    fields
                        .try_into()
                        .map_err(|fields: Vec<String>| JjError::FieldCountMismatch {
                            expected: Templates::GRAPH_FIELD_COUNT,
                            actual: fields.len(),
                            record: fields.join(" "),
                        })?;

                Ok(GraphNode {
                    change_id,
                    commit_id,
                    description,
                    author_email,
                    timestamp,
                    is_empty: parse_bool(&empty),
                    is_conflict: parse_bool(&conflict),
                    is_working_copy: parse_bool(&working_copy),
                    parent_change_ids: parents.split_whitespace().map(str::to_string).collect(),
                })
            })
            .collect()
    }
}
