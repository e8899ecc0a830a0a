//! Operation log parser (jj operation log)

use super::super::JjError;
use super::super::template::{Templates, decode_records, parse_bool};
use crate::model::Operation;

use super::Parser;

impl Parser {
    /// Parse `jj operation log` output into a list of Operations
    ///
    /// Order is preserved as emitted: newest first.
    pub fn parse_op_log(output: &str) -> Result<Vec<Operation>, JjError> {
        decode_records(output, Templates::OP_LOG_FIELD_COUNT)?
            .into_iter()
            .map(|fields| {
                let [id, description, tags, start, user, snapshot]: [String;
                    Templates::OP_LOG_FIELD_COUNT] =
                    fields.try_into().map_err(|fields: Vec<String>| {
                        JjError::FieldCountMismatch {
                            expected: Templates::OP_LOG_FIELD_COUNT,
                            actual: fields.len(),
                            record: fields.join(" "),
                        }
                    })?;

                Ok(Operation {
                    id,
                    description,
                    tags,
                    start,
                    user,
                    snapshot: parse_bool(&snapshot),
                })
            })
            .collect()
    }
}
