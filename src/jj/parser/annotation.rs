//! File annotation parser (jj file annotate)

use log::debug;

use super::super::JjError;
use super::super::template::{Templates, decode_records};
use super::{ANNOTATE_LINE_REGEX, Parser};
use crate::model::FileAnnotation;

impl Parser {
    /// Parse annotate-template output: one `change_id, line_number` record per line
    ///
    /// Line numbers must run 1, 2, 3, ...; anything else means the output
    /// does not describe `path` line by line.
    pub fn parse_file_annotate(path: &str, output: &str) -> Result<FileAnnotation, JjError> {
        let records = decode_records(output, Templates::ANNOTATE_FIELD_COUNT)?;
        let mut change_ids_by_line = Vec::with_capacity(records.len());

        for (index, fields) in records.into_iter().enumerate() {
            let [change_id, line_number]: [String; Templates::ANNOTATE_FIELD_COUNT] = fields
                .try_into()
                .map_err(|fields: Vec<String>| JjError::FieldCountMismatch {
                    expected: Templates::ANNOTATE_FIELD_COUNT,
                    actual: fields.len(),
                    record: fields.join(" "),
                })?;
            expect_line_number(&line_number, index + 1, &change_id)?;
            change_ids_by_line.push(change_id);
        }

        Ok(FileAnnotation {
            path: path.to_string(),
            change_ids_by_line,
        })
    }

    /// Parse the built-in `jj file annotate` format
    ///
    /// `<change_id> <author> <timestamp>    <line_number>: <content>`
    pub fn parse_default_annotate(path: &str, output: &str) -> Result<FileAnnotation, JjError> {
        let mut change_ids_by_line = Vec::new();

        for line in output.lines() {
            if line.is_empty() {
                debug!("skipping blank annotate line");
                continue;
            }
            let caps = ANNOTATE_LINE_REGEX
                .captures(line)
                .ok_or_else(|| JjError::UnexpectedLineFormat {
                    line: line.to_string(),
                })?;
            expect_line_number(&caps[2], change_ids_by_line.len() + 1, line)?;
            change_ids_by_line.push(caps[1].to_string());
        }

        Ok(FileAnnotation {
            path: path.to_string(),
            change_ids_by_line,
        })
    }
}

fn expect_line_number(field: &str, expected: usize, line: &str) -> Result<(), JjError> {
    match field.trim().parse::<usize>() {
        Ok(n) if n == expected => Ok(()),
        _ => Err(JjError::UnexpectedLineFormat {
            line: line.to_string(),
        }),
    }
}
