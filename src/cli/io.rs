//! JSON line I/O for the CLI
//!
//! - Input: one JSON query per line; blank lines are skipped
//! - Output: one JSON response object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::shape::QueryValue;

use super::errors::{CliError, CliResult};

/// A query line read from input, numbered from 1
pub struct QueryLine {
    pub line: usize,
    pub query: CliResult<QueryValue>,
}

/// Reads query lines, parsing each independently
///
/// An I/O failure ends the iteration with that error; a parse failure only
/// affects its own line.
pub fn read_queries<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<QueryLine>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok(QueryLine {
                line: index + 1,
                query: parse_query(&line),
            })),
            Err(e) => Some(Err(CliError::from(e))),
        })
}

/// Parses one query from JSON text
pub fn parse_query(text: &str) -> CliResult<QueryValue> {
    let json: Value = serde_json::from_str(text)
        .map_err(|e| CliError::invalid_query(format!("Invalid JSON: {}", e)))?;
    Ok(QueryValue::from_json(&json)?)
}

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write an error response
pub fn write_error<W: Write>(writer: &mut W, err: &CliError, line: Option<usize>) -> CliResult<()> {
    let mut response = serde_json::json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    if let Some(line) = line {
        response["line"] = Value::from(line);
    }

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
