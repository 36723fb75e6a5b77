//! CLI command implementations
//!
//! Each command loads its configuration, applies the log level, then
//! streams queries from stdin to stdout. The stream functions take any
//! reader and writer so they can be driven from tests.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::config::Config;
use crate::observability::Logger;
use crate::shape::{classify, same_shape, Shape, ShapeOptions};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_queries, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command against stdin/stdout
pub fn run_command(command: Command) -> CliResult<()> {
    let config = Config::load_or_default(command.config_path().map(|p| p.as_path()))?;
    Logger::set_min_severity(config.severity()?);
    let options = config.shape_options();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock();
    let mut writer = stdout.lock();

    match command {
        Command::Shape { .. } => shape(reader, &mut writer, &options),
        Command::Compare { .. } => compare(reader, &mut writer, &options),
        Command::Group { .. } => group(reader, &mut writer, &options),
    }
}

fn shape_data(shape: &Shape) -> CliResult<Value> {
    Ok(json!({
        "shape": serde_json::to_value(shape)?,
        "fingerprint": shape.fingerprint(),
    }))
}

/// One response line per query line
pub fn shape<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &ShapeOptions,
) -> CliResult<()> {
    for entry in read_queries(reader) {
        let entry = entry?;
        match entry.query {
            Ok(query) => {
                let shape = classify(&query, options);
                write_response(writer, shape_data(&shape)?)?;
            }
            Err(err) => {
                let line = entry.line.to_string();
                Logger::info(
                    "SHAPE_QUERY_REJECTED",
                    &[("line", line.as_str()), ("reason", err.message())],
                );
                write_error(writer, &err, Some(entry.line))?;
            }
        }
    }
    Ok(())
}

/// Compares the first two queries of the input
pub fn compare<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &ShapeOptions,
) -> CliResult<()> {
    let mut shapes = Vec::with_capacity(2);
    for entry in read_queries(reader).take(2) {
        let entry = entry?;
        match entry.query {
            Ok(query) => shapes.push(classify(&query, options)),
            Err(err) => return write_error(writer, &err, Some(entry.line)),
        }
    }

    let (left, right) = match shapes.as_slice() {
        [left, right] => (left, right),
        _ => {
            let err = CliError::invalid_query(format!(
                "compare expects two queries, got {}",
                shapes.len()
            ));
            return write_error(writer, &err, None);
        }
    };

    write_response(
        writer,
        json!({
            "same": same_shape(left, right),
            "left": shape_data(left)?,
            "right": shape_data(right)?,
        }),
    )
}

struct ShapeGroup {
    shape: Shape,
    fingerprint: String,
    lines: Vec<usize>,
}

/// Groups all input queries by shape, in order of first occurrence
pub fn group<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &ShapeOptions,
) -> CliResult<()> {
    let mut groups: Vec<ShapeGroup> = Vec::new();
    let mut by_fingerprint: HashMap<String, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for entry in read_queries(reader) {
        let entry = entry?;
        let query = match entry.query {
            Ok(query) => query,
            Err(err) => {
                rejected.push(json!({
                    "line": entry.line,
                    "code": err.code_str(),
                    "message": err.message(),
                }));
                continue;
            }
        };

        let shape = classify(&query, options);
        let fingerprint = shape.fingerprint();
        match by_fingerprint.get(&fingerprint) {
            Some(&index) => groups[index].lines.push(entry.line),
            None => {
                by_fingerprint.insert(fingerprint.clone(), groups.len());
                groups.push(ShapeGroup {
                    shape,
                    fingerprint,
                    lines: vec![entry.line],
                });
            }
        }
    }

    let groups = groups
        .iter()
        .map(|g| -> CliResult<Value> {
            Ok(json!({
                "shape": serde_json::to_value(&g.shape)?,
                "fingerprint": g.fingerprint,
                "count": g.lines.len(),
                "lines": g.lines,
            }))
        })
        .collect::<CliResult<Vec<_>>>()?;

    write_response(writer, json!({ "groups": groups, "rejected": rejected }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeLabels;
    use std::io::Cursor;

    fn run_stream(
        f: fn(Cursor<&'static str>, &mut Vec<u8>, &ShapeOptions) -> CliResult<()>,
        input: &'static str,
        options: &ShapeOptions,
    ) -> Vec<Value> {
        let mut out = Vec::new();
        f(Cursor::new(input), &mut out, options).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_shape_command() {
        let out = run_stream(
            shape,
            "{\"b\": {\"$gt\": 1}, \"a\": 1}\nnot json\n",
            &ShapeOptions::default(),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["status"], "ok");
        assert_eq!(out[0]["data"]["shape"], json!({"a": "EXACT", "b": "RANGE"}));
        assert_eq!(out[0]["data"]["fingerprint"].as_str().unwrap().len(), 64);
        assert_eq!(out[1]["status"], "error");
        assert_eq!(out[1]["line"], 2);
    }

    #[test]
    fn test_shape_output_keeps_canonical_order() {
        let mut out = Vec::new();
        shape(
            Cursor::new("{\"z\": 1, \"$or\": [{\"y\": 1}, {\"x\": 1}]}\n"),
            &mut out,
            &ShapeOptions::default(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#""shape":{"$or":[{"x":"EXACT"},{"y":"EXACT"}],"z":"EXACT"}"#));
    }

    #[test]
    fn test_shape_command_uses_labels() {
        let options = ShapeOptions::default().with_labels(ShapeLabels::new("e", "r", "t"));
        let out = run_stream(shape, "{\"a\": {\"$ne\": 1}}\n", &options);
        assert_eq!(out[0]["data"]["shape"], json!({"a": "t"}));
    }

    #[test]
    fn test_compare_command() {
        let out = run_stream(
            compare,
            "{\"a\": 1, \"b\": {\"$lt\": 3}}\n{\"b\": {\"$gte\": 9}, \"a\": \"x\"}\n",
            &ShapeOptions::default(),
        );
        assert_eq!(out[0]["data"]["same"], true);

        let out = run_stream(compare, "{\"a\": 1}\n{\"a\": 1, \"b\": 2}\n", &ShapeOptions::default());
        assert_eq!(out[0]["data"]["same"], false);
    }

    #[test]
    fn test_compare_needs_two_queries() {
        let out = run_stream(compare, "{\"a\": 1}\n", &ShapeOptions::default());
        assert_eq!(out[0]["status"], "error");
        assert_eq!(out[0]["code"], "SHAPE_CLI_INVALID_QUERY");
    }

    #[test]
    fn test_group_command() {
        let input = "{\"a\": 1}\n{\"a\": 2}\n{\"a\": {\"$gt\": 0}}\n{bad\n{\"a\": 3}\n";
        let out = run_stream(group, input, &ShapeOptions::default());
        let data = &out[0]["data"];

        let groups = data["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["shape"], json!({"a": "EXACT"}));
        assert_eq!(groups[0]["count"], 3);
        assert_eq!(groups[0]["lines"], json!([1, 2, 5]));
        assert_eq!(groups[1]["shape"], json!({"a": "RANGE"}));

        let rejected = data["rejected"].as_array().unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0]["line"], 4);
    }
}
