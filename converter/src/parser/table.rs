//! Table dialect: a tab-separated header row followed by one row per node.
//!
//! ```text
//! node_x  node_y  n  t
//! 1.0     1.0     3  0
//! 2.0     2.0     3  0
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{parse_coordinate, parse_integer, ParseError};
use crate::config::SourceOptions;
use crate::error::ParseResult;
use crate::models::SnakeNode;

/// Resolved positions of the columns the converter reads.
#[derive(Debug)]
struct Columns {
    x: (usize, String),
    y: (usize, String),
    frame: (usize, String),
    count: Option<(usize, String)>,
    node: Option<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &[String], options: &SourceOptions) -> Result<Self, ParseError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .map(|i| (i, headers[i].clone()))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                ParseError::new(1, format!("missing required column '{}'", name))
                    .with_column(name)
            })
        };

        let frame = options
            .frame_columns
            .iter()
            .find_map(|name| find(name.as_str()))
            .ok_or_else(|| {
                ParseError::new(
                    1,
                    format!("missing frame column (looked for {})", options.frame_columns.join(", ")),
                )
            })?;

        Ok(Self {
            x: require(options.x_column.as_str())?,
            y: require(options.y_column.as_str())?,
            frame,
            count: options.count_column.as_deref().and_then(find),
            node: options.node_column.as_deref().and_then(find),
        })
    }

    fn widest(&self) -> usize {
        [Some(&self.x), Some(&self.y), Some(&self.frame), self.count.as_ref(), self.node.as_ref()]
            .into_iter()
            .flatten()
            .map(|(i, _)| i + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Parse table-dialect content into headers and node rows.
pub fn parse_table(content: &str, options: &SourceOptions) -> ParseResult<(Vec<String>, Vec<SnakeNode>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::new(1, "No headers found"));
    }

    let columns = Columns::resolve(&headers, options)?;
    let widest = columns.widest();

    let mut nodes = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record).map_err(csv_error)? {
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.len() < widest {
            return Err(ParseError::new(
                line,
                format!("row has {} fields, expected at least {}", record.len(), widest),
            ));
        }

        let field = |(i, _): &(usize, String)| record.get(*i).unwrap_or("");

        nodes.push(SnakeNode {
            frame: parse_integer(field(&columns.frame), line, &columns.frame.1)?,
            label: columns
                .node
                .as_ref()
                .map(|c| parse_integer(field(c), line, &c.1))
                .transpose()?,
            x: parse_coordinate(field(&columns.x), line, &columns.x.1)?,
            y: parse_coordinate(field(&columns.y), line, &columns.y.1)?,
            declared_count: columns
                .count
                .as_ref()
                .map(|c| parse_integer(field(c), line, &c.1))
                .transpose()?,
            line,
        });
    }

    Ok((headers, nodes))
}

fn csv_error(err: csv::Error) -> ParseError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    ParseError::new(line, format!("Invalid TSV: {}", err))
}
