//! Blocks dialect: QuimP "file per cell" export.
//!
//! ```text
//! #QuimP snake data
//! #frame 1
//! Node   Position  tracking-forward  tracking-backward  node_x  node_y ...
//! 0      0.0       -1                -1                 12.5    40.25  ...
//! 1      0.02      -1                -1                 13.0    41.0   ...
//! #frame 2
//! ...
//! ```
//!
//! Rows with a non-numeric first field before a block's first node row are
//! column headers and are skipped; after it they are malformed. Other `#`
//! lines are comments. A marker without node rows is rejected unless the
//! whole file has none, which is empty input.

use super::{parse_coordinate, ParseError, FRAME_MARKER};
use crate::config::SourceOptions;
use crate::error::ParseResult;
use crate::models::SnakeNode;

/// Parse blocks-dialect content into headers and node rows.
///
/// The returned headers are the first per-block column header row, if any.
pub fn parse_blocks(content: &str, options: &SourceOptions) -> ParseResult<(Vec<String>, Vec<SnakeNode>)> {
    let x_field = options.block_x_field;
    let y_field = options.block_y_field;
    let needed = x_field.max(y_field) + 1;

    let mut headers: Vec<String> = Vec::new();
    let mut nodes = Vec::new();
    let mut seen_frames: Vec<i64> = Vec::new();
    // (frame, marker line, node rows so far)
    let mut blocks: Vec<(i64, usize, usize)> = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(caps) = FRAME_MARKER.captures(line) {
            let frame: i64 = caps[1].parse().map_err(|_| {
                ParseError::new(line_num, "frame number out of range").with_value(&caps[1])
            })?;
            if seen_frames.contains(&frame) {
                return Err(ParseError::new(line_num, "frame appears more than once").in_frame(frame));
            }
            seen_frames.push(frame);
            blocks.push((frame, line_num, 0));
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = raw_line.split('\t').map(str::trim).collect();
        let numeric = parts[0].parse::<f64>().is_ok();

        let Some((frame, _, rows)) = blocks.last_mut() else {
            if numeric {
                return Err(ParseError::new(line_num, "node row before the first '#frame' marker"));
            }
            if headers.is_empty() {
                headers = parts.iter().map(|s| s.to_string()).collect();
            }
            continue;
        };
        let frame = *frame;

        if !numeric {
            if *rows > 0 {
                return Err(ParseError::new(line_num, "node label is not a number")
                    .in_frame(frame)
                    .with_column(column_name(&headers, 0))
                    .with_value(parts[0]));
            }
            if headers.is_empty() {
                headers = parts.iter().map(|s| s.to_string()).collect();
            }
            continue;
        }

        if parts.len() < needed {
            return Err(ParseError::new(
                line_num,
                format!("row has {} fields, expected at least {}", parts.len(), needed),
            )
            .in_frame(frame));
        }

        let x_name = column_name(&headers, x_field);
        let y_name = column_name(&headers, y_field);

        nodes.push(SnakeNode {
            frame,
            label: parts[0].parse().ok(),
            x: parse_coordinate(parts[x_field], line_num, &x_name).map_err(|e| e.in_frame(frame))?,
            y: parse_coordinate(parts[y_field], line_num, &y_name).map_err(|e| e.in_frame(frame))?,
            declared_count: None,
            line: line_num,
        });
        *rows += 1;
    }

    if !nodes.is_empty() {
        if let Some((frame, line, _)) = blocks.iter().find(|(_, _, rows)| *rows == 0) {
            return Err(ParseError::new(*line, "frame has no node rows").in_frame(*frame));
        }
    }

    Ok((headers, nodes))
}

fn column_name(headers: &[String], field: usize) -> String {
    headers
        .get(field)
        .cloned()
        .unwrap_or_else(|| format!("field {}", field))
}
