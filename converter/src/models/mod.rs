//! Domain models for the snake conversion pipeline.
//!
//! - [`SnakeNode`] - One parsed source row (a node of one frame)
//! - [`Snake`] - A parsed source file with its metadata
//! - [`Frame`] - The nodes of one time point, grouped and re-indexed
//! - [`ContourRecord`] - One destination row
//! - [`Dialect`] / [`Layout`] - Source and destination file flavours

use serde::{Deserialize, Serialize};

// =============================================================================
// Source side
// =============================================================================

/// Source file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Pick [`Dialect::Blocks`] when `#frame` markers are present, else [`Dialect::Table`].
    #[default]
    Auto,
    /// One header row, one row per node, frame index in its own column.
    Table,
    /// `#frame <k>` markers followed by tab-separated node rows.
    Blocks,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dialect::Auto => "auto",
            Dialect::Table => "table",
            Dialect::Blocks => "blocks",
        };
        f.write_str(name)
    }
}

/// A single node row as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeNode {
    /// Frame index exactly as written in the source.
    pub frame: i64,
    /// Node label from the source, if any. Never used for ordering.
    pub label: Option<i64>,
    pub x: f64,
    pub y: f64,
    /// Per-frame node count `n` declared on this row, if the source has one.
    pub declared_count: Option<usize>,
    /// 1-based line number in the source file.
    pub line: usize,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct Snake {
    /// Node rows in source order.
    pub nodes: Vec<SnakeNode>,
    /// Column headers (table header, or the first per-block header row).
    pub headers: Vec<String>,
    /// Dialect the file was parsed as (never [`Dialect::Auto`]).
    pub dialect: Dialect,
    /// Detected text encoding.
    pub encoding: String,
}

// =============================================================================
// Reshaped side
// =============================================================================

/// A 2D contour sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// All nodes of one frame, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Destination (0-based) frame index.
    pub index: i64,
    pub points: Vec<Point>,
    /// Node count the source declared for this frame, if any.
    pub declared_count: Option<usize>,
    /// Line of the first source row belonging to this frame.
    pub first_line: usize,
}

impl Frame {
    pub fn node_count(&self) -> usize {
        self.points.len()
    }
}

/// One destination row: `(frame, node, x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourRecord {
    pub frame: i64,
    pub node: usize,
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// Destination side
// =============================================================================

/// Destination file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `frame,node,x,y`, one row per node.
    #[default]
    Long,
    /// AmoePy time series: `time x0 y0 x1 y1 ...`, one row per frame.
    Wide,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Long => f.write_str("long"),
            Layout::Wide => f.write_str("wide"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_serde_lowercase() {
        let json = serde_json::to_string(&Dialect::Blocks).unwrap();
        assert_eq!(json, "\"blocks\"");
        let back: Dialect = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(back, Dialect::Table);
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(Layout::Long.to_string(), "long");
        assert_eq!(Layout::Wide.to_string(), "wide");
    }
}
