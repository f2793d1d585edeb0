//! Quick look at converted data: per-frame node statistics and a preview of
//! the first frames.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::logs::{LogEntry, LOGGER};
use crate::models::{ContourRecord, Point};
use crate::transform::grouper::regroup;
use crate::transform::{Conversion, SourceInfo};

/// Nodes shown per frame in a [`FramePreview`].
pub const PREVIEW_NODES: usize = 5;

/// Node statistics over all frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeSummary {
    pub frame_count: usize,
    pub first_frame: i64,
    pub last_frame: i64,
    pub min_nodes: usize,
    pub max_nodes: usize,
    pub mean_nodes: f64,
    /// Distinct per-frame node counts, ascending.
    pub node_counts: Vec<usize>,
}

impl SnakeSummary {
    /// Whether every frame has the same number of nodes.
    pub fn is_consistent(&self) -> bool {
        self.node_counts.len() == 1
    }
}

/// The head of one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePreview {
    pub frame: i64,
    pub node_count: usize,
    /// First [`PREVIEW_NODES`] nodes.
    pub nodes: Vec<Point>,
}

impl FramePreview {
    pub fn hidden_nodes(&self) -> usize {
        self.node_count.saturating_sub(self.nodes.len())
    }
}

/// Summarize records ordered by frame. `None` when there are no records.
pub fn summarize(records: &[ContourRecord]) -> Option<SnakeSummary> {
    let frames = regroup(records);
    let first = frames.first()?;
    let last = frames.last()?;

    let counts: Vec<usize> = frames.iter().map(|f| f.node_count()).collect();
    let total: usize = counts.iter().sum();

    Some(SnakeSummary {
        frame_count: frames.len(),
        first_frame: first.index,
        last_frame: last.index,
        min_nodes: counts.iter().copied().min().unwrap_or(0),
        max_nodes: counts.iter().copied().max().unwrap_or(0),
        mean_nodes: total as f64 / frames.len() as f64,
        node_counts: counts.iter().copied().collect::<BTreeSet<_>>().into_iter().collect(),
    })
}

/// Preview of the first `frames` frames.
pub fn preview(records: &[ContourRecord], frames: usize) -> Vec<FramePreview> {
    regroup(records)
        .into_iter()
        .take(frames)
        .map(|frame| FramePreview {
            frame: frame.index,
            node_count: frame.node_count(),
            nodes: frame.points.into_iter().take(PREVIEW_NODES).collect(),
        })
        .collect()
}

/// JSON report printed by `inspect --json`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub source: SourceInfo,
    pub summary: Option<SnakeSummary>,
    pub preview: Vec<FramePreview>,
    /// Progress entries logged while reading the source.
    pub log: Vec<LogEntry>,
}

impl InspectReport {
    /// Build the report and take the log history collected so far.
    pub fn new(conversion: Conversion, frames: usize) -> Self {
        Self {
            summary: summarize(&conversion.records),
            preview: preview(&conversion.records, frames),
            source: conversion.info,
            log: LOGGER.drain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn records(counts: &[(i64, usize)]) -> Vec<ContourRecord> {
        counts
            .iter()
            .flat_map(|&(frame, n)| {
                (0..n).map(move |node| ContourRecord {
                    frame,
                    node,
                    x: node as f64,
                    y: -(node as f64),
                })
            })
            .collect()
    }

    #[test]
    fn test_summary_variable_counts() {
        let summary = summarize(&records(&[(0, 3), (1, 2), (4, 7)])).unwrap();

        assert_eq!(summary.frame_count, 3);
        assert_eq!(summary.first_frame, 0);
        assert_eq!(summary.last_frame, 4);
        assert_eq!(summary.min_nodes, 2);
        assert_eq!(summary.max_nodes, 7);
        assert_relative_eq!(summary.mean_nodes, 4.0);
        assert_eq!(summary.node_counts, vec![2, 3, 7]);
        assert!(!summary.is_consistent());
    }

    #[test]
    fn test_summary_consistent() {
        let summary = summarize(&records(&[(0, 4), (1, 4)])).unwrap();
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_summary_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_preview_truncates() {
        let previews = preview(&records(&[(0, 8), (1, 2), (2, 1), (3, 1)]), 3);

        assert_eq!(previews.len(), 3);
        assert_eq!(previews[0].nodes.len(), PREVIEW_NODES);
        assert_eq!(previews[0].hidden_nodes(), 3);
        assert_eq!(previews[1].nodes[1], Point { x: 1.0, y: -1.0 });
        assert_eq!(previews[1].hidden_nodes(), 0);
    }

    #[test]
    fn test_report_carries_log() {
        LOGGER.set_quiet(true);
        let conversion = crate::transform::convert_bytes(
            b"node_x\tnode_y\tt\n1.0\t2.0\t0\n3.0\t4.0\t1\n",
            &crate::config::SourceOptions::default(),
        )
        .unwrap();

        let report = InspectReport::new(conversion, 1);
        assert_eq!(report.preview.len(), 1);
        assert_eq!(report.summary.as_ref().map(|s| s.frame_count), Some(2));
        assert!(report.log.iter().any(|e| e.message.contains("Grouped into 2 frames")));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"]["dialect"], "table");
        assert!(json["log"].is_array());
        assert!(report.log.iter().any(|e| e.stage == Some(crate::logs::Stage::Group)));
    }
}
