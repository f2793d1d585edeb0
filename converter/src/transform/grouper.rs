//! Group source rows into frames and re-index their nodes.
//!
//! ```text
//! Source rows (any order)         →  Frames (ascending)       →  Records
//! ┌───────────────────────┐         ┌──────────────────┐        ┌──────────┐
//! │ t=1  (1.5, 1.5)       │         │ frame 0          │        │ 0,0,...  │
//! │ t=0  (1.0, 1.0)       │   →     │  (1,1) (2,2)     │   →    │ 0,1,...  │
//! │ t=0  (2.0, 2.0)       │         │ frame 1          │        │ 1,0,...  │
//! └───────────────────────┘         │  (1.5,1.5)       │        └──────────┘
//!                                   └──────────────────┘
//! ```
//!
//! Node indices come from each row's position inside its frame group, never
//! from a node label in the source.

use std::collections::BTreeMap;

use crate::error::ParseError;
use crate::models::{ContourRecord, Frame, Point, SnakeNode};

/// Group node rows by frame, ascending, keeping source order inside a frame.
///
/// `frame_base` is subtracted from every source frame index. A frame that
/// ends up negative, or rows of one frame declaring different node counts,
/// are rejected.
pub fn group_by_frame(nodes: &[SnakeNode], frame_base: i64) -> Result<Vec<Frame>, ParseError> {
    let mut frames: BTreeMap<i64, FrameBuilder> = BTreeMap::new();

    for node in nodes {
        let index = node
            .frame
            .checked_sub(frame_base)
            .filter(|i| *i >= 0)
            .ok_or_else(|| {
                ParseError::new(node.line, format!("below the first frame index {}", frame_base))
                    .in_frame(node.frame)
            })?;

        frames
            .entry(index)
            .or_insert_with(|| FrameBuilder::new(index, node.line))
            .add_node(node)?;
    }

    Ok(frames.into_values().map(FrameBuilder::build).collect())
}

/// Flatten frames into `(frame, node, x, y)` records ordered by frame, then node.
pub fn flatten(frames: &[Frame]) -> Vec<ContourRecord> {
    frames
        .iter()
        .flat_map(|frame| {
            frame.points.iter().enumerate().map(move |(node, p)| ContourRecord {
                frame: frame.index,
                node,
                x: p.x,
                y: p.y,
            })
        })
        .collect()
}

/// Rebuild frames from records already ordered by frame.
pub fn regroup(records: &[ContourRecord]) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for record in records {
        let point = Point { x: record.x, y: record.y };
        match frames.last_mut() {
            Some(frame) if frame.index == record.frame => frame.points.push(point),
            _ => frames.push(Frame {
                index: record.frame,
                points: vec![point],
                declared_count: None,
                first_line: 0,
            }),
        }
    }

    frames
}

/// Builder accumulating the rows of one frame.
struct FrameBuilder {
    index: i64,
    points: Vec<Point>,
    declared: Option<(usize, usize)>,
    first_line: usize,
}

impl FrameBuilder {
    fn new(index: i64, first_line: usize) -> Self {
        Self {
            index,
            points: Vec::new(),
            declared: None,
            first_line,
        }
    }

    fn add_node(&mut self, node: &SnakeNode) -> Result<(), ParseError> {
        if let Some(count) = node.declared_count {
            match self.declared {
                None => self.declared = Some((count, node.line)),
                Some((previous, line)) if previous != count => {
                    return Err(ParseError::new(
                        node.line,
                        format!(
                            "frame declares n={} here but n={} on line {}",
                            count, previous, line
                        ),
                    )
                    .in_frame(node.frame)
                    .with_value(count.to_string()));
                }
                Some(_) => {}
            }
        }

        self.points.push(Point { x: node.x, y: node.y });
        Ok(())
    }

    fn build(self) -> Frame {
        Frame {
            index: self.index,
            points: self.points,
            declared_count: self.declared.map(|(count, _)| count),
            first_line: self.first_line,
        }
    }
}
