//! Transformation module.
//!
//! - Grouper: source rows to ordered, re-indexed frames
//! - Validate: frame-level checks (empty input, declared node counts)
//! - Pipeline: `parse -> validate -> reshape -> serialize`

pub mod grouper;
pub mod pipeline;
pub mod validate;

pub use grouper::{flatten, group_by_frame, regroup};
pub use pipeline::*;
pub use validate::validate_frames;
