//! Structural checks run between grouping and serialization.

use crate::error::{ConvertError, ParseError};
use crate::models::Frame;

/// Check grouped frames before they are written.
///
/// - no frames at all → [`ConvertError::EmptyInput`]
/// - a frame whose declared `n` differs from its row count → [`ConvertError::MalformedInput`]
pub fn validate_frames(frames: &[Frame]) -> Result<(), ConvertError> {
    if frames.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    for frame in frames {
        if let Some(declared) = frame.declared_count {
            if declared != frame.node_count() {
                return Err(ParseError::new(
                    frame.first_line,
                    format!("declares n={} but has {} node rows", declared, frame.node_count()),
                )
                .in_frame(frame.index)
                .into());
            }
        }
    }

    Ok(())
}
