//! # snakeconv - QuimP snake to AmoePy contour converter
//!
//! Reads the tab-separated snake file QuimP exports for one cell and rewrites
//! the same coordinates in the layout AmoePy reads.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────┐    ┌──────────────┐    ┌─────────────┐
//! │  QuimP TSV   │───▶│   Parser    │───▶│  Transform   │───▶│   Writer    │
//! │ table/#frame │    │ (auto-enc)  │    │ group+index  │    │ long / wide │
//! └──────────────┘    └─────────────┘    └──────────────┘    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use snakeconv::{convert, write, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions::default();
//! let conversion = convert(Path::new("snake.csv"), &options.source)?;
//! write(&conversion.records, Path::new("snake_converted.csv"), &options.output)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Snake, frame and record types
//! - [`config`] - Conversion options (JSON file, environment)
//! - [`parser`] - Source decoding and parsing
//! - [`transform`] - Grouping, validation and the pipeline
//! - [`writer`] - Destination layouts and atomic writes
//! - [`summary`] - Statistics and preview for inspection
//! - [`logs`] - Progress log

pub mod error;
pub mod models;

pub mod config;
pub mod logs;

pub mod parser;
pub mod transform;
pub mod writer;

pub mod summary;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConvertError, ConvertResult, ParseError};

pub use models::{ContourRecord, Dialect, Frame, Layout, Point, Snake, SnakeNode};

pub use config::{ConvertOptions, OutputOptions, SourceOptions};

pub use parser::{decode_content, detect_dialect, detect_encoding, parse_bytes_auto, parse_str};

pub use transform::{
    convert, convert_bytes, convert_file, default_output_path, flatten, group_by_frame,
    validate_frames, write, Conversion, SourceInfo,
};

pub use writer::{format_coordinate, render, write_records};

pub use summary::{preview, summarize, FramePreview, InspectReport, SnakeSummary};
