//! High-level pipeline API: `parse -> validate -> reshape -> serialize`.
//!
//! # Example
//!
//! ```rust,ignore
//! use snakeconv::{convert, write, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions::default();
//! let conversion = convert(Path::new("snake.csv"), &options.source)?;
//! write(&conversion.records, Path::new("snake_converted.csv"), &options.output)?;
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::grouper::{flatten, group_by_frame};
use super::validate::validate_frames;
use crate::config::{ConvertOptions, OutputOptions, SourceOptions};
use crate::error::{ConvertError, ConvertResult};
use crate::logs::{log_stage, LogLevel, Stage};
use crate::models::{ContourRecord, Dialect};
use crate::parser::parse_bytes_auto;
use crate::writer::write_records;

/// Source file information
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub encoding: String,
    pub dialect: Dialect,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub frame_count: usize,
}

/// Result of [`convert`]: destination records plus what was learned about the source.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// Records ordered by frame, then node.
    pub records: Vec<ContourRecord>,
    pub info: SourceInfo,
}

/// Read and reshape one source file.
///
/// 1. Read bytes and detect encoding
/// 2. Parse rows (table or blocks dialect)
/// 3. Group by frame and re-index nodes
/// 4. Validate (non-empty, declared node counts)
pub fn convert(source_path: &Path, options: &SourceOptions) -> ConvertResult<Conversion> {
    log_stage(Stage::Read, LogLevel::Info, format!("Reading {}", source_path.display()));

    let bytes = std::fs::read(source_path).map_err(|e| ConvertError::Read {
        path: source_path.to_path_buf(),
        source: e,
    })?;

    convert_bytes(&bytes, options)
}

/// Same as [`convert`] but from bytes already in memory.
pub fn convert_bytes(bytes: &[u8], options: &SourceOptions) -> ConvertResult<Conversion> {
    let snake = parse_bytes_auto(bytes, options)?;
    log_stage(
        Stage::Parse,
        LogLevel::Success,
        format!("Encoding: {}, dialect: {}", snake.encoding, snake.dialect),
    );
    log_stage(Stage::Parse, LogLevel::Success, format!("Read {} node rows", snake.nodes.len()));

    let frames = group_by_frame(&snake.nodes, options.frame_base_for(snake.dialect))?;
    validate_frames(&frames)?;
    log_stage(Stage::Group, LogLevel::Success, format!("Grouped into {} frames", frames.len()));

    let records = flatten(&frames);

    Ok(Conversion {
        info: SourceInfo {
            encoding: snake.encoding,
            dialect: snake.dialect,
            headers: snake.headers,
            row_count: snake.nodes.len(),
            frame_count: frames.len(),
        },
        records,
    })
}

/// Write records to `output_path` in the configured layout (create or overwrite).
///
/// Invalid output options fail with [`ConvertError::Config`] before any file
/// is touched.
pub fn write(records: &[ContourRecord], output_path: &Path, options: &OutputOptions) -> ConvertResult<()> {
    write_records(records, output_path, options)?;
    log_stage(
        Stage::Write,
        LogLevel::Success,
        format!(
            "Wrote {} records ({} layout) to {}",
            records.len(),
            options.layout,
            output_path.display()
        ),
    );
    Ok(())
}

/// Validate options, convert `input` and write the result to `output`.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> ConvertResult<Conversion> {
    options.validate()?;
    let conversion = convert(input, &options.source)?;
    write(&conversion.records, output, &options.output)?;
    Ok(conversion)
}

/// Default destination: `<stem>_converted.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("snake");
    input.with_file_name(format!("{}_converted.csv", stem))
}
