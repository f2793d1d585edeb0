//! Source file reader for QuimP snake exports.
//!
//! Decodes raw bytes (auto-detected encoding), picks a [`Dialect`] and turns
//! every node row into a [`SnakeNode`]. Nothing here groups or re-indexes;
//! see [`crate::transform`].

mod blocks;
mod table;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SourceOptions;
use crate::error::ParseResult;
use crate::models::{Dialect, Snake};

pub use blocks::parse_blocks;
pub use table::parse_table;

/// Matches a `#frame <k>` marker line of the blocks dialect.
pub(crate) static FRAME_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#\s*frame\s+(-?\d+)\s*$").expect("valid frame marker regex"));

/// Source parsing error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    /// Source frame the offending row belongs to, when known.
    pub frame: Option<i64>,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}", self.line)?;
        if let Some(frame) = self.frame {
            write!(f, " (frame {})", frame)?;
        }
        if let Some(col) = &self.column {
            write!(f, ", column '{}'", col)?;
        }
        if let Some(val) = &self.value {
            write!(f, ", value '{}'", val)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            frame: None,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn in_frame(mut self, frame: i64) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8; a leading
/// byte-order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Pick the dialect of decoded content: any `#frame` marker means blocks.
pub fn detect_dialect(content: &str) -> Dialect {
    let has_marker = content
        .lines()
        .any(|line| FRAME_MARKER.is_match(line.trim()));

    if has_marker {
        Dialect::Blocks
    } else {
        Dialect::Table
    }
}

/// Parse source bytes with auto-detection of encoding (and dialect, when
/// `options.dialect` is [`Dialect::Auto`]).
pub fn parse_bytes_auto(bytes: &[u8], options: &SourceOptions) -> ParseResult<Snake> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    parse_str(&content, encoding, options)
}

/// Parse already-decoded content.
pub fn parse_str(content: &str, encoding: String, options: &SourceOptions) -> ParseResult<Snake> {
    let dialect = match options.dialect {
        Dialect::Auto => detect_dialect(content),
        explicit => explicit,
    };

    let (headers, nodes) = match dialect {
        Dialect::Blocks => parse_blocks(content, options)?,
        _ => parse_table(content, options)?,
    };

    Ok(Snake {
        nodes,
        headers,
        dialect: if dialect == Dialect::Auto { Dialect::Table } else { dialect },
        encoding,
    })
}

/// Parse a coordinate field. Non-finite values are rejected.
pub(crate) fn parse_coordinate(raw: &str, line: usize, column: &str) -> Result<f64, ParseError> {
    let value = raw.trim();
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(ParseError::new(line, "coordinate must be finite")
            .with_column(column)
            .with_value(value)),
        Err(_) => Err(ParseError::new(line, "coordinate is not a number")
            .with_column(column)
            .with_value(value)),
    }
}

/// Parse an integer field (frame index, node count, node label).
pub(crate) fn parse_integer<T: std::str::FromStr>(raw: &str, line: usize, column: &str) -> Result<T, ParseError> {
    let value = raw.trim();
    value.parse::<T>().map_err(|_| {
        ParseError::new(line, "expected an integer")
            .with_column(column)
            .with_value(value)
    })
}
