//! Conversion options.
//!
//! Options are layered, lowest precedence first:
//!
//! 1. [`ConvertOptions::default`]
//! 2. a JSON file ([`ConvertOptions::from_file`])
//! 3. `SNAKECONV_*` environment variables ([`ConvertOptions::apply_env`])
//! 4. command-line flags (applied by the binary)
//!
//! ```json
//! {
//!   "source": { "dialect": "blocks", "frame_base": 1 },
//!   "output": { "layout": "wide", "time_per_frame": 5.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Dialect, Layout};

/// Prefix of every environment variable read by [`ConvertOptions::apply_env`].
pub const ENV_PREFIX: &str = "SNAKECONV_";

/// How to read the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    pub dialect: Dialect,

    /// Table dialect: x coordinate column.
    pub x_column: String,

    /// Table dialect: y coordinate column.
    pub y_column: String,

    /// Table dialect: frame index column, first match wins.
    pub frame_columns: Vec<String>,

    /// Table dialect: per-frame node count column. Checked when present.
    pub count_column: Option<String>,

    /// Table dialect: per-row node label column. Parsed, never trusted.
    pub node_column: Option<String>,

    /// Blocks dialect: zero-based field holding x.
    pub block_x_field: usize,

    /// Blocks dialect: zero-based field holding y.
    pub block_y_field: usize,

    /// Index of the first frame in the source; subtracted so output is 0-based.
    /// `None` follows the dialect: 1 for blocks (QuimP numbers frames from 1),
    /// 0 for table.
    pub frame_base: Option<i64>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Auto,
            x_column: "node_x".to_string(),
            y_column: "node_y".to_string(),
            frame_columns: vec!["t".to_string(), "frame".to_string()],
            count_column: Some("n".to_string()),
            node_column: Some("node".to_string()),
            block_x_field: 4,
            block_y_field: 5,
            frame_base: None,
        }
    }
}

impl SourceOptions {
    /// Frame base in effect for a resolved dialect.
    pub fn frame_base_for(&self, dialect: Dialect) -> i64 {
        self.frame_base.unwrap_or(match dialect {
            Dialect::Blocks => 1,
            Dialect::Table | Dialect::Auto => 0,
        })
    }
}

/// How to write the destination file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub layout: Layout,

    /// Long layout field delimiter. Must not be a tab.
    pub delimiter: char,

    /// Long layout: emit the `frame,node,x,y` header row.
    pub header: bool,

    /// Long layout: fixed decimals. `None` writes the shortest exact form.
    pub precision: Option<usize>,

    /// Wide layout: seconds between frames.
    pub time_per_frame: f64,

    /// Wide layout: coordinates are divided by this value.
    pub pixel_size_um: f64,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Long,
            delimiter: ',',
            header: true,
            precision: None,
            time_per_frame: 1.0,
            pixel_size_um: 1.0,
        }
    }
}

/// Complete set of conversion options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub source: SourceOptions,
    pub output: OutputOptions,
}

impl ConvertOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Override options from `SNAKECONV_*` process environment variables.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override options from any variable source.
    ///
    /// Recognised keys (after [`ENV_PREFIX`]): `DIALECT`, `FRAME_BASE`,
    /// `LAYOUT`, `DELIMITER`, `HEADER`, `PRECISION`, `TIME_PER_FRAME`,
    /// `PIXEL_SIZE`.
    pub fn apply_vars<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = get("DIALECT") {
            self.source.dialect = parse_enum("DIALECT", &v)?;
        }
        if let Some(v) = get("FRAME_BASE") {
            self.source.frame_base = Some(parse_value("FRAME_BASE", &v)?);
        }
        if let Some(v) = get("LAYOUT") {
            self.output.layout = parse_enum("LAYOUT", &v)?;
        }
        if let Some(v) = get("DELIMITER") {
            self.output.delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = get("HEADER") {
            self.output.header = parse_value("HEADER", &v)?;
        }
        if let Some(v) = get("PRECISION") {
            self.output.precision = Some(parse_value("PRECISION", &v)?);
        }
        if let Some(v) = get("TIME_PER_FRAME") {
            self.output.time_per_frame = parse_value("TIME_PER_FRAME", &v)?;
        }
        if let Some(v) = get("PIXEL_SIZE") {
            self.output.pixel_size_um = parse_value("PIXEL_SIZE", &v)?;
        }
        Ok(())
    }

    /// Reject option combinations the converter cannot honour.
    pub fn validate(&self) -> ConfigResult<()> {
        self.output.validate()?;
        if self.source.block_x_field == self.source.block_y_field {
            return Err(ConfigError::invalid(
                "block_y_field",
                "x and y cannot be read from the same field",
            ));
        }
        if self.source.frame_columns.is_empty() {
            return Err(ConfigError::invalid("frame_columns", "at least one column name is required"));
        }
        Ok(())
    }
}

impl OutputOptions {
    /// Reject writer settings that would produce an unreadable destination.
    pub fn validate(&self) -> ConfigResult<()> {
        let delimiter = self.delimiter;
        if delimiter == '\t' {
            return Err(ConfigError::invalid(
                "delimiter",
                "must differ from the tab used by the source",
            ));
        }
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(ConfigError::invalid(
                "delimiter",
                format!("'{}' cannot be used as a field separator", delimiter.escape_default()),
            ));
        }
        if !(self.pixel_size_um.is_finite() && self.pixel_size_um > 0.0) {
            return Err(ConfigError::invalid("pixel_size_um", "must be a positive number"));
        }
        if !(self.time_per_frame.is_finite() && self.time_per_frame > 0.0) {
            return Err(ConfigError::invalid("time_per_frame", "must be a positive number"));
        }
        Ok(())
    }
}

/// Parse a delimiter given as a single character or an escape name.
pub fn parse_delimiter(value: &str) -> ConfigResult<char> {
    match value {
        "\\t" | "tab" | "TAB" => Ok('\t'),
        "space" => Ok(' '),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(ConfigError::invalid(
                    "delimiter",
                    format!("expected a single character, got '{}'", value),
                )),
            }
        }
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(field, format!("'{}': {}", value, e)))
}

fn parse_enum<T: clap::ValueEnum>(field: &str, value: &str) -> ConfigResult<T> {
    T::from_str(value.trim(), true).map_err(|e| ConfigError::invalid(field, e))
}
