//! Destination file writer.
//!
//! Two layouts are supported:
//!
//! ```text
//! Long (default)               Wide (AmoePy time series)
//! frame,node,x,y               # time_0 & X_0,0 & Y_0,0 & ... // time_1 & ...
//! 0,0,1.0,1.0                  0.000000 1.000000 1.000000 2.000000 2.000000 ...
//! 0,1,2.0,2.0                  1.000000 1.500000 1.500000 2.500000 2.500000
//! 1,0,1.5,1.5
//! ```
//!
//! Files are written to a temporary sibling and renamed over the destination
//! once complete, so a failed write never leaves a truncated file behind.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::config::OutputOptions;
use crate::error::{ConvertError, ConvertResult};
use crate::models::{ContourRecord, Layout};
use crate::transform::grouper::regroup;

/// Header row of the long layout.
pub const LONG_HEADER: [&str; 4] = ["frame", "node", "x", "y"];

/// Comment line that opens a wide-layout file.
pub const WIDE_HEADER: &str = "# time_0 & X_0,0 & Y_0,0 & X_0,1 & Y_0,1 & X_0,2 & ... // time_1 & X_1,0 & Y_1,0 & X_1,1 & Y_1,1 & X_1,2 & ... // ...; Units: $s, \\mu m$, (Seconds, Micrometer)";

/// Format a coordinate for the long layout.
///
/// Without a precision the shortest representation that parses back to the
/// same `f64` is used, always with a decimal point (`1.0`, not `1`).
pub fn format_coordinate(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None => format!("{:?}", value),
    }
}

/// Serialize records in the configured layout.
pub fn write_to<W: Write>(records: &[ContourRecord], options: &OutputOptions, out: W) -> io::Result<()> {
    match options.layout {
        Layout::Long => write_long(records, options, out),
        Layout::Wide => write_wide(records, options, out),
    }
}

/// Serialize records into an in-memory string.
pub fn render(records: &[ContourRecord], options: &OutputOptions) -> io::Result<String> {
    let mut buf = Vec::new();
    write_to(records, options, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// One row per node: `frame<d>node<d>x<d>y`.
pub fn write_long<W: Write>(records: &[ContourRecord], options: &OutputOptions, out: W) -> io::Result<()> {
    let delimiter = u8::try_from(options.delimiter).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("delimiter '{}' is not a single byte", options.delimiter),
        )
    })?;

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(out);

    if options.header {
        writer.write_record(LONG_HEADER).map_err(io::Error::from)?;
    }

    for record in records {
        writer
            .write_record([
                record.frame.to_string(),
                record.node.to_string(),
                format_coordinate(record.x, options.precision),
                format_coordinate(record.y, options.precision),
            ])
            .map_err(io::Error::from)?;
    }

    writer.flush()
}

/// One row per frame: `time x0 y0 x1 y1 ...`, space-separated, 6 decimals.
///
/// `time = frame * time_per_frame`; coordinates are divided by `pixel_size_um`.
pub fn write_wide<W: Write>(records: &[ContourRecord], options: &OutputOptions, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", WIDE_HEADER)?;

    for frame in regroup(records) {
        let time = frame.index as f64 * options.time_per_frame;
        let mut line = format!("{:.6}", time);
        for p in &frame.points {
            line.push_str(&format!(
                " {:.6} {:.6}",
                p.x / options.pixel_size_um,
                p.y / options.pixel_size_um
            ));
        }
        writeln!(out, "{}", line)?;
    }

    out.flush()
}

/// Write records to `path`, creating or replacing it.
///
/// Options are validated before anything is created. The content goes to a
/// temporary file in the destination directory first; on any error the
/// destination is left as it was.
pub fn write_records(records: &[ContourRecord], path: &Path, options: &OutputOptions) -> ConvertResult<()> {
    options.validate()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".snakeconv-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| ConvertError::write(path, e))?;

    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write_to(records, options, &mut out).map_err(|e| ConvertError::write(path, e))?;
        out.flush().map_err(|e| ConvertError::write(path, e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| ConvertError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| ConvertError::write(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn records() -> Vec<ContourRecord> {
        vec![
            ContourRecord { frame: 0, node: 0, x: 1.0, y: 1.0 },
            ContourRecord { frame: 0, node: 1, x: 2.0, y: 2.0 },
            ContourRecord { frame: 1, node: 0, x: 1.5, y: 1.5 },
        ]
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(1.0, None), "1.0");
        assert_eq!(format_coordinate(2.5, None), "2.5");
        assert_eq!(format_coordinate(0.1, None), "0.1");
        assert_eq!(format_coordinate(-3.25, None), "-3.25");
        assert_eq!(format_coordinate(1.0, Some(3)), "1.000");
    }

    #[test]
    fn test_shortest_form_round_trips() {
        let value = 123.456_789_012_345_67_f64;
        let text = format_coordinate(value, None);
        assert_eq!(text.parse::<f64>().unwrap().to_bits(), value.to_bits());
    }

    #[test]
    fn test_long_layout() {
        let text = render(&records(), &OutputOptions::default()).unwrap();
        assert_eq!(text, "frame,node,x,y\n0,0,1.0,1.0\n0,1,2.0,2.0\n1,0,1.5,1.5\n");
    }

    #[test]
    fn test_long_layout_without_header_and_semicolon() {
        let options = OutputOptions {
            header: false,
            delimiter: ';',
            ..OutputOptions::default()
        };
        let text = render(&records(), &options).unwrap();
        assert_eq!(text.lines().next(), Some("0;0;1.0;1.0"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_wide_layout() {
        let options = OutputOptions {
            layout: Layout::Wide,
            time_per_frame: 2.0,
            ..OutputOptions::default()
        };
        let text = render(&records(), &options).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], WIDE_HEADER);
        assert_eq!(lines[1], "0.000000 1.000000 1.000000 2.000000 2.000000");
        assert_eq!(lines[2], "2.000000 1.500000 1.500000");
    }

    #[test]
    fn test_wide_layout_pixel_scale() {
        let options = OutputOptions {
            layout: Layout::Wide,
            pixel_size_um: 0.25,
            ..OutputOptions::default()
        };
        let text = render(&records(), &options).unwrap();
        let fields: Vec<f64> = text
            .lines()
            .nth(1)
            .unwrap()
            .split(' ')
            .map(|f| f.parse().unwrap())
            .collect();

        assert_relative_eq!(fields[1], 4.0);
        assert_relative_eq!(fields[3], 8.0);
    }

    #[test]
    fn test_write_records_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_records(&records(), &path, &OutputOptions::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("frame,node,x,y\n"));
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_records_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old content that is longer than the new one").unwrap();

        let options = OutputOptions {
            header: false,
            ..OutputOptions::default()
        };
        write_records(&records()[..1], &path, &options).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0,0,1.0,1.0\n");
    }

    #[test]
    fn test_write_records_unwritable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_records(&records(), &path, &OutputOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::IoWrite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_non_byte_delimiter_fails_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "keep me").unwrap();

        let options = OutputOptions {
            delimiter: '→',
            ..OutputOptions::default()
        };
        let err = write_records(&records(), &path, &options).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_invalid_options_create_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let tab = OutputOptions {
            delimiter: '\t',
            ..OutputOptions::default()
        };
        let err = write_records(&records(), &path, &tab).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));

        let unscaled = OutputOptions {
            layout: Layout::Wide,
            pixel_size_um: 0.0,
            ..OutputOptions::default()
        };
        let err = write_records(&records(), &path, &unscaled).unwrap_err();
        assert!(err.to_string().contains("pixel_size_um"));

        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
