//! snakeconv CLI - Convert QuimP snake exports to AmoePy files
//!
//! ```bash
//! snakeconv convert snake.csv                      # -> snake_converted.csv (frame,node,x,y)
//! snakeconv convert cell.snQP --layout wide \
//!     --time-per-frame 5                           # AmoePy time series
//! snakeconv inspect snake.csv --frames 3           # Frame statistics + preview
//! snakeconv show-config                            # Default options as JSON
//! ```
//!
//! Options are read from defaults, then `--config <file.json>`, then
//! `SNAKECONV_*` variables (a `.env` file is honoured), then flags.

use clap::{Args, Parser, Subcommand};
use snakeconv::config::parse_delimiter;
use snakeconv::logs::{log_error, log_info, log_info_indent, log_warning, LOGGER};
use snakeconv::{
    convert, default_output_path, preview, summarize, write, ConvertOptions, Dialect, InspectReport,
    Layout,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "snakeconv")]
#[command(about = "Convert QuimP snake files to AmoePy coordinate files", long_about = None)]
struct Cli {
    /// Only print results, no progress
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a QuimP snake file
    Convert {
        /// Input snake file (tab-separated)
        input: PathBuf,

        /// Output file (default: <input>_converted.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Destination layout
        #[arg(short, long, value_enum)]
        layout: Option<Layout>,

        /// Long layout delimiter (',' by default; "space" accepted)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Omit the long layout header row
        #[arg(long)]
        no_header: bool,

        /// Fixed decimals for long layout coordinates
        #[arg(long)]
        precision: Option<usize>,

        /// Seconds between frames (wide layout)
        #[arg(long)]
        time_per_frame: Option<f64>,

        /// Coordinates are divided by this (wide layout)
        #[arg(long)]
        pixel_size: Option<f64>,
    },

    /// Show frame statistics and the first frames of a snake file
    Inspect {
        /// Input snake file (tab-separated)
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Number of frames to preview
        #[arg(long, default_value = "3")]
        frames: usize,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    ShowConfig {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Source options shared by `convert` and `inspect`.
#[derive(Args)]
struct SourceArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source dialect (auto-detected by default)
    #[arg(long, value_enum)]
    dialect: Option<Dialect>,

    /// Index of the first frame in the source [default: 1 for blocks, 0 for table]
    #[arg(long)]
    source_frame_base: Option<i64>,
}

impl SourceArgs {
    fn load(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut options = load_options(self.config.as_deref())?;
        if let Some(dialect) = self.dialect {
            options.source.dialect = dialect;
        }
        if let Some(base) = self.source_frame_base {
            options.source.frame_base = Some(base);
        }
        Ok(options)
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            source,
            layout,
            delimiter,
            no_header,
            precision,
            time_per_frame,
            pixel_size,
        } => source.load().and_then(|mut options| {
            if let Some(layout) = layout {
                options.output.layout = layout;
            }
            if let Some(ref d) = delimiter {
                options.output.delimiter = parse_delimiter(d)?;
            }
            if no_header {
                options.output.header = false;
            }
            if precision.is_some() {
                options.output.precision = precision;
            }
            if let Some(t) = time_per_frame {
                options.output.time_per_frame = t;
            }
            if let Some(p) = pixel_size {
                options.output.pixel_size_um = p;
            }
            cmd_convert(&input, output.as_deref(), &options)
        }),

        Commands::Inspect {
            input,
            source,
            frames,
            json,
        } => source
            .load()
            .and_then(|options| cmd_inspect(&input, &options, frames, json)),

        Commands::ShowConfig { config } => cmd_show_config(config.as_deref()),
    };

    if let Err(e) = result {
        LOGGER.set_quiet(false);
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn load_options(config: Option<&Path>) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => ConvertOptions::from_file(path)?,
        None => ConvertOptions::default(),
    };
    options.apply_env()?;
    Ok(options)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    options.validate()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    log_info(format!("📄 Converting: {}", input.display()));
    let conversion = convert(input, &options.source)?;

    if let Some(summary) = summarize(&conversion.records) {
        log_info_indent(format!("Frames: {} to {}", summary.first_frame, summary.last_frame), 1);
        log_info_indent(
            format!("Nodes per frame: {} to {}", summary.min_nodes, summary.max_nodes),
            1,
        );
    }

    write(&conversion.records, &output, &options.output)?;
    println!("{}", output.display());
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    options: &ConvertOptions,
    frames: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    options.validate()?;
    let conversion = convert(input, &options.source)?;

    if json {
        let report = InspectReport::new(conversion, frames);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = summarize(&conversion.records);
    let previews = preview(&conversion.records, frames);

    let Some(summary) = summary else {
        return Ok(());
    };

    println!("Number of frames: {}", summary.frame_count);
    println!("Frame range: {} to {}", summary.first_frame, summary.last_frame);
    println!("Nodes per frame: {} to {}", summary.min_nodes, summary.max_nodes);
    println!("Average nodes per frame: {:.1}", summary.mean_nodes);
    if summary.is_consistent() {
        println!("Consistent node count across all frames: {}", summary.min_nodes);
    } else {
        log_warning(format!("Variable node counts detected: {:?}", summary.node_counts));
    }

    for frame in &previews {
        println!("\nFrame {} ({} nodes):", frame.frame, frame.node_count);
        println!("Node#\tX\tY");
        for (i, p) in frame.nodes.iter().enumerate() {
            println!("{}\t{:.4}\t{:.4}", i, p.x, p.y);
        }
        if frame.hidden_nodes() > 0 {
            println!("... and {} more nodes", frame.hidden_nodes());
        }
    }

    Ok(())
}

fn cmd_show_config(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(config)?;
    println!("{}", options.to_json()?);
    Ok(())
}
