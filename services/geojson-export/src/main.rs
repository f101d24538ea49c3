//! GeoJSON export CLI
//!
//! Encodes a newline-delimited feature stream as a GeoJSON FeatureCollection.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use geojson_export::{export, ExportConfig, ExportRequest};
use wfs_geojson::{format_options, OutputFormat};

/// GeoJSON export
#[derive(Parser, Debug)]
#[command(name = "geojson-export")]
#[command(about = "Encode newline-delimited feature records as a GeoJSON FeatureCollection")]
struct Args {
    /// Input file of feature records, `-` for stdin
    #[arg(short, long, default_value = "-", env = "GEOJSON_INPUT")]
    input: String,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-", env = "GEOJSON_OUTPUT")]
    output: String,

    /// Output format: application/json, json or text/javascript
    #[arg(long, default_value = "application/json", env = "GEOJSON_OUTPUT_FORMAT")]
    output_format: String,

    /// Format options, e.g. `id_policy:name;callback:myFunc`
    #[arg(long, default_value = "", env = "GEOJSON_FORMAT_OPTIONS")]
    format_options: String,

    /// Maximum number of features to write
    #[arg(long, env = "GEOJSON_MAX_FEATURES")]
    max_features: Option<usize>,

    /// CRS of records that do not name one
    #[arg(long, env = "GEOJSON_DEFAULT_CRS")]
    default_crs: Option<String>,

    /// Treat every input CRS as longitude-first
    #[arg(long, env = "GEOJSON_FORCE_LON_LAT")]
    force_lon_lat: bool,

    /// YAML config file; encoder settings come from the environment otherwise
    #[arg(short, long, env = "GEOJSON_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "GEOJSON_LOG_JSON")]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    info!("Starting GeoJSON export");

    let config = ExportConfig::load_or_env(args.config.as_deref())?;
    let request = ExportRequest {
        output_format: OutputFormat::from_name(&args.output_format)
            .context("Invalid output format")?,
        format_options: format_options::parse_kvp(&args.format_options)
            .context("Invalid format options")?,
        max_features: args.max_features,
        default_crs: args.default_crs.clone().or(config.default_crs.clone()),
        force_lon_lat: args.force_lon_lat || config.force_lon_lat,
    };

    let input = open_input(&args.input)?;
    let output = open_output(&args.output)?;

    let (mut output, summary) = export(input, output, &request, &config.encoder)?;
    output.flush().context("Failed to flush output")?;

    info!(
        returned = summary.returned,
        total_features = summary.total_features,
        skipped = summary.skipped,
        output = %args.output,
        "Wrote {}",
        summary.content_type
    );
    Ok(())
}

fn init_tracing(args: &Args) {
    // Logs go to stderr so stdout can carry the document
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("Failed to open input: {}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file = File::create(path).with_context(|| format!("Failed to create output: {}", path))?;
    Ok(Box::new(BufWriter::new(file)))
}
