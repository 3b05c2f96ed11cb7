//! CAN-FD Monitor CLI Application
//!
//! This is the command-line interface for the CAN-FD receive monitor.
//! It uses the canfd-decoder library and adds:
//! - TOML configuration with command-line overrides
//! - Capture replay through the library's scripted adapter
//! - Text and JSON-lines reporting with bus error hints

use anyhow::{Context, Result};
use canfd_decoder::{
    describe_status, open_channel, CaptureParser, ChannelHandle, ReceiveStream, Reception,
};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::Reporter;

/// CAN-FD Monitor - Decode and report received CAN-FD frames
#[derive(Parser, Debug)]
#[command(name = "canfd-monitor")]
#[command(about = "Decode and report received CAN-FD frames", long_about = None)]
#[command(version)]
struct Args {
    /// Recorded capture (JSON lines) to replay through the receive path
    #[arg(short, long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// USB channel number (1-8), overrides the config file
    #[arg(long, value_name = "N")]
    channel: Option<u8>,

    /// Only report CAN-FD frames
    #[arg(long)]
    fd_only: bool,

    /// Only report this identifier, in hex (can be repeated)
    #[arg(long = "id", value_name = "HEX", value_parser = parse_hex_id)]
    ids: Vec<u32>,

    /// Report empty receive queue polls
    #[arg(long)]
    show_empty: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, value_name = "COUNT")]
    max_frames: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN-FD Monitor v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", canfd_decoder::VERSION);

    let config = resolve_config(&args)?;

    match &args.replay {
        Some(capture_path) => replay_mode(capture_path, &config, &args),
        None => {
            // No hardware driver is linked into this build
            println!("CAN-FD Monitor - No input specified");
            println!("\nQuick Start:");
            println!("  canfd-monitor --replay session.jsonl");
            println!("  canfd-monitor --replay session.jsonl --fd-only --format json");
            println!("\nWith a configuration file:");
            println!("  canfd-monitor --config config.toml --replay session.jsonl");
            println!("\nUse --help for more options");
            Ok(())
        }
    }
}

/// Load the config file (if any) and apply command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(channel) = args.channel {
        config.channel.usb_bus = channel;
    }
    if args.fd_only {
        config.monitor.fd_only = true;
    }
    if !args.ids.is_empty() {
        config.monitor.id_filter = Some(args.ids.clone());
    }
    if args.show_empty {
        config.monitor.report_empty = true;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Replay a recorded capture through the receive path and report it
fn replay_mode(capture_path: &PathBuf, config: &AppConfig, args: &Args) -> Result<()> {
    let handle: ChannelHandle = config.channel.handle()?;

    let mut adapter = CaptureParser::open(capture_path, handle)
        .with_context(|| format!("Failed to load capture: {:?}", capture_path))?;

    open_channel(&mut adapter, &config.bitrate)
        .with_context(|| format!("Cannot initialize channel {}", handle))?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut reporter = Reporter::new(config.output.format, sink);

    let mut stream = ReceiveStream::new(&mut adapter, config.monitor.clone());
    loop {
        if args.max_frames.is_some_and(|max| reporter.stats().frames >= max) {
            log::info!("Reached frame limit, stopping");
            break;
        }
        let Some(reception) = stream.next() else {
            break;
        };

        match reception {
            Reception::Frame(frame) => reporter.report_frame(&frame)?,
            Reception::Empty => reporter.report_empty()?,
            Reception::Status(status) => {
                let text = describe_status(stream.adapter(), status);
                reporter.report_status(status, &text)?;
            }
        }
    }
    reporter.flush()?;

    let stats = reporter.stats();
    log::info!(
        "Replay finished: {} frames ({} FD, {} remote, {} truncated), {} empty polls, {} status codes",
        stats.frames,
        stats.fd_frames,
        stats.remote_frames,
        stats.truncated_frames,
        stats.empty_polls,
        stats.status_codes
    );

    Ok(())
}

/// Parse an identifier given in hex, with or without a 0x prefix
fn parse_hex_id(value: &str) -> std::result::Result<u32, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex identifier '{}': {}", value, e))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
