//! Report generation
//!
//! Writes decoded frames and adapter signals to an output sink, either as
//! labelled text blocks or as JSON lines.

use crate::config::OutputFormat;
use anyhow::Result;
use canfd_decoder::{DecodedFrame, StatusCode};
use serde_json::json;
use std::io::Write;

const FRAME_SEPARATOR_WIDTH: usize = 58;
const STATUS_SEPARATOR_WIDTH: usize = 89;

/// Troubleshooting hints printed after bus errors
pub const BUS_ERROR_SUGGESTIONS: [&str; 3] = [
    "Check CAN bus termination.",
    "Ensure all devices use the same bitrate.",
    "Inspect cabling for loose connections.",
];

/// Counters collected while reporting
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportStats {
    pub frames: usize,
    pub fd_frames: usize,
    pub remote_frames: usize,
    pub truncated_frames: usize,
    pub empty_polls: usize,
    pub status_codes: usize,
}

/// Formats receptions to a writer
pub struct Reporter<W: Write> {
    format: OutputFormat,
    writer: W,
    stats: ReportStats,
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            writer,
            stats: ReportStats::default(),
        }
    }

    pub fn stats(&self) -> &ReportStats {
        &self.stats
    }

    /// Consume the reporter and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Report one decoded frame
    pub fn report_frame(&mut self, frame: &DecodedFrame) -> Result<()> {
        self.stats.frames += 1;
        if frame.is_fd {
            self.stats.fd_frames += 1;
        }
        if frame.frame_type.is_remote() {
            self.stats.remote_frames += 1;
        }
        if frame.data_truncated {
            self.stats.truncated_frames += 1;
        }

        match self.format {
            OutputFormat::Txt => {
                writeln!(self.writer, "Type: {}", frame.type_label())?;
                writeln!(self.writer, "ID: {}", frame.id_text)?;
                writeln!(self.writer, "Length: {}", frame.length)?;
                writeln!(self.writer, "Time: {}", frame.time_seconds)?;
                let flags = flag_names(frame);
                if !flags.is_empty() {
                    writeln!(self.writer, "Flags: {}", flags.join(" "))?;
                }
                if frame.data_truncated {
                    writeln!(self.writer, "Data: {} (truncated)", frame.data_text)?;
                } else {
                    writeln!(self.writer, "Data: {}", frame.data_text)?;
                }
                writeln!(self.writer, "{}", "-".repeat(FRAME_SEPARATOR_WIDTH))?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, frame)?;
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    /// Report an empty receive queue
    pub fn report_empty(&mut self) -> Result<()> {
        self.stats.empty_polls += 1;

        match self.format {
            OutputFormat::Txt => writeln!(self.writer, "No messages received. Waiting...")?,
            OutputFormat::Json => writeln!(self.writer, "{}", json!({ "kind": "empty" }))?,
        }
        Ok(())
    }

    /// Report an adapter status code with its operator-facing text
    pub fn report_status(&mut self, status: StatusCode, text: &str) -> Result<()> {
        self.stats.status_codes += 1;
        let suggestions: &[&str] = if is_bus_error(status, text) {
            &BUS_ERROR_SUGGESTIONS
        } else {
            &[]
        };

        match self.format {
            OutputFormat::Txt => {
                let rule = "=".repeat(STATUS_SEPARATOR_WIDTH);
                writeln!(self.writer, "{}", rule)?;
                writeln!(self.writer, "{}", text)?;
                if !suggestions.is_empty() {
                    writeln!(self.writer, "Suggested actions:")?;
                    for (i, suggestion) in suggestions.iter().enumerate() {
                        writeln!(self.writer, "{}. {}", i + 1, suggestion)?;
                    }
                }
                writeln!(self.writer, "{}", rule)?;
            }
            OutputFormat::Json => {
                let record = json!({
                    "kind": "status",
                    "status": format!("0x{}", status),
                    "text": text,
                    "suggestions": suggestions,
                });
                writeln!(self.writer, "{}", record)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Bus errors are recognized by code, or by the adapter's own wording
fn is_bus_error(status: StatusCode, text: &str) -> bool {
    status.is_bus_error() || text.contains("Bus error")
}

fn flag_names(frame: &DecodedFrame) -> Vec<&'static str> {
    let mut names = Vec::new();
    if frame.is_fd {
        names.push("FD");
    }
    if frame.bitrate_switch {
        names.push("BRS");
    }
    if frame.error_state_indicator {
        names.push("ESI");
    }
    names
}
