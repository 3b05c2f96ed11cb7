//! Recorded capture files
//!
//! A capture is a JSON-lines file holding one [`ReadOutcome`] per line, in
//! the order the adapter returned them:
//!
//! ```text
//! {"kind":"frame","id":291,"flags":4,"dlc":9,"payload":[1,2,3,4,5,6,7,8,9,10,11,12],"timestamp_ticks":2345678}
//! {"kind":"empty"}
//! {"kind":"error","status":4}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Loading a capture
//! into a [`ScriptedAdapter`] replays the session through the same receive
//! path as a live channel.

use crate::adapter::{ChannelHandle, ReadOutcome, ScriptedAdapter};
use crate::types::{MonitorError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Capture file parser
pub struct CaptureParser;

impl CaptureParser {
    /// Parse a capture file
    pub fn parse(path: &Path) -> Result<Vec<ReadOutcome>> {
        log::info!("Parsing capture file: {:?}", path);

        let file = File::open(path)?;
        let outcomes = Self::parse_reader(BufReader::new(file))?;

        log::info!("Capture loaded: {} records", outcomes.len());
        Ok(outcomes)
    }

    /// Parse capture records from any buffered reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<ReadOutcome>> {
        let mut outcomes = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let outcome = serde_json::from_str(trimmed).map_err(|e| MonitorError::ReplayParse {
                line: index + 1,
                message: e.to_string(),
            })?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Load a capture file into an adapter bound to `handle`
    pub fn open(path: &Path, handle: ChannelHandle) -> Result<ScriptedAdapter> {
        let outcomes = Self::parse(path)?;
        Ok(ScriptedAdapter::new(handle, outcomes))
    }
}
