//! Monitor configuration types
//!
//! This module defines the configuration consumed by the library: the CAN-FD
//! bit-rate parameters handed to an adapter at initialization, and the
//! filters applied by the receive stream. The decoder itself takes no
//! configuration.

use crate::types::{MonitorError, RawFrame, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the receive stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Drop classic CAN frames and only report CAN-FD frames
    #[serde(default)]
    pub fd_only: bool,

    /// Optional: only report these identifiers (compared as displayed)
    #[serde(default)]
    pub id_filter: Option<Vec<u32>>,

    /// Whether empty-queue polls are passed on to the consumer
    #[serde(default)]
    pub report_empty: bool,
}

impl MonitorConfig {
    /// Create a new monitor configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: only report CAN-FD frames
    pub fn with_fd_only(mut self, enabled: bool) -> Self {
        self.fd_only = enabled;
        self
    }

    /// Builder method: set identifier filter
    pub fn with_id_filter(mut self, ids: Vec<u32>) -> Self {
        self.id_filter = Some(ids);
        self
    }

    /// Builder method: pass empty-queue polls through
    pub fn with_report_empty(mut self, enabled: bool) -> Self {
        self.report_empty = enabled;
        self
    }

    /// Check if an identifier should be reported
    pub fn should_report_id(&self, id: u32) -> bool {
        match &self.id_filter {
            Some(ids) => ids.contains(&id),
            None => true,
        }
    }

    /// Check if a frame passes all filters
    ///
    /// The identifier filter matches the same value the report shows
    /// (see [`RawFrame::display_id`]).
    pub fn should_report_frame(&self, frame: &RawFrame) -> bool {
        (!self.fd_only || frame.is_fd()) && self.should_report_id(frame.display_id())
    }
}

/// CAN-FD bit-rate parameters for channel initialization
///
/// Plain register values for the nominal (arbitration) and data phases.
/// The defaults give 500 kbit/s nominal and 2 Mbit/s data from a 20 MHz
/// clock with a 75% nominal sample point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdBitrate {
    pub f_clock_mhz: u32,
    pub nom_brp: u32,
    pub nom_tseg1: u32,
    pub nom_tseg2: u32,
    pub nom_sjw: u32,
    pub data_brp: u32,
    pub data_tseg1: u32,
    pub data_tseg2: u32,
    pub data_sjw: u32,
}

impl Default for FdBitrate {
    fn default() -> Self {
        Self {
            f_clock_mhz: 20,
            nom_brp: 5,
            nom_tseg1: 13,
            nom_tseg2: 2,
            nom_sjw: 2,
            data_brp: 1,
            data_tseg1: 7,
            data_tseg2: 2,
            data_sjw: 1,
        }
    }
}

impl FdBitrate {
    /// Render the parameter string understood by PCAN-Basic `InitializeFD`
    pub fn parameter_string(&self) -> String {
        format!(
            "f_clock_mhz={}, nom_brp={}, nom_tseg1={}, nom_tseg2={}, nom_sjw={}, \
             data_brp={}, data_tseg1={}, data_tseg2={}, data_sjw={}",
            self.f_clock_mhz,
            self.nom_brp,
            self.nom_tseg1,
            self.nom_tseg2,
            self.nom_sjw,
            self.data_brp,
            self.data_tseg1,
            self.data_tseg2,
            self.data_sjw,
        )
    }

    /// Reject parameter sets no controller can accept
    ///
    /// Only structural checks: every field must be non-zero and the jump
    /// width may not exceed the second segment. Hardware-specific ranges
    /// are left to the adapter.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("f_clock_mhz", self.f_clock_mhz),
            ("nom_brp", self.nom_brp),
            ("nom_tseg1", self.nom_tseg1),
            ("nom_tseg2", self.nom_tseg2),
            ("nom_sjw", self.nom_sjw),
            ("data_brp", self.data_brp),
            ("data_tseg1", self.data_tseg1),
            ("data_tseg2", self.data_tseg2),
            ("data_sjw", self.data_sjw),
        ];

        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(MonitorError::InvalidConfig(format!("{} must be non-zero", name)));
        }
        if self.nom_sjw > self.nom_tseg2 {
            return Err(MonitorError::InvalidConfig(
                "nom_sjw must not exceed nom_tseg2".to_string(),
            ));
        }
        if self.data_sjw > self.data_tseg2 {
            return Err(MonitorError::InvalidConfig(
                "data_sjw must not exceed data_tseg2".to_string(),
            ));
        }
        Ok(())
    }
}
