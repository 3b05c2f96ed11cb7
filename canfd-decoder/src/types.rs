//! Core types for the CAN-FD frame decoder
//!
//! This module defines the raw frame record handed over by a channel adapter,
//! the decoded frame the decoder produces from it, and the error type used by
//! the adapter layer. The decoder itself never fails.

use crate::adapter::{ChannelHandle, StatusCode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Mask selecting the 11 meaningful bits of a standard identifier
pub const STANDARD_ID_MASK: u32 = 0x7FF;

/// Mask selecting the 29 meaningful bits of an extended identifier
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

/// Message type flags reported by the adapter alongside each frame
///
/// Bit positions follow the PCAN-Basic `MSGTYPE` layout. The decoder only
/// tests membership, so other adapters translate their own encoding into
/// these bits when building a [`RawFrame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameFlags(u8);

bitflags! {
    impl FrameFlags: u8 {
        /// Remote transmission request
        const REMOTE_REQUEST = 0x01;
        /// 29-bit identifier
        const EXTENDED = 0x02;
        /// Flexible data-rate frame
        const FD = 0x04;
        /// Data phase used the faster bit-rate
        const BITRATE_SWITCH = 0x08;
        /// Transmitter was error passive
        const ERROR_STATE_INDICATOR = 0x10;
    }
}

/// Raw CAN / CAN-FD frame as received from a channel adapter
///
/// This is the record before any interpretation: the identifier is not yet
/// masked, and `dlc` is a length code rather than a byte count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    /// Arbitration ID (11-bit or 29-bit, unmasked)
    pub id: u32,
    /// Message type flags
    #[serde(default)]
    pub flags: FrameFlags,
    /// Data Length Code (0-15, an index into the CAN-FD length table)
    pub dlc: u8,
    /// Payload buffer; only the first `dlc_to_length(dlc)` bytes are data
    #[serde(default)]
    pub payload: Vec<u8>,
    /// Hardware timestamp in microseconds since the adapter epoch
    #[serde(default)]
    pub timestamp_ticks: u64,
}

impl RawFrame {
    /// Create a new raw frame
    pub fn new(id: u32, flags: FrameFlags, dlc: u8, payload: Vec<u8>, timestamp_ticks: u64) -> Self {
        Self {
            id,
            flags,
            dlc,
            payload,
            timestamp_ticks,
        }
    }

    /// True if this frame carries a 29-bit identifier
    pub fn is_extended(&self) -> bool {
        self.flags.contains(FrameFlags::EXTENDED)
    }

    /// True if this is a remote transmission request
    pub fn is_remote(&self) -> bool {
        self.flags.contains(FrameFlags::REMOTE_REQUEST)
    }

    /// True if this is a CAN-FD frame
    pub fn is_fd(&self) -> bool {
        self.flags.contains(FrameFlags::FD)
    }

    /// True if the data phase was sent with bit-rate switching
    pub fn is_bitrate_switch(&self) -> bool {
        self.flags.contains(FrameFlags::BITRATE_SWITCH)
    }

    /// True if the transmitter signalled error-passive state
    pub fn is_error_state(&self) -> bool {
        self.flags.contains(FrameFlags::ERROR_STATE_INDICATOR)
    }

    /// Identifier as it is displayed and filtered on
    ///
    /// Standard identifiers are masked to 11 bits; extended identifiers are
    /// kept whole, including any bits above bit 28.
    pub fn display_id(&self) -> u32 {
        if self.is_extended() {
            self.id
        } else {
            self.id & STANDARD_ID_MASK
        }
    }
}

/// Frame classification derived from the extended and remote flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    #[serde(rename = "Standard Frame")]
    Standard,
    #[serde(rename = "Extended Frame")]
    Extended,
    #[serde(rename = "RTR Frame (Standard ID)")]
    RemoteStandard,
    #[serde(rename = "RTR Frame (Extended ID)")]
    RemoteExtended,
}

impl FrameType {
    /// Human readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            FrameType::Standard => "Standard Frame",
            FrameType::Extended => "Extended Frame",
            FrameType::RemoteStandard => "RTR Frame (Standard ID)",
            FrameType::RemoteExtended => "RTR Frame (Extended ID)",
        }
    }

    /// True for either remote variant
    pub fn is_remote(&self) -> bool {
        matches!(self, FrameType::RemoteStandard | FrameType::RemoteExtended)
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded frame - the output of the decoder
///
/// A plain value with no identity beyond its contents. Every text field is
/// already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedFrame {
    /// Classification (serialized as its label)
    #[serde(rename = "type")]
    pub frame_type: FrameType,
    /// Uppercase hex identifier, masked to 11 bits for standard frames
    pub id_text: String,
    /// Data length in bytes derived from the DLC
    pub length: usize,
    /// Timestamp in seconds with one decimal place
    pub time_seconds: String,
    /// "Remote Request" or space separated hex bytes
    pub data_text: String,
    /// Raw timestamp the text was derived from
    pub timestamp_ticks: u64,
    /// True if this is a CAN-FD frame
    pub is_fd: bool,
    /// True if bit-rate switching was used
    pub bitrate_switch: bool,
    /// True if the error state indicator was set
    pub error_state_indicator: bool,
    /// True if the payload buffer held fewer bytes than the DLC announced
    pub data_truncated: bool,
}

impl DecodedFrame {
    /// Label of the frame type
    pub fn type_label(&self) -> &'static str {
        self.frame_type.label()
    }
}

/// Errors raised by the adapter layer and the replay tooling
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to initialize channel {channel}: status 0x{status}")]
    Initialize {
        channel: ChannelHandle,
        status: StatusCode,
    },

    #[error("Failed to configure message filter on channel {channel}: status 0x{status}")]
    Filter {
        channel: ChannelHandle,
        status: StatusCode,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse capture line {line}: {message}")]
    ReplayParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
