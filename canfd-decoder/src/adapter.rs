//! Channel adapter interface
//!
//! A channel adapter owns a hardware (or simulated) CAN-FD channel and hands
//! out, on demand, a raw frame, an empty-queue signal or a status code. The
//! channel is identified by an explicit [`ChannelHandle`] passed at
//! construction; there is no process-wide channel state.

use crate::config::FdBitrate;
use crate::types::{MonitorError, RawFrame, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Identifier of a hardware channel (PCAN-Basic channel handle numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelHandle(pub u16);

impl ChannelHandle {
    /// First USB channel
    pub const USB_BUS_1: ChannelHandle = ChannelHandle(0x51);

    /// USB channel `n` (1-8)
    pub fn usb_bus(n: u8) -> Option<Self> {
        match n {
            1..=8 => Some(ChannelHandle(0x50 + n as u16)),
            _ => None,
        }
    }
}

impl Default for ChannelHandle {
    fn default() -> Self {
        Self::USB_BUS_1
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

/// Opaque status code returned by an adapter call
///
/// Bit values follow PCAN-Basic. Only a few codes carry meaning for the
/// monitor; everything else is passed to the reporter untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0x0000_0000);
    pub const OVERRUN: StatusCode = StatusCode(0x0000_0002);
    pub const BUS_LIGHT: StatusCode = StatusCode(0x0000_0004);
    pub const BUS_HEAVY: StatusCode = StatusCode(0x0000_0008);
    pub const BUS_OFF: StatusCode = StatusCode(0x0000_0010);
    pub const QUEUE_EMPTY: StatusCode = StatusCode(0x0000_0020);
    pub const QUEUE_OVERRUN: StatusCode = StatusCode(0x0000_0040);
    pub const ILLEGAL_HARDWARE: StatusCode = StatusCode(0x0000_1400);
    pub const BUS_PASSIVE: StatusCode = StatusCode(0x0004_0000);
    pub const NOT_INITIALIZED: StatusCode = StatusCode(0x0400_0000);

    const BUS_ERROR_BITS: u32 =
        Self::BUS_LIGHT.0 | Self::BUS_HEAVY.0 | Self::BUS_OFF.0 | Self::BUS_PASSIVE.0;

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    pub fn is_queue_empty(self) -> bool {
        self == Self::QUEUE_EMPTY
    }

    /// True if any bus error state bit is set
    pub fn is_bus_error(self) -> bool {
        self.0 & Self::BUS_ERROR_BITS != 0
    }

    /// Built-in description for the codes the monitor knows about
    pub fn description(self) -> Option<&'static str> {
        let text = match self {
            Self::OK => "No error. Success.",
            Self::OVERRUN => "The CAN controller was read too late",
            Self::BUS_LIGHT => "Bus error: an error counter reached the 'light' limit",
            Self::BUS_HEAVY => "Bus error: an error counter reached the 'heavy' limit",
            Self::BUS_OFF => "Bus error: the CAN controller is in bus-off state",
            Self::QUEUE_EMPTY => "Receive queue is empty",
            Self::QUEUE_OVERRUN => "Receive queue was read too late",
            Self::ILLEGAL_HARDWARE => "The channel handle is illegal",
            Self::BUS_PASSIVE => "Bus error: the CAN controller is error passive",
            Self::NOT_INITIALIZED => "The channel is not initialized",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// Result of a single read call on a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadOutcome {
    /// A frame was received
    Frame(RawFrame),
    /// The receive queue is empty
    Empty,
    /// The adapter reported a status other than success
    Error { status: StatusCode },
}

/// A source of raw frames bound to one channel
pub trait ChannelAdapter {
    /// Channel this adapter was opened on
    fn handle(&self) -> ChannelHandle;

    /// Initialize the channel in CAN-FD mode with the given bit-rate
    fn initialize(&mut self, bitrate: &FdBitrate) -> StatusCode;

    /// Open or close the acceptance filter
    fn set_filter_open(&mut self, open: bool) -> StatusCode;

    /// Read the next outcome from the receive queue
    ///
    /// Live adapters always return `Some`; finite sources such as recorded
    /// captures return `None` once exhausted.
    fn read(&mut self) -> Option<ReadOutcome>;

    /// Operator-facing text for a status code, if the adapter can provide one
    fn error_text(&self, status: StatusCode) -> Option<String>;
}

/// Initialize a channel and open its acceptance filter to all messages
///
/// The filter is closed before being reopened so that any filter left over
/// from an earlier session is discarded.
pub fn open_channel<A: ChannelAdapter + ?Sized>(adapter: &mut A, bitrate: &FdBitrate) -> Result<()> {
    bitrate.validate()?;
    let channel = adapter.handle();

    log::info!("Initializing channel {} ({})", channel, bitrate.parameter_string());
    let status = adapter.initialize(bitrate);
    if !status.is_ok() {
        return Err(MonitorError::Initialize { channel, status });
    }

    for open in [false, true] {
        let status = adapter.set_filter_open(open);
        if !status.is_ok() {
            return Err(MonitorError::Filter { channel, status });
        }
    }

    log::info!("Channel {} initialized, filter open", channel);
    Ok(())
}

/// Operator-facing text for a status code
///
/// Falls back to a generic message carrying the raw code when the adapter
/// cannot translate it.
pub fn describe_status<A: ChannelAdapter + ?Sized>(adapter: &A, status: StatusCode) -> String {
    adapter.error_text(status).unwrap_or_else(|| {
        format!("An error occurred. Error-code's text ({}) couldn't be retrieved", status)
    })
}

/// In-memory adapter replaying a fixed list of outcomes
///
/// Used as a test double and as the backend for recorded captures.
#[derive(Debug, Clone)]
pub struct ScriptedAdapter {
    handle: ChannelHandle,
    outcomes: VecDeque<ReadOutcome>,
    init_status: StatusCode,
    filter_status: StatusCode,
    initialized: bool,
    filter_open: bool,
}

impl ScriptedAdapter {
    /// Create an adapter on `handle` that will yield `outcomes` in order
    pub fn new(handle: ChannelHandle, outcomes: Vec<ReadOutcome>) -> Self {
        Self {
            handle,
            outcomes: VecDeque::from(outcomes),
            init_status: StatusCode::OK,
            filter_status: StatusCode::OK,
            initialized: false,
            filter_open: false,
        }
    }

    /// Builder method: status returned by `initialize`
    pub fn with_init_status(mut self, status: StatusCode) -> Self {
        self.init_status = status;
        self
    }

    /// Builder method: status returned by `set_filter_open`
    pub fn with_filter_status(mut self, status: StatusCode) -> Self {
        self.filter_status = status;
        self
    }

    /// Number of outcomes not yet read
    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_filter_open(&self) -> bool {
        self.filter_open
    }
}

impl ChannelAdapter for ScriptedAdapter {
    fn handle(&self) -> ChannelHandle {
        self.handle
    }

    fn initialize(&mut self, _bitrate: &FdBitrate) -> StatusCode {
        self.initialized = self.init_status.is_ok();
        self.init_status
    }

    fn set_filter_open(&mut self, open: bool) -> StatusCode {
        if !self.initialized {
            return StatusCode::NOT_INITIALIZED;
        }
        if self.filter_status.is_ok() {
            self.filter_open = open;
        }
        self.filter_status
    }

    fn read(&mut self) -> Option<ReadOutcome> {
        if !self.initialized {
            return Some(ReadOutcome::Error {
                status: StatusCode::NOT_INITIALIZED,
            });
        }
        self.outcomes.pop_front()
    }

    fn error_text(&self, status: StatusCode) -> Option<String> {
        status.description().map(str::to_string)
    }
}
