//! CAN-FD Frame Decoder Library
//!
//! A stateless, reusable library for turning raw CAN-FD frames received from
//! a channel adapter into classified, display-ready frame descriptions.
//!
//! # Architecture
//!
//! The read path is: channel adapter → [`RawFrame`] → [`FrameDecoder`] →
//! [`DecodedFrame`] → reporter.
//!
//! - [`FrameDecoder`] is pure: no I/O, no state, never fails
//! - [`ChannelAdapter`] abstracts the hardware channel, bound to an explicit
//!   [`ChannelHandle`]
//! - [`ReceiveStream`] is a lazy, unbounded iterator over decoded frames and
//!   adapter signals; the consumer decides when to stop
//! - [`CaptureParser`] replays recorded sessions through a [`ScriptedAdapter`]
//!
//! The library does NOT:
//! - Drive hardware or compute bit timing
//! - Transmit frames
//! - Print or format reports
//!
//! Reporting lives in the application layer (canfd-cli).
//!
//! # Example Usage
//!
//! ```
//! use canfd_decoder::{
//!     open_channel, ChannelHandle, FdBitrate, FrameFlags, MonitorConfig, RawFrame,
//!     ReadOutcome, ReceiveStream, Reception, ScriptedAdapter,
//! };
//!
//! let raw = RawFrame::new(0x123, FrameFlags::FD, 9, (1..=12).collect::<Vec<u8>>(), 2_345_678);
//! let mut adapter = ScriptedAdapter::new(ChannelHandle::USB_BUS_1, vec![ReadOutcome::Frame(raw)]);
//! open_channel(&mut adapter, &FdBitrate::default()).unwrap();
//!
//! for reception in ReceiveStream::new(&mut adapter, MonitorConfig::new()) {
//!     if let Reception::Frame(frame) = reception {
//!         assert_eq!(frame.type_label(), "Standard Frame");
//!         assert_eq!(frame.length, 12);
//!         assert_eq!(frame.time_seconds, "2.3");
//!     }
//! }
//! ```

// Public modules
pub mod adapter;
pub mod capture;
pub mod config;
pub mod decoder;
pub mod dlc;
pub mod monitor;
pub mod types;

// Re-export main types for convenience
pub use adapter::{
    describe_status, open_channel, ChannelAdapter, ChannelHandle, ReadOutcome, ScriptedAdapter,
    StatusCode,
};
pub use capture::CaptureParser;
pub use config::{FdBitrate, MonitorConfig};
pub use decoder::{decode, FrameDecoder, REMOTE_REQUEST_TEXT};
pub use dlc::dlc_to_length;
pub use monitor::{Reception, ReceiveStream};
pub use types::{DecodedFrame, FrameFlags, FrameType, MonitorError, RawFrame, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
