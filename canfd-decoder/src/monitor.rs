//! Receive stream
//!
//! Wraps a channel adapter in a lazy iterator of decoded frames and adapter
//! signals. The stream never decides when to stop on a live channel; the
//! consumer does (`take`, `take_while`, a shutdown flag, ...).

use crate::adapter::{ChannelAdapter, ReadOutcome, StatusCode};
use crate::config::MonitorConfig;
use crate::decoder::{id_fits_domain, FrameDecoder};
use crate::types::DecodedFrame;

/// One item produced by the receive stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reception {
    /// A frame was received and decoded
    Frame(DecodedFrame),
    /// The receive queue was empty (only yielded when `report_empty` is set)
    Empty,
    /// The adapter returned a status code instead of a frame
    Status(StatusCode),
}

/// Iterator that polls an adapter and decodes every received frame
///
/// For each poll:
/// 1. Frame → check filters → decode
/// 2. Empty queue → skip, or yield `Reception::Empty` if requested
/// 3. Status code → forward untouched
pub struct ReceiveStream<'a, A: ChannelAdapter + ?Sized> {
    adapter: &'a mut A,
    config: MonitorConfig,
}

impl<'a, A: ChannelAdapter + ?Sized> ReceiveStream<'a, A> {
    /// Create a stream over an already opened adapter
    pub fn new(adapter: &'a mut A, config: MonitorConfig) -> Self {
        Self { adapter, config }
    }

    /// Adapter the stream is polling
    pub fn adapter(&self) -> &A {
        &*self.adapter
    }

    /// Process a single read outcome, returning `None` if it is filtered out
    fn process_outcome(&self, outcome: ReadOutcome) -> Option<Reception> {
        match outcome {
            ReadOutcome::Frame(raw) => {
                if !self.config.should_report_frame(&raw) {
                    log::trace!("Filtered frame ID 0x{:X}", raw.display_id());
                    return None;
                }
                if !id_fits_domain(raw.id, raw.is_extended()) {
                    log::debug!("Frame ID 0x{:X} has bits outside its addressing domain", raw.id);
                }

                let decoded = FrameDecoder::decode(&raw);
                if decoded.data_truncated {
                    log::warn!(
                        "Frame ID 0x{} announced {} bytes but only {} were received",
                        decoded.id_text,
                        decoded.length,
                        raw.payload.len()
                    );
                }
                log::debug!("Received {} ID 0x{}", decoded.frame_type, decoded.id_text);
                Some(Reception::Frame(decoded))
            }
            ReadOutcome::Empty => {
                log::trace!("Receive queue empty on channel {}", self.adapter.handle());
                self.config.report_empty.then_some(Reception::Empty)
            }
            // Some adapters signal an empty queue through the status code
            ReadOutcome::Error { status } if status.is_queue_empty() => {
                self.config.report_empty.then_some(Reception::Empty)
            }
            ReadOutcome::Error { status } => {
                log::warn!("Channel {} reported status 0x{}", self.adapter.handle(), status);
                Some(Reception::Status(status))
            }
        }
    }
}

impl<'a, A: ChannelAdapter + ?Sized> Iterator for ReceiveStream<'a, A> {
    type Item = Reception;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let outcome = self.adapter.read()?;
            if let Some(reception) = self.process_outcome(outcome) {
                return Some(reception);
            }
        }
    }
}
