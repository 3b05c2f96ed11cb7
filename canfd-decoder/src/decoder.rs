//! Frame decoding engine
//!
//! Turns a [`RawFrame`] into a [`DecodedFrame`]: classifies the frame, masks
//! and formats the identifier, expands the DLC, converts the hardware
//! timestamp and renders the payload. Pure and stateless; safe to call from
//! any number of threads at once.

use crate::dlc::dlc_to_length;
use crate::types::{DecodedFrame, FrameType, RawFrame, EXTENDED_ID_MASK, STANDARD_ID_MASK};

/// Text rendered in place of the payload for remote frames
pub const REMOTE_REQUEST_TEXT: &str = "Remote Request";

/// Hardware ticks per second (timestamps are in microseconds)
const TICKS_PER_SECOND: u64 = 1_000_000;

/// Ticks per displayed tenth of a second
const TICKS_PER_TENTH: u64 = TICKS_PER_SECOND / 10;

/// Frame decoder - derives the reportable form of a raw frame
pub struct FrameDecoder;

impl FrameDecoder {
    /// Decode a raw frame
    ///
    /// Never fails. A DLC outside 0-15 decodes with length 0, and a payload
    /// buffer shorter than the DLC length is rendered as far as it goes with
    /// `data_truncated` set.
    ///
    /// # Example
    /// ```
    /// use canfd_decoder::{FrameDecoder, FrameFlags, RawFrame};
    ///
    /// let raw = RawFrame::new(0x1ABC, FrameFlags::empty(), 2, vec![0x0A, 0xFF], 1_500_000);
    /// let decoded = FrameDecoder::decode(&raw);
    /// assert_eq!(decoded.type_label(), "Standard Frame");
    /// assert_eq!(decoded.id_text, "ABC");
    /// assert_eq!(decoded.time_seconds, "1.5");
    /// assert_eq!(decoded.data_text, "0A FF");
    /// ```
    pub fn decode(raw: &RawFrame) -> DecodedFrame {
        let frame_type = Self::classify(raw);
        let length = dlc_to_length(raw.dlc);

        let (data_text, data_truncated) = if frame_type.is_remote() {
            (REMOTE_REQUEST_TEXT.to_string(), false)
        } else {
            let available = length.min(raw.payload.len());
            (Self::format_data(&raw.payload[..available]), available < length)
        };

        DecodedFrame {
            frame_type,
            id_text: Self::format_id(raw),
            length,
            time_seconds: Self::format_time(raw.timestamp_ticks),
            data_text,
            timestamp_ticks: raw.timestamp_ticks,
            is_fd: raw.is_fd(),
            bitrate_switch: raw.is_bitrate_switch(),
            error_state_indicator: raw.is_error_state(),
            data_truncated,
        }
    }

    /// Classify a frame by its extended and remote flags
    pub fn classify(raw: &RawFrame) -> FrameType {
        match (raw.is_extended(), raw.is_remote()) {
            (true, true) => FrameType::RemoteExtended,
            (true, false) => FrameType::Extended,
            (false, true) => FrameType::RemoteStandard,
            (false, false) => FrameType::Standard,
        }
    }

    /// Format the identifier as uppercase hex without padding
    ///
    /// Standard identifiers are always masked to 11 bits, whatever the adapter
    /// put in the upper bits.
    pub fn format_id(raw: &RawFrame) -> String {
        format!("{:X}", raw.display_id())
    }

    /// Convert microsecond ticks to seconds with one decimal place
    ///
    /// Rounds half up and works in integer arithmetic, so the text is the
    /// same on every platform: 999_999 -> "1.0", 50_000 -> "0.1".
    pub fn format_time(ticks: u64) -> String {
        let mut tenths = ticks / TICKS_PER_TENTH;
        if ticks % TICKS_PER_TENTH >= TICKS_PER_TENTH / 2 {
            tenths += 1;
        }
        format!("{}.{}", tenths / 10, tenths % 10)
    }

    /// Render bytes as two-digit uppercase hex separated by single spaces
    pub fn format_data(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decode a raw frame (shorthand for [`FrameDecoder::decode`])
pub fn decode(raw: &RawFrame) -> DecodedFrame {
    FrameDecoder::decode(raw)
}

/// True if `id` fits the addressing domain selected by `extended`
pub fn id_fits_domain(id: u32, extended: bool) -> bool {
    let mask = if extended { EXTENDED_ID_MASK } else { STANDARD_ID_MASK };
    id & !mask == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameFlags;

    fn frame(id: u32, flags: FrameFlags, dlc: u8, payload: &[u8]) -> RawFrame {
        RawFrame::new(id, flags, dlc, payload.to_vec(), 0)
    }

    #[test]
    fn test_classification_precedence() {
        let cases = [
            (FrameFlags::EXTENDED | FrameFlags::REMOTE_REQUEST, FrameType::RemoteExtended),
            (FrameFlags::EXTENDED, FrameType::Extended),
            (FrameFlags::REMOTE_REQUEST, FrameType::RemoteStandard),
            (FrameFlags::empty(), FrameType::Standard),
            (FrameFlags::FD | FrameFlags::BITRATE_SWITCH, FrameType::Standard),
        ];

        for (flags, expected) in cases {
            assert_eq!(FrameDecoder::classify(&frame(0x10, flags, 0, &[])), expected);
        }
    }

    #[test]
    fn test_standard_id_is_masked() {
        let raw = frame(0x1ABC, FrameFlags::empty(), 0, &[]);
        assert_eq!(FrameDecoder::format_id(&raw), "ABC");

        let raw = frame(0xFFFF_F800, FrameFlags::REMOTE_REQUEST, 0, &[]);
        assert_eq!(FrameDecoder::format_id(&raw), "0");
    }

    #[test]
    fn test_extended_id_is_full_value() {
        let raw = frame(0x1ABCDE, FrameFlags::EXTENDED, 0, &[]);
        assert_eq!(FrameDecoder::format_id(&raw), "1ABCDE");

        let raw = frame(0x1FFF_FFFF, FrameFlags::EXTENDED | FrameFlags::REMOTE_REQUEST, 0, &[]);
        assert_eq!(FrameDecoder::format_id(&raw), "1FFFFFFF");
    }

    #[test]
    fn test_time_rounding() {
        assert_eq!(FrameDecoder::format_time(0), "0.0");
        assert_eq!(FrameDecoder::format_time(1_500_000), "1.5");
        assert_eq!(FrameDecoder::format_time(999_999), "1.0");
        assert_eq!(FrameDecoder::format_time(49_999), "0.0");
        assert_eq!(FrameDecoder::format_time(50_000), "0.1");
        assert_eq!(FrameDecoder::format_time(2_345_678), "2.3");
        assert_eq!(FrameDecoder::format_time(3_600_000_000), "3600.0");
        assert_eq!(FrameDecoder::format_time(u64::MAX), "18446744073709.6");
    }

    #[test]
    fn test_data_rendering() {
        assert_eq!(FrameDecoder::format_data(&[0x0A, 0xFF, 0x01]), "0A FF 01");
        assert_eq!(FrameDecoder::format_data(&[]), "");
        assert_eq!(FrameDecoder::format_data(&[0x00]), "00");
    }

    #[test]
    fn test_payload_limited_by_dlc() {
        let decoded = decode(&frame(0x123, FrameFlags::empty(), 3, &[0x0A, 0xFF, 0x01, 0x55, 0x66]));
        assert_eq!(decoded.length, 3);
        assert_eq!(decoded.data_text, "0A FF 01");
        assert!(!decoded.data_truncated);
    }

    #[test]
    fn test_short_payload_is_truncated_not_overread() {
        let decoded = decode(&frame(0x123, FrameFlags::FD, 15, &[1, 2, 3, 4]));
        assert_eq!(decoded.length, 64);
        assert_eq!(decoded.data_text, "01 02 03 04");
        assert!(decoded.data_truncated);
    }

    #[test]
    fn test_remote_frame_ignores_payload() {
        let decoded = decode(&frame(0x7FF, FrameFlags::REMOTE_REQUEST, 8, &[0xDE, 0xAD]));
        assert_eq!(decoded.data_text, REMOTE_REQUEST_TEXT);
        assert_eq!(decoded.length, 8);
        assert!(!decoded.data_truncated);
    }

    #[test]
    fn test_invalid_dlc_degrades() {
        let decoded = decode(&frame(0x42, FrameFlags::empty(), 16, &[1, 2, 3]));
        assert_eq!(decoded.length, 0);
        assert_eq!(decoded.data_text, "");
        assert!(!decoded.data_truncated);
    }

    #[test]
    fn test_flag_passthrough() {
        let flags = FrameFlags::FD | FrameFlags::BITRATE_SWITCH | FrameFlags::ERROR_STATE_INDICATOR;
        let decoded = decode(&frame(0x1, flags, 0, &[]));
        assert!(decoded.is_fd);
        assert!(decoded.bitrate_switch);
        assert!(decoded.error_state_indicator);
    }

    #[test]
    fn test_id_fits_domain() {
        assert!(id_fits_domain(0x7FF, false));
        assert!(!id_fits_domain(0x800, false));
        assert!(id_fits_domain(0x1FFF_FFFF, true));
        assert!(!id_fits_domain(0x2000_0000, true));
    }
}
