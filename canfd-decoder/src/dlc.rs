//! CAN-FD Data Length Code expansion
//!
//! Classic CAN maps DLC 0-8 directly to a byte count. CAN-FD keeps that
//! identity and reuses codes 9-15 for the longer payload sizes.

/// Largest valid Data Length Code
pub const MAX_DLC: u8 = 15;

/// Largest CAN-FD payload in bytes
pub const MAX_FD_PAYLOAD: usize = 64;

/// Payload lengths for DLC 9 through 15
const FD_LENGTHS: [usize; 7] = [12, 16, 20, 24, 32, 48, 64];

/// Convert a Data Length Code into a payload length in bytes
///
/// Codes above 15 are not defined by the protocol and yield 0 so that a
/// corrupted frame never stops a running receive loop.
pub fn dlc_to_length(dlc: u8) -> usize {
    match dlc {
        0..=8 => dlc as usize,
        9..=MAX_DLC => FD_LENGTHS[(dlc - 9) as usize],
        _ => 0,
    }
}

/// True if `dlc` is inside the protocol range
pub fn is_valid_dlc(dlc: u8) -> bool {
    dlc <= MAX_DLC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_range_is_identity() {
        for dlc in 0..=8u8 {
            assert_eq!(dlc_to_length(dlc), dlc as usize);
        }
    }

    #[test]
    fn test_fd_range() {
        assert_eq!(dlc_to_length(9), 12);
        assert_eq!(dlc_to_length(10), 16);
        assert_eq!(dlc_to_length(11), 20);
        assert_eq!(dlc_to_length(12), 24);
        assert_eq!(dlc_to_length(13), 32);
        assert_eq!(dlc_to_length(14), 48);
        assert_eq!(dlc_to_length(15), MAX_FD_PAYLOAD);
    }

    #[test]
    fn test_out_of_range_degrades_to_zero() {
        assert_eq!(dlc_to_length(16), 0);
        assert_eq!(dlc_to_length(200), 0);
        assert_eq!(dlc_to_length(u8::MAX), 0);
        assert!(!is_valid_dlc(16));
        assert!(is_valid_dlc(0));
        assert!(is_valid_dlc(15));
    }
}
