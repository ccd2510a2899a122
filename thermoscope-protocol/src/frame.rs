//! Frame classification for the pump serial protocol.
//!
//! The protocol has no start/stop delimiters. A candidate frame is whatever
//! one read burst produced; classification is purely by length. This is a
//! heuristic, not a guarantee - two frames can occasionally merge into one
//! burst, or one frame can split across two. Such bursts fall outside the
//! telemetry window and are dropped.

/// Maximum candidate frame size in bytes (read burst capacity)
pub const MAX_FRAME_LEN: usize = 250;

/// Shortest burst accepted as a telemetry frame
pub const TELEMETRY_LEN_MIN: usize = 49;

/// Longest burst accepted as a telemetry frame
pub const TELEMETRY_LEN_MAX: usize = 51;

/// Classification of a candidate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameClass {
    /// Length outside the telemetry window: partial read, another frame
    /// type, or line noise. Dropped after diagnostic logging.
    NotTelemetry,
    /// Length within the telemetry window, eligible for field decoding
    Telemetry,
}

/// Classify a candidate frame by its length
///
/// Telemetry iff the length is in `[TELEMETRY_LEN_MIN, TELEMETRY_LEN_MAX]`
/// inclusive. Empty, truncated and oversized bursts are all `NotTelemetry`.
pub fn classify(frame: &[u8]) -> FrameClass {
    if (TELEMETRY_LEN_MIN..=TELEMETRY_LEN_MAX).contains(&frame.len()) {
        FrameClass::Telemetry
    } else {
        FrameClass::NotTelemetry
    }
}

/// Capacity of a [`hex_dump`] string: "XX " per byte
pub const HEX_DUMP_LEN: usize = 3 * MAX_FRAME_LEN;

/// Render a frame as space-separated uppercase hex for diagnostic logs
pub fn hex_dump(frame: &[u8]) -> heapless::String<HEX_DUMP_LEN> {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = heapless::String::new();
    for &byte in frame.iter().take(MAX_FRAME_LEN) {
        // Capacity covers MAX_FRAME_LEN bytes, pushes cannot fail
        let _ = out.push(DIGITS[(byte >> 4) as usize] as char);
        let _ = out.push(DIGITS[(byte & 0x0F) as usize] as char);
        let _ = out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_window_edges() {
        assert_eq!(classify(&[0u8; 48]), FrameClass::NotTelemetry);
        assert_eq!(classify(&[0u8; 49]), FrameClass::Telemetry);
        assert_eq!(classify(&[0u8; 50]), FrameClass::Telemetry);
        assert_eq!(classify(&[0u8; 51]), FrameClass::Telemetry);
        assert_eq!(classify(&[0u8; 52]), FrameClass::NotTelemetry);
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(&[]), FrameClass::NotTelemetry);
    }

    #[test]
    fn test_classify_oversized_burst() {
        assert_eq!(classify(&[0u8; MAX_FRAME_LEN]), FrameClass::NotTelemetry);
    }

    #[test]
    fn test_classify_ignores_content() {
        // Only length matters - bytes are opaque at this layer
        assert_eq!(classify(&[0xFFu8; 50]), FrameClass::Telemetry);
        assert_eq!(classify(&[0x00u8; 50]), FrameClass::Telemetry);
    }

    #[test]
    fn test_hex_dump() {
        let dump = hex_dump(&[0x1C, 0xDD, 0x03, 0xC9, 0xFF]);
        assert_eq!(dump.as_str(), "1C DD 03 C9 FF ");
    }

    #[test]
    fn test_hex_dump_empty() {
        assert_eq!(hex_dump(&[]).as_str(), "");
    }
}
