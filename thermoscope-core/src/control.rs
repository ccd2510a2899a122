//! Inbound control-message parsing.
//!
//! The bus carries one command topic: a plain-text integer that becomes the
//! new serial read timeout. Parsing must never take the control loop down,
//! whatever a client publishes.

/// Default serial read timeout in milliseconds
pub const DEFAULT_FRAME_TIMEOUT_MS: u32 = 50;

/// Parse a frame-timeout command payload
///
/// Accepts an ASCII decimal integer with optional surrounding whitespace.
/// Anything else - empty payloads, non-digits, values that overflow u32 -
/// falls back to [`DEFAULT_FRAME_TIMEOUT_MS`]. The fallback is deliberate:
/// the firmware this replaces coerced bad input to a 0 ms timeout, which
/// turns the read loop into a busy poll; reverting to the default keeps the
/// device serviceable after a bad publish.
pub fn parse_frame_timeout(payload: &[u8]) -> u32 {
    let text = match core::str::from_utf8(payload) {
        Ok(text) => text.trim(),
        Err(_) => return DEFAULT_FRAME_TIMEOUT_MS,
    };

    text.parse().unwrap_or(DEFAULT_FRAME_TIMEOUT_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ByteSource;

    /// Source that only remembers the last timeout it was given
    struct TimeoutRecorder {
        timeout_ms: u32,
    }

    impl ByteSource for TimeoutRecorder {
        type Error = core::convert::Infallible;

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Ok(0)
        }

        fn set_timeout_ms(&mut self, timeout_ms: u32) {
            self.timeout_ms = timeout_ms;
        }
    }

    #[test]
    fn test_parsed_timeout_reaches_the_source() {
        let mut source = TimeoutRecorder {
            timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
        };

        source.set_timeout_ms(parse_frame_timeout(b"5000"));
        assert_eq!(source.timeout_ms, 5000);

        source.set_timeout_ms(parse_frame_timeout(b"abc"));
        assert_eq!(source.timeout_ms, DEFAULT_FRAME_TIMEOUT_MS);
    }

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(parse_frame_timeout(b"5000"), 5000);
        assert_eq!(parse_frame_timeout(b"50"), 50);
        assert_eq!(parse_frame_timeout(b"0"), 0);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_frame_timeout(b" 250 "), 250);
        assert_eq!(parse_frame_timeout(b"100\n"), 100);
    }

    #[test]
    fn test_parse_falls_back_on_garbage() {
        assert_eq!(parse_frame_timeout(b"abc"), DEFAULT_FRAME_TIMEOUT_MS);
        assert_eq!(parse_frame_timeout(b""), DEFAULT_FRAME_TIMEOUT_MS);
        assert_eq!(parse_frame_timeout(b"50ms"), DEFAULT_FRAME_TIMEOUT_MS);
        assert_eq!(parse_frame_timeout(b"-1"), DEFAULT_FRAME_TIMEOUT_MS);
        assert_eq!(parse_frame_timeout(&[0xFF, 0xFE]), DEFAULT_FRAME_TIMEOUT_MS);
    }

    #[test]
    fn test_parse_falls_back_on_overflow() {
        assert_eq!(
            parse_frame_timeout(b"99999999999999999999"),
            DEFAULT_FRAME_TIMEOUT_MS
        );
    }
}
