//! Telemetry field extraction from a classified frame.
//!
//! The pump transmits each sensor byte one's-complemented. Decoding
//! subtracts the byte from 0xFF, then shifts and masks down to the field
//! width: 6 bits for the temperatures, 1 bit for the active flag. Values
//! are raw sensor-scale integers; any engineering-unit conversion happens
//! downstream of this crate.

use crate::frame::{classify, FrameClass};

/// Mask for the 6-bit temperature fields
const TEMP_MASK: u8 = 0b11_1111;

/// Errors that can occur during telemetry decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame length outside the telemetry window. `decode` is only defined
    /// for frames that classify as telemetry; hitting this means the
    /// classify/decode contract was bypassed.
    NotTelemetry { len: usize },
}

/// One decoded telemetry frame from the pump
///
/// Temperatures are 6-bit raw sensor values (0-63). Derived entirely from
/// the frame that produced it; consumed by publication and then dropped,
/// no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryReading {
    /// Water temperature at the heat exchanger inlet
    pub water_in_temp: u8,
    /// Ambient air temperature at the evaporator
    pub air_ambient_temp: u8,
    /// Evaporator coil temperature
    pub coil_temp: u8,
    /// Compressor gas exhaust temperature
    pub gas_exhaust_temp: u8,
    /// Water temperature at the heat exchanger outlet
    pub water_out_temp: u8,
    /// Compressor running flag
    pub active: bool,
}

/// Undo the wire encoding of a sensor byte
fn inverted(byte: u8) -> u8 {
    0xFF - byte
}

impl TelemetryReading {
    /// Decode a telemetry frame into sensor fields
    ///
    /// Precondition: `classify(frame)` returned [`FrameClass::Telemetry`].
    /// The length is re-checked defensively; a violation is a logic bug in
    /// the caller and is reported as an error rather than swallowed.
    ///
    /// Sensor fields live at byte offsets 0-4 and 6. Offset 5 is reserved
    /// by this protocol version; everything past offset 6 is padding the
    /// decoder ignores. Decoding never mutates the frame.
    pub fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        if classify(frame) != FrameClass::Telemetry {
            return Err(DecodeError::NotTelemetry { len: frame.len() });
        }

        Ok(Self {
            water_in_temp: (inverted(frame[0]) >> 3) & TEMP_MASK,
            air_ambient_temp: (inverted(frame[1]) >> 1) & TEMP_MASK,
            coil_temp: (inverted(frame[2]) >> 1) & TEMP_MASK,
            gas_exhaust_temp: (inverted(frame[3]) >> 1) & TEMP_MASK,
            water_out_temp: (inverted(frame[4]) >> 1) & TEMP_MASK,
            active: (inverted(frame[6]) >> 4) & 0x01 == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{TELEMETRY_LEN_MAX, TELEMETRY_LEN_MIN};

    /// Telemetry frame with the six sensor bytes set, rest zeroed
    fn frame_with(sensors: [u8; 7]) -> [u8; 50] {
        let mut frame = [0u8; 50];
        frame[..7].copy_from_slice(&sensors);
        frame
    }

    #[test]
    fn test_water_in_vectors() {
        // 3-bit shift field: 0x00 -> (0xFF >> 3) & 0x3F = 31
        let r = TelemetryReading::decode(&frame_with([0x00; 7])).unwrap();
        assert_eq!(r.water_in_temp, 31);

        let r = TelemetryReading::decode(&frame_with([0xFF, 0, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(r.water_in_temp, 0);

        // 0x80 -> (0x7F >> 3) & 0x3F = 15
        let r = TelemetryReading::decode(&frame_with([0x80, 0, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(r.water_in_temp, 15);
    }

    #[test]
    fn test_single_shift_temperature_vectors() {
        // 1-bit shift fields: 0x00 -> (0xFF >> 1) & 0x3F = 63
        let r = TelemetryReading::decode(&frame_with([0x00; 7])).unwrap();
        assert_eq!(r.air_ambient_temp, 63);
        assert_eq!(r.coil_temp, 63);
        assert_eq!(r.gas_exhaust_temp, 63);
        assert_eq!(r.water_out_temp, 63);

        // 0xFF -> 0
        let r = TelemetryReading::decode(&frame_with([0, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0])).unwrap();
        assert_eq!(r.air_ambient_temp, 0);
        assert_eq!(r.coil_temp, 0);
        assert_eq!(r.gas_exhaust_temp, 0);
        assert_eq!(r.water_out_temp, 0);

        // 0x01 -> (0xFE >> 1) & 0x3F = 63
        let r = TelemetryReading::decode(&frame_with([0, 0x01, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(r.air_ambient_temp, 63);
    }

    #[test]
    fn test_active_flag_vectors() {
        // 0x00 -> (0xFF >> 4) & 0x01 = 1
        let r = TelemetryReading::decode(&frame_with([0x00; 7])).unwrap();
        assert!(r.active);

        // 0xFF -> 0
        let r = TelemetryReading::decode(&frame_with([0, 0, 0, 0, 0, 0, 0xFF])).unwrap();
        assert!(!r.active);

        // 0xF0 -> (0x0F >> 4) & 0x01 = 0
        let r = TelemetryReading::decode(&frame_with([0, 0, 0, 0, 0, 0, 0xF0])).unwrap();
        assert!(!r.active);
    }

    #[test]
    fn test_temperatures_stay_in_range() {
        for b in 0..=255u8 {
            let r = TelemetryReading::decode(&frame_with([b, b, b, b, b, b, b])).unwrap();
            assert!(r.water_in_temp <= 63);
            assert!(r.air_ambient_temp <= 63);
            assert!(r.coil_temp <= 63);
            assert!(r.gas_exhaust_temp <= 63);
            assert!(r.water_out_temp <= 63);
        }
    }

    #[test]
    fn test_decode_is_pure() {
        let frame = frame_with([0x1C, 0xDD, 0xDD, 0xD3, 0xC9, 0xFF, 0xFF]);
        let first = TelemetryReading::decode(&frame).unwrap();
        let second = TelemetryReading::decode(&frame).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserved_and_trailer_bytes_ignored() {
        let mut a = frame_with([1, 2, 3, 4, 5, 0x00, 7]);
        let mut b = frame_with([1, 2, 3, 4, 5, 0xFF, 7]);
        // Scribble over the trailer too
        a[7..].fill(0xAA);
        b[7..].fill(0x55);
        assert_eq!(
            TelemetryReading::decode(&a).unwrap(),
            TelemetryReading::decode(&b).unwrap()
        );
    }

    #[test]
    fn test_decode_rejects_out_of_window() {
        let err = TelemetryReading::decode(&[0u8; 10]).unwrap_err();
        assert_eq!(err, DecodeError::NotTelemetry { len: 10 });

        let err = TelemetryReading::decode(&[0u8; 52]).unwrap_err();
        assert_eq!(err, DecodeError::NotTelemetry { len: 52 });
    }

    #[test]
    fn test_decode_accepts_all_window_lengths() {
        for len in TELEMETRY_LEN_MIN..=TELEMETRY_LEN_MAX {
            let frame = [0u8; 51];
            assert!(TelemetryReading::decode(&frame[..len]).is_ok());
        }
    }
}
