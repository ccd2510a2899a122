//! Link and sniffer configuration types.
//!
//! Constants here are external tuning values, not derived quantities: the
//! pump dictates the line parameters and the quiescence interval is tuned
//! to its frame cadence at that baud rate.

use crate::control::DEFAULT_FRAME_TIMEOUT_MS;

/// Number of data bits per serial frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    One,
    Two,
}

/// Serial parameters of the pump service bus
///
/// The bus is half-duplex and we only ever listen: `rts_low_while_listening`
/// keeps the request-to-send line driven low for the whole session so the
/// transceiver stays in receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Hold RTS low for the duration of listening
    pub rts_low_while_listening: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        // 9600 8N1, fixed by the pump controller
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            rts_low_while_listening: true,
        }
    }
}

/// Sniffer loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnifferConfig {
    /// Bounded wait for serial bytes before a read returns what it has.
    /// Runtime-adjustable over the control topic.
    pub frame_timeout_ms: u32,
    /// Idle time between accumulation passes after a non-empty burst.
    /// Tuned to the sender's frame cadence and baud rate; never derived.
    pub quiescence_ms: u32,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
            quiescence_ms: 100,
        }
    }
}
