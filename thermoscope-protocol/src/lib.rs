//! Pool Heater Pump Wire Protocol
//!
//! This crate defines the serial protocol spoken by the pool-heater pump
//! controller, as observed on its half-duplex service bus. The protocol is
//! receive-only from our side: the pump broadcasts periodic bursts and never
//! expects an answer.
//!
//! # Protocol Overview
//!
//! The bus carries 9600 baud 8N1 traffic with no start or end markers.
//! Frames are bounded heuristically by read-burst grouping; a burst whose
//! length falls in the telemetry window is a telemetry frame:
//!
//! ```text
//! ┌──────────────────────────┬──────────┬──────────────────────┐
//! │ SENSOR BYTES             │ RESERVED │ PADDING / TRAILER    │
//! │ [0..=4] + [6]            │ [5]      │ [7..]                │
//! └──────────────────────────┴──────────┴──────────────────────┘
//!   total length 49-51 bytes
//! ```
//!
//! Sensor bytes are transmitted one's-complemented ("bit-inversion
//! encoding"): decoding subtracts the raw byte from 0xFF before shifting
//! and masking out the field width.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod telemetry;
pub mod topics;

pub use frame::{classify, hex_dump, FrameClass, MAX_FRAME_LEN, TELEMETRY_LEN_MAX, TELEMETRY_LEN_MIN};
pub use telemetry::{DecodeError, TelemetryReading};
pub use topics::{Channel, STATUS_ONLINE, TOPIC_FRAME_TIMEOUT, TOPIC_STATUS};
