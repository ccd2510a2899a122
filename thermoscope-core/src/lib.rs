//! Board-agnostic core logic for the Thermoscope sniffer
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or network implementations:
//!
//! - Collaborator traits (byte source, telemetry publisher)
//! - Frame accumulation (burst grouping without delimiters)
//! - The accumulate/classify/decode/publish service pass
//! - Control-message parsing (runtime read-timeout adjustment)
//! - Link and sniffer configuration types
//! - Firmware-update event definitions

#![no_std]
#![deny(unsafe_code)]

pub mod accumulator;
pub mod config;
pub mod control;
pub mod events;
pub mod sniffer;
pub mod traits;
