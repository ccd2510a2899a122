//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication; the two
//! scalar settings are plain single-word atomics, which is all the
//! concurrency model needs.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU32};

use thermoscope_core::control::DEFAULT_FRAME_TIMEOUT_MS;
use thermoscope_core::events::UpdateEvent;
use thermoscope_protocol::TelemetryReading;

/// Channel capacity for firmware-update events
const UPDATE_CHANNEL_SIZE: usize = 8;

/// Latest decoded reading awaiting publication
///
/// A signal, not a queue: if the bus is slower than the pump, newer
/// readings overwrite older ones. Freshness over completeness.
pub static READING: Signal<CriticalSectionRawMutex, TelemetryReading> = Signal::new();

/// Firmware-update progress events for the controller
pub static UPDATE_EVENTS: Channel<CriticalSectionRawMutex, UpdateEvent, UPDATE_CHANNEL_SIZE> =
    Channel::new();

/// Serial read timeout in milliseconds (written by the MQTT control
/// handler, read at the start of every serial wait)
pub static FRAME_TIMEOUT_MS: AtomicU32 = AtomicU32::new(DEFAULT_FRAME_TIMEOUT_MS);

/// Whether the sniff task should touch the line (cleared while a firmware
/// image is being received)
pub static SNIFF_ENABLED: AtomicBool = AtomicBool::new(true);
