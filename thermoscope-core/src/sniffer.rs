//! The sniffer service pass.
//!
//! One pass drains a burst from the byte source, classifies it against the
//! telemetry length window, decodes the sensor fields and pushes them to the
//! publisher. All protocol-layer failures are handled here and reported in
//! the outcome; nothing in a pass can halt the caller's loop.

use thermoscope_protocol::{classify, DecodeError, FrameClass, TelemetryReading};

use crate::accumulator::FrameAccumulator;
use crate::traits::{ByteSource, TelemetryPublisher};

/// Result of one service pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SniffOutcome {
    /// The line stayed quiet for the whole wait
    Quiet,
    /// Burst length outside the telemetry window; frame dropped
    Discarded { len: usize },
    /// Telemetry decoded and pushed out; failed channels are counted and
    /// the reading is dropped regardless (no retry queue)
    Published {
        reading: TelemetryReading,
        publish_failures: u8,
    },
    /// Decode refused a frame that passed classification - a contract bug,
    /// surfaced so it is never silently swallowed
    DecodeFault(DecodeError),
}

/// Running pass counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SniffStats {
    /// Non-empty bursts seen
    pub frames: u32,
    /// Readings decoded and handed to the publisher
    pub published: u32,
    /// Bursts dropped for length
    pub discarded: u32,
    /// Individual channel publishes that failed
    pub publish_failures: u32,
}

/// Drives accumulate -> classify -> decode -> publish
pub struct Sniffer {
    accumulator: FrameAccumulator,
    stats: SniffStats,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    /// Create an idle sniffer
    pub const fn new() -> Self {
        Self {
            accumulator: FrameAccumulator::new(),
            stats: SniffStats {
                frames: 0,
                published: 0,
                discarded: 0,
                publish_failures: 0,
            },
        }
    }

    /// Run one accumulation + decode + publish pass
    ///
    /// Only a hard source error propagates; everything else is folded into
    /// the outcome. After a non-empty pass the caller should wait the
    /// quiescence interval before the next one.
    pub fn service<S, P>(&mut self, source: &mut S, publisher: &mut P) -> Result<SniffOutcome, S::Error>
    where
        S: ByteSource,
        P: TelemetryPublisher,
    {
        let frame = self.accumulator.pull(source)?;
        if frame.is_empty() {
            return Ok(SniffOutcome::Quiet);
        }

        self.stats.frames += 1;

        match classify(frame) {
            FrameClass::NotTelemetry => {
                self.stats.discarded += 1;
                Ok(SniffOutcome::Discarded { len: frame.len() })
            }
            FrameClass::Telemetry => match TelemetryReading::decode(frame) {
                Ok(reading) => {
                    let mut publish_failures = 0u8;
                    for (channel, value) in reading.values() {
                        if publisher.publish(channel.topic(), value).is_err() {
                            publish_failures += 1;
                        }
                    }
                    self.stats.published += 1;
                    self.stats.publish_failures += publish_failures as u32;
                    Ok(SniffOutcome::Published {
                        reading,
                        publish_failures,
                    })
                }
                Err(e) => Ok(SniffOutcome::DecodeFault(e)),
            },
        }
    }

    /// Counters accumulated since construction
    pub fn stats(&self) -> SniffStats {
        self.stats
    }
}
