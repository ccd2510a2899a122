//! Telemetry publisher abstraction

/// Errors that can occur when publishing a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishError {
    /// No bus session at publish time
    NotConnected,
    /// The bus rejected the message
    Rejected,
}

/// Outbound message-bus client
///
/// `publish` must be non-blocking or bounded-blocking: a failure is returned
/// to the caller, logged, and the reading dropped. The sniffer never queues
/// or retries telemetry - freshness is favored over completeness.
pub trait TelemetryPublisher {
    /// Publish one decoded value as plain text on a named channel
    fn publish(&mut self, topic: &str, value: u8) -> Result<(), PublishError>;
}
