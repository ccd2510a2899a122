//! Collaborator traits
//!
//! Seams between the sniffer core and its environment: the serial byte
//! source it listens on and the message bus it publishes to. Implementations
//! live with the hardware (firmware crate) or in test harnesses.

pub mod publisher;
pub mod source;

pub use publisher::{PublishError, TelemetryPublisher};
pub use source::ByteSource;
