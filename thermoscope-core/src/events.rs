//! Firmware-update events.
//!
//! The update listener reports its progress as a tagged event stream
//! consumed synchronously by the controller task, rather than as callbacks
//! closing over shared state.

/// Reasons a firmware update can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateError {
    /// Session authentication failed
    Auth,
    /// Update could not start (bad header, image too large)
    Begin,
    /// Peer connection failed or dropped
    Connect,
    /// Image data could not be received or stored
    Receive,
    /// Finalization failed (short image, flush error)
    End,
}

impl UpdateError {
    /// Human-readable label for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateError::Auth => "Auth Failed",
            UpdateError::Begin => "Begin Failed",
            UpdateError::Connect => "Connect Failed",
            UpdateError::Receive => "Receive Failed",
            UpdateError::End => "End Failed",
        }
    }
}

/// Progress of a firmware-update session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateEvent {
    /// A peer opened an update session
    Started,
    /// Image bytes received so far out of the announced total
    Progress { received: u32, total: u32 },
    /// Image fully received and staged
    Completed,
    /// Session aborted
    Failed(UpdateError),
}

impl UpdateEvent {
    /// Completion percentage for progress events, `None` otherwise
    pub fn percent(&self) -> Option<u32> {
        match self {
            UpdateEvent::Progress { received, total } if *total >= 100 => {
                Some(received / (total / 100))
            }
            UpdateEvent::Progress { .. } => Some(0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_math() {
        let halfway = UpdateEvent::Progress {
            received: 50_000,
            total: 100_000,
        };
        assert_eq!(halfway.percent(), Some(50));

        let done = UpdateEvent::Progress {
            received: 100_000,
            total: 100_000,
        };
        assert_eq!(done.percent(), Some(100));
    }

    #[test]
    fn test_percent_tiny_image() {
        // Totals under 100 bytes would divide by zero in the naive formula
        let event = UpdateEvent::Progress {
            received: 10,
            total: 64,
        };
        assert_eq!(event.percent(), Some(0));
    }

    #[test]
    fn test_percent_only_for_progress() {
        assert_eq!(UpdateEvent::Started.percent(), None);
        assert_eq!(UpdateEvent::Completed.percent(), None);
        assert_eq!(UpdateEvent::Failed(UpdateError::Receive).percent(), None);
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(UpdateError::Auth.as_str(), "Auth Failed");
        assert_eq!(UpdateError::Begin.as_str(), "Begin Failed");
        assert_eq!(UpdateError::Connect.as_str(), "Connect Failed");
        assert_eq!(UpdateError::Receive.as_str(), "Receive Failed");
        assert_eq!(UpdateError::End.as_str(), "End Failed");
    }
}
