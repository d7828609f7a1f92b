//! Error types for a hop discovery session.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    // Setup errors, raised before the first probe
    #[error("socket: {0}")]
    SocketCreation(#[source] io::Error),

    #[error("Failed to drop privileges: {0}")]
    PrivilegeDrop(#[source] io::Error),

    #[error("Lookup failed for {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("Lookup failed for {0}: no IPv4 address")]
    NoIpv4Address(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Per-hop errors, each one aborts the session
    #[error("setsockopt (TTL {hop}): {source}")]
    SetTtl {
        hop: u8,
        #[source]
        source: io::Error,
    },

    #[error("sendto (hop {hop}): {source}")]
    Send {
        hop: u8,
        #[source]
        source: io::Error,
    },

    #[error("recvfrom (hop {hop}): {source}")]
    Receive {
        hop: u8,
        #[source]
        source: io::Error,
    },
}

impl TraceError {
    /// True for failures that happen before any probe is sent.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::SocketCreation(_)
                | Self::PrivilegeDrop(_)
                | Self::Resolve { .. }
                | Self::NoIpv4Address(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Hop at which the session was aborted, if it got that far.
    pub fn hop(&self) -> Option<u8> {
        match self {
            Self::SetTtl { hop, .. } | Self::Send { hop, .. } | Self::Receive { hop, .. } => {
                Some(*hop)
            }
            _ => None,
        }
    }
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Whether a receive error only means "nothing arrived in time".
pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors() {
        let err = TraceError::SocketCreation(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.is_setup());
        assert_eq!(err.hop(), None);

        assert!(TraceError::NoIpv4Address("example.invalid".into()).is_setup());
    }

    #[test]
    fn test_per_hop_errors() {
        let err = TraceError::Send {
            hop: 7,
            source: io::Error::from(io::ErrorKind::NetworkUnreachable),
        };
        assert!(!err.is_setup());
        assert_eq!(err.hop(), Some(7));
        assert!(err.to_string().starts_with("sendto (hop 7)"));
    }

    #[test]
    fn test_timeout_kinds() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        // EINTR from a signal while waiting
        assert!(is_timeout(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::ConnectionRefused)));
    }
}
