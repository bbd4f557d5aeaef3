use thiserror::Error;

/// Top-level error type for the `outlet-api` crate.
///
/// Covers every failure mode of the wire layer: HTTP transport, server
/// status replies, the signal WebSocket and payload decoding.
/// `outlet-core` maps these into its session-level taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The channel was closed locally while the call was pending.
    #[error("Channel closed")]
    Closed,

    // ── Server status ───────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("RPC status {code}: {message}")]
    Status { code: u16, message: String },

    // ── Signal stream ───────────────────────────────────────────────
    /// WebSocket connect or read failure on the signal subscription.
    #[error("Signal stream failed: {0}")]
    SignalStream(String),

    /// One frame on the signal stream could not be decoded. The stream
    /// itself is still healthy. `sig_int` is set when the frame at least
    /// carried a readable signal number.
    #[error("Undecodable signal frame: {message}")]
    SignalDecode { sig_int: Option<u32>, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Discovery ───────────────────────────────────────────────────
    /// The mDNS daemon could not be started or browsing failed.
    #[error("Service discovery failed: {0}")]
    Discovery(String),
}

impl Error {
    /// Returns `true` when the failure means the server could not be
    /// reached at all, as opposed to the server rejecting the call.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Closed | Self::SignalStream(_) => true,
            _ => false,
        }
    }

    /// The server-provided message for a status reply, if any.
    pub fn status_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_not_a_connection_failure() {
        let err = Error::Status {
            code: 500,
            message: "boom".into(),
        };
        assert!(!err.is_connection_failure());
        assert_eq!(err.status_message(), Some("boom"));
    }

    #[test]
    fn closed_channel_counts_as_connection_failure() {
        assert!(Error::Closed.is_connection_failure());
        assert!(Error::SignalStream("reset".into()).is_connection_failure());
        assert_eq!(Error::Closed.status_message(), None);
    }

    #[test]
    fn undecodable_frame_is_not_a_connection_failure() {
        let err = Error::SignalDecode {
            sig_int: Some(30),
            message: "unknown variant".into(),
        };
        assert!(!err.is_connection_failure());
    }
}
