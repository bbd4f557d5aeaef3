// ── Core error types ──
//
// Session-level errors from outlet-core. Callers never see raw HTTP
// statuses or socket errors; `CoreError::from_call` folds a transport
// failure into the variant that matches what happened to the call.

use thiserror::Error;

/// Prefix the backend's RPC layer prepends to application exceptions.
const REMOTE_EXCEPTION_PREFIX: &str = "Exception calling application: ";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    /// The link was down so the call was never attempted.
    #[error("Not connected to backend; `{rpc}` was not sent")]
    ConnectionDown { rpc: String },

    /// The call was attempted but the network failed underneath it.
    #[error("`{rpc}` failed: {reason}")]
    TransportFailure { rpc: String, reason: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Backend rejected `{rpc}`: {message}")]
    RemoteFailure { rpc: String, message: String },

    #[error("{message}")]
    ChildListFailed { message: String, secondary: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("Could not find service {service}: {reason}")]
    NotFound { service: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Returns `true` for failures caused by the link rather than the call.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::ConnectionDown { .. } | Self::TransportFailure { .. }
        )
    }

    /// Classify a failed unary call.
    pub fn from_call(rpc: &str, err: outlet_api::Error) -> Self {
        if err.is_connection_failure() {
            return Self::TransportFailure {
                rpc: rpc.to_owned(),
                reason: format!("connection refused ({err})"),
            };
        }
        match err {
            outlet_api::Error::Status { message, .. } => Self::RemoteFailure {
                rpc: rpc.to_owned(),
                message: strip_remote_prefix(&message).to_owned(),
            },
            outlet_api::Error::Deserialization { message, .. } => Self::InvalidState {
                message: format!("malformed `{rpc}` response: {message}"),
            },
            other => Self::RemoteFailure {
                rpc: rpc.to_owned(),
                message: other.to_string(),
            },
        }
    }
}

/// Drop the backend's exception boilerplate so the message reads cleanly.
pub fn strip_remote_prefix(message: &str) -> &str {
    message
        .strip_prefix(REMOTE_EXCEPTION_PREFIX)
        .unwrap_or(message)
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidState {
            message: format!("wire encoding failed: {err}"),
        }
    }
}
