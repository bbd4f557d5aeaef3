//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use outlet_config::ConfigError;
use outlet_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {reason}")]
    #[diagnostic(
        code(outlet::connection_failed),
        help(
            "Check that the backend is running.\n\
             Try a fixed address: outlet --host 127.0.0.1 --port 50051 devices"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Backend not found on the network: {reason}")]
    #[diagnostic(
        code(outlet::discovery_failed),
        help("Pass --host/--port, or set connection.mode = \"fixed\" in the settings file.")
    )]
    DiscoveryFailed { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(outlet::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(outlet::remote))]
    Remote { message: String },

    #[error("{message}")]
    #[diagnostic(code(outlet::invalid_state))]
    InvalidState { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(outlet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(outlet::config),
        help("Check the settings file (outlet settings path) and OUTLET_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::DiscoveryFailed { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionDown { .. } | CoreError::TransportFailure { .. } => {
                Self::ConnectionFailed {
                    reason: err.to_string(),
                }
            }
            CoreError::NotFound { service, reason } => Self::DiscoveryFailed {
                reason: format!("{service}: {reason}"),
            },
            CoreError::RemoteFailure { message, .. } => Self::Remote { message },
            CoreError::ChildListFailed { message, secondary } => Self::Remote {
                message: if secondary.is_empty() {
                    message
                } else {
                    format!("{message} ({secondary})")
                },
            },
            CoreError::InvalidState { message } => Self::InvalidState { message },
            CoreError::Config { message } => Self::Validation {
                field: "session".into(),
                reason: message,
            },
        }
    }
}
