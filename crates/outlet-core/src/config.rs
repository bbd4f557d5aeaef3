// ── Runtime session configuration ──
//
// These types describe *how* to reach the backend. They never touch disk;
// the CLI builds a `SessionConfig` (usually via `outlet-config`) and hands
// it to `Session::new`.

use std::time::Duration;

use outlet_api::TransportConfig;
use outlet_api::discovery::{DEFAULT_SERVICE_DOMAIN, DEFAULT_SERVICE_TYPE};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 50051;
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Sender id used for signals this client originates locally.
pub const ID_BACKEND_CLIENT: &str = "backend-client";

/// Tree id of the GDrive folder picker.
pub const ID_GDRIVE_DIR_SELECT: &str = "gdrive_dir_select";

/// How the backend endpoint is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointMode {
    /// Always connect to this address.
    Fixed { host: String, port: u16 },
    /// Browse the local network for the service over mDNS.
    Network { service_type: String, domain: String },
}

impl Default for EndpointMode {
    fn default() -> Self {
        Self::Network {
            service_type: DEFAULT_SERVICE_TYPE.into(),
            domain: DEFAULT_SERVICE_DOMAIN.into(),
        }
    }
}

/// Configuration for one client session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: EndpointMode,
    /// Upper bound on one discovery attempt.
    pub discovery_timeout: Duration,
    /// Pause between connection attempts.
    pub retry_interval: Duration,
    pub transport: TransportConfig,
    /// Capacity of the signal broadcast buffer per subscriber.
    pub signal_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointMode::default(),
            discovery_timeout: Duration::from_secs(10),
            retry_interval: Duration::from_secs(3),
            transport: TransportConfig::default(),
            signal_buffer: 256,
        }
    }
}

impl SessionConfig {
    /// Convenience for a fixed `host:port` with default timings.
    pub fn fixed(host: impl Into<String>, port: u16) -> Self {
        Self {
            endpoint: EndpointMode::Fixed {
                host: host.into(),
                port,
            },
            ..Self::default()
        }
    }
}
