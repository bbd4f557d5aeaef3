// Transport seam between the session layer and the wire.
//
// `outlet-core` only ever talks to a `dyn RpcChannel`. The production
// implementation is `HttpChannel`; tests substitute in-memory channels.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::Stream;

use crate::error::Error;
use crate::wire::SignalMsg;

/// Boxed stream of inbound signal messages. Ends when the server closes
/// the subscription, or yields an error when the transport breaks.
pub type SignalStream = Pin<Box<dyn Stream<Item = Result<SignalMsg, Error>> + Send>>;

/// A `host:port` pair the backend is reachable at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// IPv6 literals are bracketed so the result is a valid URL authority.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// One open connection to the backend.
///
/// A channel is cheap to construct and never blocks at creation; failures
/// surface on first use. Once [`close`](Self::close) is called every pending
/// and future operation fails with [`Error::Closed`] and any open signal
/// stream ends.
#[async_trait]
pub trait RpcChannel: Send + Sync {
    /// The endpoint this channel was opened against.
    fn endpoint(&self) -> &Endpoint;

    /// Perform one request/response call.
    async fn unary(&self, rpc: &'static str, request: serde_json::Value) -> Result<serde_json::Value, Error>;

    /// Open the push subscription.
    async fn subscribe_to_signals(&self) -> Result<SignalStream, Error>;

    /// Tear the channel down. Idempotent.
    fn close(&self);
}

/// Builds a fresh channel for an endpoint. The session replaces its
/// channel on every connection attempt.
pub trait ChannelFactory: Send + Sync {
    fn open(&self, endpoint: &Endpoint) -> Result<Arc<dyn RpcChannel>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_display() {
        assert_eq!(Endpoint::new("127.0.0.1", 50051).to_string(), "127.0.0.1:50051");
        assert_eq!(Endpoint::new("fe80::1", 50051).to_string(), "[fe80::1]:50051");
        assert_eq!(Endpoint::new("[::1]", 7).to_string(), "[::1]:7");
    }
}
