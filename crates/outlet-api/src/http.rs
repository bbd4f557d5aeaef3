// HTTP + WebSocket implementation of `RpcChannel`.
//
// Unary calls are JSON POSTs to `/outlet/v1/{rpc}`; the signal push stream
// is a WebSocket at `/outlet/v1/subscribe_to_signals`. Each channel owns a
// cancellation token so `close()` aborts in-flight calls and ends the stream.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::channel::{ChannelFactory, Endpoint, RpcChannel, SignalStream};
use crate::error::Error;
use crate::signal_stream;
use crate::wire::{RpcStatus, rpc};

const API_PREFIX: &str = "outlet/v1";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(20),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("outlet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}

// ── HttpChannel ─────────────────────────────────────────────────────

/// A channel to one backend endpoint.
pub struct HttpChannel {
    http: reqwest::Client,
    endpoint: Endpoint,
    base_url: Url,
    ws_url: Url,
    cancel: CancellationToken,
}

impl HttpChannel {
    /// Create a channel using a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Endpoint) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{endpoint}/{API_PREFIX}/"))?;
        let ws_url = Url::parse(&format!(
            "ws://{endpoint}/{API_PREFIX}/{}",
            rpc::SUBSCRIBE_TO_SIGNALS
        ))?;
        Ok(Self {
            http,
            endpoint,
            base_url,
            ws_url,
            cancel: CancellationToken::new(),
        })
    }

    /// URL for a unary method.
    pub fn rpc_url(&self, rpc: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(rpc)?)
    }

    async fn post(&self, rpc: &'static str, request: serde_json::Value) -> Result<serde_json::Value, Error> {
        let url = self.rpc_url(rpc)?;
        debug!(%url, "POST");

        let resp = self.http.post(url).json(&request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(rpc, status = status.as_u16(), len = body.len(), "response received");

        if !status.is_success() {
            return Err(parse_status(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Turn a non-success reply into `Error::Status`, tolerating bodies that
/// are not the JSON status envelope.
fn parse_status(status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<RpcStatus>(body) {
        Ok(parsed) if !parsed.message.is_empty() => Error::Status {
            code: status.as_u16(),
            message: parsed.message,
        },
        _ => {
            let text = body.trim();
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_owned()
            } else {
                text.to_owned()
            };
            Error::Status {
                code: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl RpcChannel for HttpChannel {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn unary(&self, rpc: &'static str, request: serde_json::Value) -> Result<serde_json::Value, Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Closed);
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Closed),
            result = self.post(rpc, request) => result,
        }
    }

    async fn subscribe_to_signals(&self) -> Result<SignalStream, Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Closed);
        }
        signal_stream::subscribe(self.ws_url.clone(), self.cancel.child_token()).await
    }

    fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!(endpoint = %self.endpoint, "closing channel");
            self.cancel.cancel();
        }
    }
}

// ── HttpChannelFactory ──────────────────────────────────────────────

/// Produces [`HttpChannel`]s that share one connection pool.
pub struct HttpChannelFactory {
    http: reqwest::Client,
}

impl HttpChannelFactory {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }
}

impl ChannelFactory for HttpChannelFactory {
    fn open(&self, endpoint: &Endpoint) -> Result<Arc<dyn RpcChannel>, Error> {
        let channel = HttpChannel::with_client(self.http.clone(), endpoint.clone())?;
        Ok(Arc::new(channel))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rpc_url_is_prefixed() {
        let channel =
            HttpChannel::with_client(reqwest::Client::new(), Endpoint::new("localhost", 50051))
                .unwrap();
        assert_eq!(
            channel.rpc_url("get_config").unwrap().as_str(),
            "http://localhost:50051/outlet/v1/get_config"
        );
        assert_eq!(
            channel.ws_url.as_str(),
            "ws://localhost:50051/outlet/v1/subscribe_to_signals"
        );
    }

    #[test]
    fn ipv6_host_builds_valid_urls() {
        let channel =
            HttpChannel::with_client(reqwest::Client::new(), Endpoint::new("fe80::1", 50051))
                .unwrap();
        assert_eq!(
            channel.rpc_url("get_config").unwrap().as_str(),
            "http://[fe80::1]:50051/outlet/v1/get_config"
        );
        assert_eq!(
            channel.ws_url.as_str(),
            "ws://[fe80::1]:50051/outlet/v1/subscribe_to_signals"
        );
    }

    #[test]
    fn status_body_falls_back_to_plain_text() {
        let err = parse_status(reqwest::StatusCode::BAD_GATEWAY, "upstream gone");
        assert!(matches!(err, Error::Status { code: 502, ref message } if message == "upstream gone"));

        let err = parse_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(
            matches!(err, Error::Status { code: 500, ref message } if message == "Internal Server Error")
        );
    }

    #[tokio::test]
    async fn closed_channel_rejects_calls() {
        let channel =
            HttpChannel::with_client(reqwest::Client::new(), Endpoint::new("localhost", 1)).unwrap();
        channel.close();
        let result = channel.unary(rpc::GET_NEXT_UID, serde_json::json!({})).await;
        assert!(matches!(result, Err(Error::Closed)));
        assert!(matches!(channel.subscribe_to_signals().await, Err(Error::Closed)));
    }
}
