//! Signal push stream over WebSocket.
//!
//! Connects to the backend's `subscribe_to_signals` endpoint and yields one
//! [`SignalMsg`] per text frame. Unlike a reconnecting event feed, this
//! stream is single-shot: it ends on a close frame, on end of stream, or
//! when the owning channel's token is cancelled. Reconnection policy lives
//! in `outlet-core`'s connection manager.
//!
//! A frame that fails to parse as a `SignalMsg` is yielded as
//! [`Error::SignalDecode`] and the subscription stays open, so the session
//! can report it.

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::channel::SignalStream;
use crate::error::Error;
use crate::wire::SignalMsg;

/// Open the WebSocket and return the inbound message stream.
///
/// The handshake happens before this returns, so an unreachable server is
/// reported here rather than as the first stream item.
pub async fn subscribe(url: Url, cancel: CancellationToken) -> Result<SignalStream, Error> {
    tracing::info!(url = %url, "Subscribing to signals");

    let uri: tungstenite::http::Uri = url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::SignalStream(e.to_string()))?;

    let connect = tokio_tungstenite::connect_async(ClientRequestBuilder::new(uri));
    let (ws_stream, _response) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Closed),
        result = connect => result.map_err(|e| Error::SignalStream(e.to_string()))?,
    };

    tracing::info!("Signal subscription established");

    let (_write, mut read) = ws_stream.split();

    let stream = async_stream::stream! {
        loop {
            let frame = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("Signal stream cancelled");
                    None
                }
                frame = read.next() => Some(frame),
            };
            let Some(frame) = frame else { break };

            match frame {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    yield decode_signal_frame(&text);
                }
                Some(Ok(tungstenite::Message::Ping(_))) => {
                    // tungstenite answers pings on the next read
                    tracing::trace!("Signal stream ping");
                }
                Some(Ok(tungstenite::Message::Close(frame))) => {
                    if let Some(ref cf) = frame {
                        tracing::info!(
                            code = %cf.code,
                            reason = %cf.reason,
                            "Server closed signal subscription"
                        );
                    } else {
                        tracing::info!("Server closed signal subscription");
                    }
                    break;
                }
                Some(Err(e)) => {
                    yield Err(Error::SignalStream(e.to_string()));
                    break;
                }
                None => {
                    tracing::info!("Signal stream ended");
                    break;
                }
                _ => {
                    // Binary, Pong, Frame -- ignore
                }
            }
        }
    };

    Ok(Box::pin(stream))
}

/// Decode one text frame.
///
/// On failure the error keeps the frame's `sig_int` when the frame is at
/// least a JSON object with a numeric `sig_int`.
pub fn decode_signal_frame(text: &str) -> Result<SignalMsg, Error> {
    serde_json::from_str::<SignalMsg>(text).map_err(|e| {
        let sig_int = serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|v| v.get("sig_int")?.as_u64())
            .and_then(|n| u32::try_from(n).ok());
        tracing::warn!(?sig_int, error = %e, "Undecodable signal frame");
        Error::SignalDecode {
            sig_int,
            message: e.to_string(),
        }
    })
}

// ── Tests ────────────────────────────────────────────────────────────
