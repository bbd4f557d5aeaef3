// ── Signal channel ──
//
// Both directions of traffic with the backend. Outbound unary calls are
// queued to a single processor task so at most one is ever in flight;
// inbound stream messages are decoded and fanned out by `SignalRelay`.

use std::sync::Arc;

use outlet_api::wire::SignalMsg;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::connection::Link;
use crate::convert::Codec;
use crate::error::CoreError;
use crate::model::{Signal, SignalEvent};
use crate::store::DeviceStore;

const CALL_CHANNEL_SIZE: usize = 64;

/// A queued unary call and where to send its result.
pub(crate) struct CallEnvelope {
    pub rpc: &'static str,
    pub body: serde_json::Value,
    pub response_tx: oneshot::Sender<Result<serde_json::Value, CoreError>>,
}

// ── Outbound ─────────────────────────────────────────────────────────

pub(crate) struct SignalChannel {
    link: Arc<Link>,
    call_tx: mpsc::Sender<CallEnvelope>,
    call_rx: Mutex<Option<mpsc::Receiver<CallEnvelope>>>,
}

impl SignalChannel {
    pub(crate) fn new(link: Arc<Link>) -> Self {
        let (call_tx, call_rx) = mpsc::channel(CALL_CHANNEL_SIZE);
        Self {
            link,
            call_tx,
            call_rx: Mutex::new(Some(call_rx)),
        }
    }

    /// Start the processor. Returns `None` if it was already started.
    pub(crate) async fn spawn_processor(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        let rx = self.call_rx.lock().await.take()?;
        Some(tokio::spawn(call_processor_task(
            Arc::clone(&self.link),
            rx,
            cancel,
        )))
    }

    /// Encode `request`, run it through the queue, decode the response.
    pub(crate) async fn call<Req, Resp>(&self, rpc: &'static str, request: &Req) -> Result<Resp, CoreError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        if !self.link.is_connected() {
            debug!(rpc, "not connected, refusing call");
            return Err(CoreError::ConnectionDown { rpc: rpc.into() });
        }

        let body = serde_json::to_value(request)?;
        let (tx, rx) = oneshot::channel();
        self.call_tx
            .send(CallEnvelope {
                rpc,
                body,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ConnectionDown { rpc: rpc.into() })?;

        let value = rx
            .await
            .map_err(|_| CoreError::ConnectionDown { rpc: rpc.into() })??;
        serde_json::from_value(value).map_err(|e| {
            CoreError::invalid_state(format!("malformed `{rpc}` response: {e}"))
        })
    }
}

async fn call_processor_task(
    link: Arc<Link>,
    mut rx: mpsc::Receiver<CallEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = perform_call(&link, envelope.rpc, envelope.body).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("call processor stopped");
}

async fn perform_call(
    link: &Link,
    rpc: &'static str,
    body: serde_json::Value,
) -> Result<serde_json::Value, CoreError> {
    let Some(channel) = link.current_channel().await else {
        return Err(CoreError::ConnectionDown { rpc: rpc.into() });
    };

    trace!(rpc, "sending request");
    match channel.unary(rpc, body).await {
        Ok(value) => Ok(value),
        Err(e) => {
            let err = CoreError::from_call(rpc, e);
            if matches!(err, CoreError::TransportFailure { .. }) {
                warn!(rpc, error = %err, "transport failure");
                link.mark_channel_failed(&channel).await;
            } else {
                debug!(rpc, error = %err, "call failed");
            }
            Err(err)
        }
    }
}

// ── Inbound ──────────────────────────────────────────────────────────

/// Decodes stream messages and publishes them to subscribers.
pub(crate) struct SignalRelay {
    codec: Arc<Codec>,
    store: Arc<DeviceStore>,
    link: Arc<Link>,
}

impl SignalRelay {
    pub(crate) fn new(codec: Arc<Codec>, store: Arc<DeviceStore>, link: Arc<Link>) -> Self {
        Self { codec, store, link }
    }

    /// Handle one inbound message. Decode failures become local
    /// `ERROR_OCCURRED` signals; nothing here stops the stream.
    pub(crate) fn relay(&self, msg: SignalMsg) {
        let Some(signal) = Signal::from_repr(msg.sig_int) else {
            error!(sig_int = msg.sig_int, "unknown signal number");
            self.link.publish_local(SignalEvent::error(
                "Internal Error",
                format!("Could not resolve Signal from int value: {}", msg.sig_int),
            ));
            return;
        };

        let envelope = match self.codec.signal_event_from_wire(signal, msg) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(%signal, error = %e, "could not decode signal");
                self.link.publish_local(SignalEvent::error(
                    format!("While relaying received signal {signal}"),
                    e.to_string(),
                ));
                return;
            }
        };

        if envelope.event == SignalEvent::Welcome {
            debug!(sender = %envelope.sender, "received WELCOME");
            return;
        }
        if let SignalEvent::DeviceUpserted { device } = &envelope.event {
            let is_new = self.store.upsert(device.clone());
            debug!(device_uid = device.device_uid, is_new, "device upserted");
        }
        self.link.publish(envelope);
    }

    /// Report a frame the wire layer could not decode at all.
    pub(crate) fn relay_undecodable(&self, sig_int: Option<u32>, reason: &str) {
        match sig_int.and_then(Signal::from_repr) {
            Some(signal) => {
                error!(%signal, reason, "could not decode signal frame");
                self.link.publish_local(SignalEvent::error(
                    format!("While relaying received signal {signal}"),
                    reason,
                ));
            }
            None => {
                error!(?sig_int, reason, "could not decode signal frame");
                self.link.publish_local(SignalEvent::error(
                    "Internal Error",
                    format!("Could not decode signal frame: {reason}"),
                ));
            }
        }
    }
}
