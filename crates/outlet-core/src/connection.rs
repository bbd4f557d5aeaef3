// ── Connection management ──
//
// Background loop that keeps a signal stream open to the backend:
// discover → connect → stream → back off → discover again. The shared
// `Link` holds everything the loop and the call processor both touch:
// the observable `ConnectionState`, the current channel, and the signal
// fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use outlet_api::{ChannelFactory, Endpoint, RpcChannel};
use strum::Display;
use tokio::sync::{Mutex, broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::{ID_BACKEND_CLIENT, LOOPBACK_HOST};
use crate::discovery::ServiceLocator;
use crate::model::{SignalEnvelope, SignalEvent};
use crate::signal_channel::SignalRelay;

// ── ConnectionState ──────────────────────────────────────────────────

/// Where the connection loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Discovering,
    Connecting,
    Streaming,
    Degraded,
    Stopped,
}

/// Connection status observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    pub host: String,
    pub port: u16,
    pub is_connected: bool,
    /// Loop iterations since the stream last delivered anything.
    pub consecutive_stream_fail_count: u32,
    pub phase: Phase,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            is_connected: false,
            consecutive_stream_fail_count: 0,
            phase: Phase::Discovering,
        }
    }
}

// ── Link ─────────────────────────────────────────────────────────────

pub(crate) struct Link {
    state: watch::Sender<ConnectionState>,
    channel: Mutex<Option<Arc<dyn RpcChannel>>>,
    signals: broadcast::Sender<Arc<SignalEnvelope>>,
    /// Try `127.0.0.1` before the resolved host on the next connect.
    loopback_first: AtomicBool,
}

impl Link {
    pub(crate) fn new(signal_buffer: usize) -> Self {
        let (state, _) = watch::channel(ConnectionState::default());
        let (signals, _) = broadcast::channel(signal_buffer.max(1));
        Self {
            state,
            channel: Mutex::new(None),
            signals,
            loopback_first: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.state.borrow().is_connected
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub(crate) fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Arc<SignalEnvelope>> {
        self.signals.subscribe()
    }

    fn set_phase(&self, phase: Phase) {
        self.state.send_modify(|s| {
            if s.phase != Phase::Stopped {
                s.phase = phase;
            }
        });
    }

    // ── Signal fan-out ───────────────────────────────────────────────

    pub(crate) fn publish(&self, envelope: SignalEnvelope) {
        trace!(signal = %envelope.signal(), sender = %envelope.sender, "publishing signal");
        // No subscribers is fine.
        let _ = self.signals.send(Arc::new(envelope));
    }

    /// Publish a signal that originates in this client.
    pub(crate) fn publish_local(&self, event: SignalEvent) {
        self.publish(SignalEnvelope::new(ID_BACKEND_CLIENT, event));
    }

    // ── Channel handle ───────────────────────────────────────────────

    pub(crate) async fn current_channel(&self) -> Option<Arc<dyn RpcChannel>> {
        self.channel.lock().await.clone()
    }

    /// Swap in `next`, closing whatever was there before.
    pub(crate) async fn replace_channel(&self, next: Option<Arc<dyn RpcChannel>>) {
        let previous = std::mem::replace(&mut *self.channel.lock().await, next);
        if let Some(previous) = previous {
            debug!(endpoint = %previous.endpoint(), "closing previous channel");
            previous.close();
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// First sign of life after being down.
    pub(crate) fn mark_restored(&self) -> bool {
        let restored = self.state.send_if_modified(|s| {
            if s.is_connected {
                return false;
            }
            s.is_connected = true;
            s.consecutive_stream_fail_count = 0;
            true
        });
        if restored {
            self.loopback_first.store(false, Ordering::SeqCst);
            let s = self.state.borrow();
            info!(host = %s.host, port = s.port, "connection to backend restored");
        }
        restored
    }

    /// Idempotent: only the first call after a restore has any effect.
    pub(crate) async fn mark_down(&self) -> bool {
        self.take_down(None).await
    }

    /// `mark_down` on behalf of a call that failed on `failed`. A no-op when
    /// the loop has already swapped in a newer channel.
    pub(crate) async fn mark_channel_failed(&self, failed: &Arc<dyn RpcChannel>) -> bool {
        self.take_down(Some(failed)).await
    }

    async fn take_down(&self, failed: Option<&Arc<dyn RpcChannel>>) -> bool {
        let current = self.channel.lock().await;
        if let Some(failed) = failed {
            let still_current = current.as_ref().is_some_and(|c| Arc::ptr_eq(c, failed));
            if !still_current {
                debug!(endpoint = %failed.endpoint(), "ignoring failure on a replaced channel");
                return false;
            }
        }

        let went_down = self.state.send_if_modified(|s| {
            if !s.is_connected {
                return false;
            }
            s.is_connected = false;
            true
        });
        if !went_down {
            return false;
        }

        if let Some(channel) = current.as_ref() {
            channel.close();
        }
        drop(current);

        let (host, port) = {
            let s = self.state.borrow();
            (s.host.clone(), s.port)
        };
        warn!(%host, port, "connection to backend lost");
        self.publish_local(SignalEvent::error(
            "Lost connection to backend",
            format!("{host}:{port} stopped responding; reconnecting"),
        ));
        true
    }

    pub(crate) fn arm_loopback_first(&self) {
        self.loopback_first.store(true, Ordering::SeqCst);
    }

    pub(crate) fn loopback_first(&self) -> bool {
        self.loopback_first.load(Ordering::SeqCst)
    }
}

// ── ConnectionManager ────────────────────────────────────────────────

pub(crate) struct ConnectionManager {
    link: Arc<Link>,
    locator: ServiceLocator,
    factory: Arc<dyn ChannelFactory>,
    relay: SignalRelay,
    discovery_timeout: Duration,
    retry_interval: Duration,
    cancel: CancellationToken,
}

impl ConnectionManager {
    pub(crate) fn new(
        link: Arc<Link>,
        locator: ServiceLocator,
        factory: Arc<dyn ChannelFactory>,
        relay: SignalRelay,
        discovery_timeout: Duration,
        retry_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            link,
            locator,
            factory,
            relay,
            discovery_timeout,
            retry_interval,
            cancel,
        }
    }

    /// Run until cancelled. Never returns an error.
    pub(crate) async fn run(self) {
        info!("connection loop started");
        while !self.cancel.is_cancelled() {
            self.link.set_phase(Phase::Discovering);
            match self
                .locator
                .discover(self.discovery_timeout, &self.cancel)
                .await
            {
                Ok(found) => {
                    if found.from_network {
                        self.link.arm_loopback_first();
                    }
                    self.connect_and_stream(&found.endpoint).await;
                }
                Err(e) if self.cancel.is_cancelled() => debug!(error = %e, "discovery aborted"),
                Err(e) => warn!(error = %e, "backend discovery failed"),
            }

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.retry_interval) => {}
            }
            self.link
                .state
                .send_modify(|s| s.consecutive_stream_fail_count += 1);
        }
        self.link.set_phase(Phase::Stopped);
        info!("connection loop stopped");
    }

    async fn connect_and_stream(&self, endpoint: &Endpoint) {
        if self.link.loopback_first() {
            let loopback = Endpoint::new(LOOPBACK_HOST, endpoint.port);
            debug!(%loopback, resolved = %endpoint, "trying loopback first");
            self.stream_once(&loopback).await;
            if self.cancel.is_cancelled() {
                return;
            }
        }
        self.stream_once(endpoint).await;
    }

    /// One connect + drain cycle against `endpoint`.
    async fn stream_once(&self, endpoint: &Endpoint) {
        self.link.state.send_modify(|s| {
            s.host.clone_from(&endpoint.host);
            s.port = endpoint.port;
            if s.phase != Phase::Stopped {
                s.phase = Phase::Connecting;
            }
        });

        let channel = match self.factory.open(endpoint) {
            Ok(channel) => channel,
            Err(e) => {
                warn!(%endpoint, error = %e, "could not open channel");
                self.degrade().await;
                return;
            }
        };
        self.link.replace_channel(Some(Arc::clone(&channel))).await;
        info!(%endpoint, "subscribing to signals");

        let mut stream = match channel.subscribe_to_signals().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(%endpoint, error = %e, "signal subscription failed");
                self.degrade().await;
                return;
            }
        };
        self.link.set_phase(Phase::Streaming);

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                next = stream.next() => next,
            };
            match next {
                Some(Ok(msg)) => {
                    self.link.mark_restored();
                    self.relay.relay(msg);
                }
                Some(Err(outlet_api::Error::SignalDecode { sig_int, message })) => {
                    // The frame arrived, so the backend is alive.
                    self.link.mark_restored();
                    self.relay.relay_undecodable(sig_int, &message);
                }
                Some(Err(e)) => {
                    warn!(%endpoint, error = %e, "signal stream failed");
                    break;
                }
                None => {
                    info!(%endpoint, "signal stream ended");
                    break;
                }
            }
        }
        self.degrade().await;
    }

    async fn degrade(&self) {
        self.link.set_phase(Phase::Degraded);
        self.link.mark_down().await;
    }
}

/// Stop the loop and drop the channel. The caller joins the task.
pub(crate) async fn shutdown(link: &Link, cancel: &CancellationToken) {
    cancel.cancel();
    link.replace_channel(None).await;
    link.state.send_modify(|s| {
        s.phase = Phase::Stopped;
        s.is_connected = false;
    });
}
