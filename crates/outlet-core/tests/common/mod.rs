// Shared in-memory transport for session integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use outlet_api::wire::SignalMsg;
use outlet_api::{ChannelFactory, Endpoint, Error, RpcChannel, SignalStream};
use outlet_core::model::Signal;
use outlet_core::{CompletionLatch, EndpointMode, ServiceBrowser, Session, SessionConfig};
use tokio_util::sync::CancellationToken;

/// What one opened channel's signal subscription does.
pub enum Script {
    /// Subscription fails outright.
    Refuse,
    /// Stream ends immediately with no messages.
    End,
    /// Yield these, then stay open until the channel is closed.
    Messages(Vec<SignalMsg>),
    /// Decode these raw text frames as the WebSocket layer does, then stay
    /// open until the channel is closed.
    Frames(Vec<String>),
}

pub type Responder = Arc<dyn Fn(&str, serde_json::Value) -> Result<serde_json::Value, Error> + Send + Sync>;

pub fn responder<F>(f: F) -> Responder
where
    F: Fn(&str, serde_json::Value) -> Result<serde_json::Value, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Default)]
pub struct CallStats {
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub total: AtomicUsize,
}

pub struct MockFactory {
    pub opened: Mutex<Vec<Endpoint>>,
    scripts: Mutex<VecDeque<Script>>,
    responder: Responder,
    pub stats: Arc<CallStats>,
    call_delay: Duration,
}

impl MockFactory {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Self::with_responder(scripts, responder(|_, _| Ok(serde_json::json!({}))))
    }

    pub fn with_responder(scripts: Vec<Script>, responder: Responder) -> Arc<Self> {
        Arc::new(Self {
            opened: Mutex::new(Vec::new()),
            scripts: Mutex::new(scripts.into()),
            responder,
            stats: Arc::new(CallStats::default()),
            call_delay: Duration::from_millis(5),
        })
    }

    pub fn opened(&self) -> Vec<Endpoint> {
        self.opened.lock().unwrap().clone()
    }

    /// Queue a script for the next channel opened.
    pub fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }
}

impl ChannelFactory for MockFactory {
    fn open(&self, endpoint: &Endpoint) -> Result<Arc<dyn RpcChannel>, Error> {
        self.opened.lock().unwrap().push(endpoint.clone());
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or(Script::End);
        Ok(Arc::new(MockChannel {
            endpoint: endpoint.clone(),
            script: Mutex::new(Some(script)),
            closed: CancellationToken::new(),
            responder: Arc::clone(&self.responder),
            stats: Arc::clone(&self.stats),
            call_delay: self.call_delay,
        }))
    }
}

pub struct MockChannel {
    endpoint: Endpoint,
    script: Mutex<Option<Script>>,
    closed: CancellationToken,
    responder: Responder,
    stats: Arc<CallStats>,
    call_delay: Duration,
}

#[async_trait]
impl RpcChannel for MockChannel {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn unary(&self, rpc: &'static str, request: serde_json::Value) -> Result<serde_json::Value, Error> {
        if self.closed.is_cancelled() {
            return Err(Error::Closed);
        }
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.stats.total.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.call_delay).await;
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.responder)(rpc, request)
    }

    async fn subscribe_to_signals(&self) -> Result<SignalStream, Error> {
        let script = self.script.lock().unwrap().take().unwrap_or(Script::End);
        match script {
            Script::Refuse => Err(Error::SignalStream("connection refused".into())),
            Script::End => Ok(Box::pin(futures_util::stream::empty())),
            Script::Messages(messages) => {
                let closed = self.closed.clone();
                Ok(Box::pin(async_stream::stream! {
                    for msg in messages {
                        yield Ok(msg);
                    }
                    closed.cancelled().await;
                }))
            }
            Script::Frames(frames) => {
                let closed = self.closed.clone();
                Ok(Box::pin(async_stream::stream! {
                    for text in frames {
                        yield outlet_api::signal_stream::decode_signal_frame(&text);
                    }
                    closed.cancelled().await;
                }))
            }
        }
    }

    fn close(&self) {
        self.closed.cancel();
    }
}

/// Resolves every browse to a fixed endpoint.
pub struct NetworkBrowser(pub Endpoint);

#[async_trait]
impl ServiceBrowser for NetworkBrowser {
    async fn browse(&self, _service_type: &str, _domain: &str, latch: Arc<CompletionLatch>, _cancel: CancellationToken) {
        latch.succeed(self.0.clone());
    }
}

/// Never resolves.
pub struct SilentBrowser;

#[async_trait]
impl ServiceBrowser for SilentBrowser {
    async fn browse(&self, _service_type: &str, _domain: &str, _latch: Arc<CompletionLatch>, cancel: CancellationToken) {
        cancel.cancelled().await;
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn msg(signal: Signal) -> SignalMsg {
    SignalMsg {
        sig_int: signal as u32,
        sender: "backend".into(),
        signal_data: None,
    }
}

pub fn fast_config(endpoint: EndpointMode) -> SessionConfig {
    SessionConfig {
        endpoint,
        discovery_timeout: Duration::from_millis(200),
        retry_interval: Duration::from_millis(50),
        ..SessionConfig::default()
    }
}

pub fn fixed_session(factory: &Arc<MockFactory>, host: &str) -> Session {
    Session::with_transport(
        fast_config(EndpointMode::Fixed {
            host: host.into(),
            port: 50051,
        }),
        Arc::clone(factory) as _,
        Arc::new(SilentBrowser),
    )
}

/// A session that connects on its first attempt and then stays up.
pub async fn connected_session(responder: Responder) -> (Session, Arc<MockFactory>) {
    let factory = MockFactory::with_responder(
        vec![Script::Messages(vec![msg(Signal::Welcome)])],
        responder,
    );
    let session = fixed_session(&factory, "127.0.0.1");
    session.start().await;
    session
        .wait_until_connected(Duration::from_secs(5))
        .await
        .unwrap();
    (session, factory)
}
