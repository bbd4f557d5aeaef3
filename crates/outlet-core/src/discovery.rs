// ── Service discovery ──
//
// Resolves the backend endpoint: either a fixed address from config or a
// browse of the local network. Browsers report through a `CompletionLatch`,
// which keeps only the first outcome when success and failure race.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use outlet_api::Endpoint;
use outlet_api::discovery;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EndpointMode;
use crate::error::CoreError;

/// A resolved endpoint and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEndpoint {
    pub endpoint: Endpoint,
    /// `true` when the endpoint came from a network browse rather than config.
    pub from_network: bool,
}

// ── CompletionLatch ──────────────────────────────────────────────────

type Outcome = Result<Endpoint, String>;

/// At-most-once completion for one browse.
pub struct CompletionLatch {
    tx: Mutex<Option<oneshot::Sender<Outcome>>>,
}

impl CompletionLatch {
    pub fn new() -> (Arc<Self>, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Arc::new(Self {
                tx: Mutex::new(Some(tx)),
            }),
            rx,
        )
    }

    /// Report the service. Returns `false` if an outcome was already taken.
    pub fn succeed(&self, endpoint: Endpoint) -> bool {
        self.complete(Ok(endpoint))
    }

    /// Report a browse failure. Returns `false` if an outcome was already taken.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.complete(Err(reason.into()))
    }

    pub fn is_complete(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn complete(&self, outcome: Outcome) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        match tx {
            Some(tx) => {
                // Receiver may already have timed out; the latch is still spent.
                let _ = tx.send(outcome);
                true
            }
            None => {
                debug!(?outcome, "discovery latch already completed, ignoring");
                false
            }
        }
    }
}

// ── ServiceBrowser ───────────────────────────────────────────────────

/// Something that can look for a service on the network.
///
/// Implementations complete `latch` once, then return. They must stop
/// promptly when `cancel` fires.
#[async_trait]
pub trait ServiceBrowser: Send + Sync {
    async fn browse(
        &self,
        service_type: &str,
        domain: &str,
        latch: Arc<CompletionLatch>,
        cancel: CancellationToken,
    );
}

/// mDNS/DNS-SD browser backed by `outlet_api::discovery`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdnsServiceBrowser;

#[async_trait]
impl ServiceBrowser for MdnsServiceBrowser {
    async fn browse(
        &self,
        service_type: &str,
        domain: &str,
        latch: Arc<CompletionLatch>,
        cancel: CancellationToken,
    ) {
        match discovery::browse(service_type, domain, cancel).await {
            Ok(endpoint) => {
                latch.succeed(endpoint);
            }
            Err(outlet_api::Error::Closed) => {}
            Err(e) => {
                warn!(error = %e, "service browse failed");
                latch.fail(e.to_string());
            }
        }
    }
}

// ── ServiceLocator ───────────────────────────────────────────────────

pub struct ServiceLocator {
    mode: EndpointMode,
    browser: Arc<dyn ServiceBrowser>,
}

impl ServiceLocator {
    pub fn new(mode: EndpointMode, browser: Arc<dyn ServiceBrowser>) -> Self {
        Self { mode, browser }
    }

    pub fn mode(&self) -> &EndpointMode {
        &self.mode
    }

    /// Resolve the backend endpoint, waiting at most `timeout`.
    pub async fn discover(
        &self,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<DiscoveredEndpoint, CoreError> {
        let (service_type, domain) = match &self.mode {
            EndpointMode::Fixed { host, port } => {
                debug!(%host, port, "using fixed backend address");
                return Ok(DiscoveredEndpoint {
                    endpoint: Endpoint::new(host.clone(), *port),
                    from_network: false,
                });
            }
            EndpointMode::Network {
                service_type,
                domain,
            } => (service_type.clone(), domain.clone()),
        };

        info!(service = %service_type, %domain, ?timeout, "discovering backend");
        let not_found = |reason: String| CoreError::NotFound {
            service: service_type.clone(),
            reason,
        };

        let (latch, rx) = CompletionLatch::new();
        let browse_cancel = cancel.child_token();
        let browser = Arc::clone(&self.browser);
        let task = {
            let (service_type, domain, browse_cancel) =
                (service_type.clone(), domain.clone(), browse_cancel.clone());
            tokio::spawn(async move {
                browser
                    .browse(&service_type, &domain, latch, browse_cancel)
                    .await;
            })
        };

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(not_found("discovery cancelled".into())),
            res = tokio::time::timeout(timeout, rx) => match res {
                Ok(Ok(Ok(endpoint))) => Ok(endpoint),
                Ok(Ok(Err(reason))) => Err(not_found(reason)),
                Ok(Err(_)) => Err(not_found("browser stopped without a result".into())),
                Err(_) => Err(not_found(format!("no answer within {}s", timeout.as_secs_f32()))),
            },
        };

        browse_cancel.cancel();
        drop(task);

        let endpoint = outcome?;
        info!(endpoint = %endpoint, "discovered backend");
        Ok(DiscoveredEndpoint {
            endpoint,
            from_network: true,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn network_mode() -> EndpointMode {
        EndpointMode::default()
    }

    /// Counts calls and completes the latch however the test says.
    struct ScriptedBrowser {
        calls: AtomicUsize,
        script: fn(&CompletionLatch),
    }

    impl ScriptedBrowser {
        fn new(script: fn(&CompletionLatch)) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script,
            })
        }
    }

    #[async_trait]
    impl ServiceBrowser for ScriptedBrowser {
        async fn browse(
            &self,
            _service_type: &str,
            _domain: &str,
            latch: Arc<CompletionLatch>,
            cancel: CancellationToken,
        ) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.script)(&latch);
            cancel.cancelled().await;
        }
    }

    #[test]
    fn latch_takes_only_the_first_outcome() {
        let (latch, mut rx) = CompletionLatch::new();
        assert!(latch.succeed(Endpoint::new("10.0.0.2", 50051)));
        assert!(!latch.fail("late failure"));
        assert!(!latch.succeed(Endpoint::new("10.0.0.3", 50051)));
        assert!(latch.is_complete());
        assert_eq!(rx.try_recv().unwrap().unwrap(), Endpoint::new("10.0.0.2", 50051));
    }

    #[tokio::test]
    async fn fixed_mode_never_browses() {
        let browser = ScriptedBrowser::new(|_| panic!("browser must not run"));
        let locator = ServiceLocator::new(
            EndpointMode::Fixed {
                host: "192.168.1.20".into(),
                port: 6000,
            },
            browser.clone(),
        );
        let found = locator
            .discover(Duration::from_secs(10), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(found.endpoint, Endpoint::new("192.168.1.20", 6000));
        assert!(!found.from_network);
        assert_eq!(browser.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn network_success_wins_over_racing_failure() {
        let browser = ScriptedBrowser::new(|latch| {
            latch.succeed(Endpoint::new("10.0.0.7", 50051));
            latch.fail("resolver error");
        });
        let locator = ServiceLocator::new(network_mode(), browser.clone());
        let found = locator
            .discover(Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(found.endpoint, Endpoint::new("10.0.0.7", 50051));
        assert!(found.from_network);
        assert_eq!(browser.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn browse_failure_is_not_found() {
        let browser = ScriptedBrowser::new(|latch| {
            latch.fail("no route to host");
        });
        let locator = ServiceLocator::new(network_mode(), browser);
        let err = locator
            .discover(Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            CoreError::NotFound { service, reason } => {
                assert_eq!(service, "_outlet._tcp.");
                assert_eq!(reason, "no route to host");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out() {
        let browser = ScriptedBrowser::new(|_| {});
        let locator = ServiceLocator::new(network_mode(), browser);
        let err = locator
            .discover(Duration::from_secs(10), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn cancel_stops_discovery() {
        let browser = ScriptedBrowser::new(|_| {});
        let locator = ServiceLocator::new(network_mode(), browser);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = locator
            .discover(Duration::from_secs(10), &cancel)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }
}
