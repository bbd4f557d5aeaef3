// ── Signal subscriptions ──
//
// Consumer-side handle on the session's signal fan-out.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use crate::model::{Signal, SignalEnvelope};

/// A subscription to every signal the session publishes.
///
/// Envelopes arrive in the order they were received. A subscriber that
/// falls more than the buffer size behind skips the oldest envelopes.
pub struct SignalSubscription {
    receiver: broadcast::Receiver<Arc<SignalEnvelope>>,
}

impl SignalSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<Arc<SignalEnvelope>>) -> Self {
        Self { receiver }
    }

    /// Wait for the next envelope. Returns `None` once the session is gone.
    pub async fn recv(&mut self) -> Option<Arc<SignalEnvelope>> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => return Some(envelope),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "signal subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next envelope of one kind, dropping the rest.
    pub async fn recv_signal(&mut self, signal: Signal) -> Option<Arc<SignalEnvelope>> {
        loop {
            let envelope = self.recv().await?;
            if envelope.signal() == signal {
                return Some(envelope);
            }
        }
    }

    pub fn into_stream(self) -> SignalEnvelopeStream {
        SignalEnvelopeStream {
            inner: BroadcastStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter over a [`SignalSubscription`]. Lag gaps are skipped.
pub struct SignalEnvelopeStream {
    inner: BroadcastStream<Arc<SignalEnvelope>>,
}

impl Stream for SignalEnvelopeStream {
    type Item = Arc<SignalEnvelope>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(envelope))) => return Poll::Ready(Some(envelope)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    warn!(skipped, "signal stream lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
