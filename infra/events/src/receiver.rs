use crate::bus::Event;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::warn;

/// Unifies the receiving side of the supported channel kinds.
///
/// For `watch::Receiver`, `recv` waits for a change before returning the
/// latest value.
pub trait EventReceiverExt<T> {
    /// Receive the next event, returning `None` once the channel is closed.
    fn recv(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    /// Absorbs broadcast lag: a receiver that fell behind resumes from the
    /// oldest retained event instead of erroring out of the subscription.
    /// Skipped events are reported once with a `warn!`.
    async fn recv(&mut self) -> Option<Arc<T>> {
        use broadcast::error::RecvError;

        let mut skipped: u64 = 0;
        let event = loop {
            match self.recv().await {
                Ok(event) => break event,
                Err(RecvError::Lagged(n)) => skipped = skipped.saturating_add(n),
                Err(RecvError::Closed) => return None,
            }
        };

        if skipped > 0 {
            warn!(
                event = std::any::type_name::<T>(),
                skipped, "Event receiver lagged; resuming from oldest retained event"
            );
        }
        Some(event)
    }
}

impl<T: Event> EventReceiverExt<T> for watch::Receiver<Arc<T>> {
    async fn recv(&mut self) -> Option<Arc<T>> {
        match self.changed().await {
            Ok(()) => Some(self.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}
