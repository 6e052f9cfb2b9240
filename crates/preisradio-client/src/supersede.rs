//! Latest-wins request slot for interactive views.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::task::AbortHandle;

/// Runs at most one request at a time on behalf of a view.
///
/// Starting a new request aborts the one in flight. A request whose result
/// arrives after a newer one was started is discarded, so a view never
/// renders stale data.
#[derive(Debug, Default)]
pub struct LatestRequest {
    slot: Mutex<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl LatestRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `fut`, superseding any earlier request.
    ///
    /// Returns `None` when the request was aborted or superseded before its
    /// result could be used.
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(fut);
        let generation = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = slot.in_flight.replace(handle.abort_handle()) {
                previous.abort();
            }
            slot.generation += 1;
            slot.generation
        };

        let result = handle.await.ok()?;

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            tracing::debug!(generation, current = slot.generation, "discarding superseded response");
            return None;
        }
        slot.in_flight = None;
        Some(result)
    }

    /// Abort whatever is in flight and invalidate its result.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        if let Some(previous) = slot.in_flight.take() {
            previous.abort();
        }
    }

    /// Number of requests started or cancelled so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}
