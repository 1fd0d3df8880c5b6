//! Single-flight bookkeeping for supersedable requests
//!
//! Each named operation holds at most one request in flight. Starting a
//! new one cancels whatever was already running under the same key, so a
//! stale response can never land on top of a fresher one.

use dashmap::DashMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Tracks the in-flight request per operation key
#[derive(Debug, Default)]
pub struct FlightGuard {
    flights: DashMap<&'static str, CancellationToken>,
}

impl FlightGuard {
    /// Create an empty guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new flight under `key`, cancelling any previous one
    #[must_use]
    pub fn begin(&self, key: &'static str) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.flights.insert(key, token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel and forget the flight under `key`, if any
    pub fn cancel(&self, key: &'static str) {
        if let Some((_, token)) = self.flights.remove(key) {
            token.cancel();
        }
    }

    /// Cancel every tracked flight
    pub fn cancel_all(&self) {
        self.flights.retain(|_, token| {
            token.cancel();
            false
        });
    }
}

/// Run `fut` unless `token` is cancelled first
///
/// Returns `None` when the flight was superseded, either mid-await or
/// between the response arriving and this check running. Callers treat
/// `None` as silence, not as an error.
pub async fn supersedable<F, T>(token: &CancellationToken, fut: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        () = token.cancelled() => None,
        result = fut => {
            if token.is_cancelled() {
                None
            } else {
                Some(result)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn test_begin_cancels_previous_flight() {
        let guard = FlightGuard::new();
        let first = guard.begin("op");
        let second = guard.begin("op");

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_interfere() {
        let guard = FlightGuard::new();
        let a = guard.begin("op.a");
        let b = guard.begin("op.b");

        assert!(!a.is_cancelled());
        assert!(!b.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_stops_tracked_flight() {
        let guard = FlightGuard::new();
        let token = guard.begin("op");
        guard.cancel("op");

        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_all_sweeps_every_flight() {
        let guard = FlightGuard::new();
        let a = guard.begin("op.a");
        let b = guard.begin("op.b");
        guard.cancel_all();

        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[tokio::test]
    async fn test_supersedable_returns_result_when_untouched() {
        let token = CancellationToken::new();
        let result = supersedable(&token, async { 7 }).await;
        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn test_supersedable_drops_result_when_precancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let result = supersedable(&token, async { 7 }).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_supersedable_aborts_pending_future() {
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        });

        let result = supersedable(&token, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            7
        })
        .await;
        assert_eq!(result, None);
    }
}
