//! At-most-one coalescing for concurrent calls sharing the same
//! fingerprint (§4.4): if two callers ask for the same analysis while the
//! first is still in flight, the second waits on the first's result
//! instead of issuing a duplicate provider call.

use crate::fingerprint::Fingerprint;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// A registry of in-flight calls keyed by [`Fingerprint`]. `V` must be
/// `Clone` since every waiter receives its own copy of the shared result.
pub struct SingleFlight<V> {
    inflight: Mutex<HashMap<Fingerprint, Arc<OnceCell<V>>>>,
}

impl<V: Clone> SingleFlight<V> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `make` to produce a value for `key`, or waits for and clones an
    /// already-in-flight call for the same key. Only one waiter per key
    /// ever invokes `make`.
    pub async fn run<F, Fut>(&self, key: Fingerprint, make: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = V>,
    {
        let cell = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let value = cell.get_or_init(make).await.clone();

        let mut inflight = self.inflight.lock().await;
        if let Some(existing) = inflight.get(&key) {
            if Arc::ptr_eq(existing, &cell) {
                inflight.remove(&key);
            }
        }

        value
    }
}

impl<V: Clone> Default for SingleFlight<V> {
    fn default() -> Self {
        Self::new()
    }
}
