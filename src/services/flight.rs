//! Keyed single-flight locking.
//!
//! Concurrent identical cache misses would each hit the rate-limited
//! upstream on their own. Callers take the key's lock before fetching and
//! re-check the cache once inside, so only the first of a burst pays the
//! upstream call. Entries are removed when the last holder releases;
//! distinct keys never block each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FlightKey {
    kind: &'static str,
    requester: String,
    group_key: String,
}

#[derive(Default)]
pub struct FlightMap {
    entries: Mutex<HashMap<FlightKey, Arc<AsyncMutex<()>>>>,
}

impl FlightMap {
    /// Take the lock for (kind, requester, group-key), waiting for any
    /// in-flight holder first.
    pub async fn acquire(&self, kind: &'static str, requester: &str, group_key: &str) -> FlightGuard<'_> {
        let key = FlightKey {
            kind,
            requester: requester.to_string(),
            group_key: group_key.to_string(),
        };

        let handle = {
            let mut entries = self.entries.lock().expect("flight map poisoned");
            entries.entry(key.clone()).or_default().clone()
        };
        let guard = handle.clone().lock_owned().await;

        FlightGuard {
            map: self,
            key,
            handle,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("flight map poisoned").len()
    }
}

pub struct FlightGuard<'a> {
    map: &'a FlightMap,
    key: FlightKey,
    handle: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // Release the lock, then drop the map entry if nobody else is
        // waiting on it. The strong-count check happens under the map lock,
        // which is also where new holders clone the Arc.
        self.guard.take();
        let mut entries = self.map.entries.lock().expect("flight map poisoned");
        if Arc::strong_count(&self.handle) == 2 {
            entries.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_key_serializes() {
        let map = Arc::new(FlightMap::default());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let map = Arc::clone(&map);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                let _guard = map.acquire("search", "r1", "matrix").await;
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(map.len(), 0, "entries are dropped after release");
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let map = FlightMap::default();
        let g1 = map.acquire("search", "r1", "matrix").await;
        // A different requester and a different group both proceed.
        let _g2 = map.acquire("search", "r2", "matrix").await;
        let _g3 = map.acquire("links", "r1", "matrix").await;
        drop(g1);
    }
}
