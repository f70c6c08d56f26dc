//! In-memory TTL cache for raw API responses
//!
//! Provides a `TtlCache` that memoizes byte payloads under string keys for a
//! fixed interval. Reads take a shared lock and never refresh an entry; inserts
//! never replace an existing entry. A background reaper task wakes once per
//! interval and drops every entry older than the interval.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Errors that can occur when constructing a cache
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The expiry interval was zero
    #[error("Cache interval must be greater than zero")]
    ZeroInterval,
}

/// A cached payload and the moment it was inserted
#[derive(Debug)]
struct CacheEntry {
    value: Vec<u8>,
    created_at: Instant,
}

type Entries = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// Concurrency-safe key/value store with time-based expiry
///
/// Entries live for at least one full interval after insertion and are
/// removed by the reaper on the first tick strictly later than
/// `created_at + interval`. The reaper stops when [`TtlCache::shutdown`] is
/// called or when the cache is dropped.
#[derive(Debug)]
pub struct TtlCache {
    entries: Entries,
    interval: Duration,
    shutdown_tx: mpsc::Sender<()>,
    reaper: Mutex<Option<JoinHandle<()>>>,
}

impl TtlCache {
    /// Creates an empty cache and starts its reaper on the current tokio runtime
    ///
    /// # Arguments
    /// * `interval` - How long entries live, and how often the reaper runs
    ///
    /// # Returns
    /// * `Ok(TtlCache)` with the reaper running
    /// * `Err(CacheError::ZeroInterval)` if `interval` is zero
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn new(interval: Duration) -> Result<Self, CacheError> {
        if interval.is_zero() {
            return Err(CacheError::ZeroInterval);
        }

        let entries: Entries = Arc::new(RwLock::new(HashMap::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        // Anchor the tick schedule at construction time
        let ticker = reap_ticker(interval);
        let reaper = tokio::spawn(reap_loop(
            Arc::clone(&entries),
            interval,
            ticker,
            shutdown_rx,
        ));

        Ok(Self {
            entries,
            interval,
            shutdown_tx,
            reaper: Mutex::new(Some(reaper)),
        })
    }

    /// Inserts `value` under `key` unless the key is already present
    ///
    /// An existing entry keeps its original value and timestamp; the new
    /// value is discarded silently.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let mut entries = self.entries.write();
        entries.entry(key.into()).or_insert_with(|| CacheEntry {
            value: value.into(),
            created_at: Instant::now(),
        });
    }

    /// Returns a copy of the payload stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).map(|entry| entry.value.clone())
    }

    /// The expiry interval this cache was built with
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of entries currently held, expired-but-unreaped ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stops the reaper and waits for it to exit
    ///
    /// Entries already in the cache stay readable afterwards but are no
    /// longer expired. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.try_send(());
        let reaper = self.reaper.lock().take();
        if let Some(reaper) = reaper {
            let _ = reaper.await;
        }
    }
}

/// Ticker for the reaper
///
/// After a stall the next tick fires once and the schedule restarts from
/// there, instead of replaying every missed tick back to back.
fn reap_ticker(interval: Duration) -> Interval {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Background task pruning stale entries once per tick
async fn reap_loop(
    entries: Entries,
    interval: Duration,
    mut ticker: Interval,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    // Skip the first tick (immediate)
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A late tick reports its missed deadline; age entries against the wake-up time
                let removed = reap(&entries, interval, Instant::now());
                if removed > 0 {
                    debug!(removed, remaining = entries.read().len(), "reaped expired cache entries");
                }
            }
            // Fires on an explicit shutdown and when the cache is dropped
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }

    debug!("cache reaper stopped");
}

/// Removes every entry whose `created_at + interval` is strictly before `now`
///
/// Returns the number of entries removed.
fn reap(entries: &RwLock<HashMap<String, CacheEntry>>, interval: Duration, now: Instant) -> usize {
    let mut entries = entries.write();
    let before = entries.len();
    entries.retain(|_, entry| entry.created_at + interval >= now);
    before - entries.len()
}
