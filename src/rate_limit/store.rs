//! Counter storage for fixed-window rate limiting.
//!
//! The gate only needs an atomic "increment within window" per key, so a
//! shared cache can stand in for the in-process map without touching the
//! gate itself.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::clock::{Clock, SystemClock};

/// Count observed by one increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Requests seen in the current window, this one included.
    pub count: u32,
    /// Time until the current window ends.
    pub resets_in: Duration,
}

#[async_trait]
pub trait CounterStore: Send + Sync + Debug {
    /// Increment the counter for `key`, starting a fresh window first if the
    /// previous one has elapsed.
    async fn increment(&self, key: &str, window: Duration) -> WindowCount;

    /// Drop every counter.
    async fn reset_all(&self);
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    window_start: Instant,
}

/// In-process counter table.
///
/// DashMap shards the keys, so the entry lock taken for one client never
/// blocks increments for keys in other shards.
#[derive(Debug)]
pub struct MemoryCounterStore {
    counters: DashMap<String, WindowCounter>,
    clock: Arc<dyn Clock>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: DashMap::new(),
            clock,
        }
    }

    /// Number of tracked (key, window) counters, live or stale.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> WindowCount {
        let now = self.clock.now();

        // The entry guard holds the shard write lock, so reset + increment +
        // read happen as one step for this key.
        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert(WindowCounter {
                count: 0,
                window_start: now,
            });

        if now.saturating_duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count = entry.count.saturating_add(1);

        let elapsed = now.saturating_duration_since(entry.window_start);
        WindowCount {
            count: entry.count,
            resets_in: window.saturating_sub(elapsed),
        }
    }

    async fn reset_all(&self) {
        self.counters.clear();
    }
}
