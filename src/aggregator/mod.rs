//! Aggregator service - core statistics engine
//!
//! Owns the aggregate state (lifetime counters plus the recency buffer)
//! behind a single lock and exposes ingestion and the query API. Persistence
//! is best-effort: a failed save is logged and never surfaces to the
//! ingestion caller.

mod buffer;
mod counters;
mod query;
mod search;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::storage::{KvStore, SnapshotStore, StatsSnapshot};
use crate::types::{
    EventRecord, GroupStats, InboundEvent, NewEvent, PlatformBreakdown, RangeStats, SearchFilter,
    TotalStats, UserStats,
};

pub use buffer::{RecencyBuffer, RECENT_EVENTS_CAPACITY};
pub use counters::CounterSet;

/// Counters plus the bounded recency buffer, mutated only under the
/// service's write lock
#[derive(Debug, Default)]
pub(crate) struct AggregateState {
    pub(crate) counters: CounterSet,
    pub(crate) recent: RecencyBuffer,
}

/// Ingestion and query surface over the aggregate state
///
/// One instance owns the state for the whole process. `ingest` takes the
/// write lock for the counter update, the buffer push and the snapshot
/// capture as a single critical section, so a query can never observe one
/// without the other. Queries take the read lock and may run concurrently.
pub struct AggregatorService {
    state: RwLock<AggregateState>,
    store: SnapshotStore,
}

impl AggregatorService {
    /// Create the service, loading prior state from the store
    ///
    /// A missing or unreadable snapshot falls back to zeroed state; startup
    /// never fails on persistence problems.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        let store = SnapshotStore::new(kv);

        let state = match store.load() {
            Some(snapshot) => {
                let (counters, recent) = snapshot.restore();
                log::info!(
                    "statistics loaded from storage ({} lifetime events, {} buffered)",
                    counters.total_events(),
                    recent.len()
                );
                AggregateState { counters, recent }
            }
            None => {
                log::info!("no stored statistics, starting empty");
                AggregateState::default()
            }
        };

        Self {
            state: RwLock::new(state),
            store,
        }
    }

    /// Record one event
    ///
    /// Stamps the current time, applies the defaulting rules, updates
    /// counters and buffer, then saves the full snapshot. Never fails
    /// observably; a persistence error is logged and swallowed.
    pub fn ingest(&self, input: NewEvent) {
        let record = EventRecord::from_input(input, Utc::now());
        log::debug!(
            "recorded {} event: {} - {}",
            record.kind,
            record.platform,
            record.detail_type
        );

        let snapshot = {
            let mut state = self.state.write();
            state.counters.increment(record.kind, &record.platform);
            state.recent.push(record);
            StatsSnapshot::capture(&state.counters, &state.recent)
        };

        self.persist(&snapshot);
    }

    /// Record one event as delivered by the adapter
    pub fn ingest_event(&self, event: InboundEvent) {
        self.ingest(event.into_new_event());
    }

    /// Lifetime totals per kind
    pub fn totals(&self) -> TotalStats {
        query::totals(&self.state.read())
    }

    /// Lifetime totals broken down by platform
    pub fn platform_breakdown(&self) -> PlatformBreakdown {
        query::platform_breakdown(&self.state.read())
    }

    /// The last `min(limit, buffered)` events in arrival order
    pub fn recent_events(&self, limit: usize) -> Vec<EventRecord> {
        query::recent_events(&self.state.read(), limit)
    }

    /// Counts over the trailing `minutes` window of the buffer
    pub fn events_in_range(&self, minutes: u32) -> RangeStats {
        query::events_in_range(&self.state.read(), minutes, Utc::now())
    }

    /// Per-minute histogram over the last `minutes` buckets, keyed by local
    /// wall-clock `HH:MM`
    pub fn events_per_minute(&self, minutes: u32) -> HashMap<String, u64> {
        query::events_per_minute(&self.state.read(), minutes, Utc::now())
    }

    /// Filtered newest-first search over the buffer
    pub fn search(&self, filter: &SearchFilter, limit: usize) -> Vec<EventRecord> {
        search::search(&self.state.read(), filter, limit)
    }

    /// Rollup of one user's buffered activity
    pub fn user_stats(&self, user_id: &str) -> UserStats {
        search::user_stats(&self.state.read(), user_id)
    }

    /// Rollup of one group's buffered activity
    pub fn group_stats(&self, group_id: &str) -> GroupStats {
        search::group_stats(&self.state.read(), group_id)
    }

    /// Zero all counters, empty the buffer and persist the empty state
    ///
    /// Irreversible; callers are responsible for gating this.
    pub fn reset(&self) {
        let snapshot = {
            let mut state = self.state.write();
            state.counters.reset();
            state.recent.clear();
            StatsSnapshot::capture(&state.counters, &state.recent)
        };

        self.persist(&snapshot);
        log::info!("statistics reset");
    }

    fn persist(&self, snapshot: &StatsSnapshot) {
        if let Err(e) = self.store.save(snapshot) {
            log::warn!("failed to persist statistics: {}", e);
        }
    }
}
