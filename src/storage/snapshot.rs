//! State snapshot persistence
//!
//! The whole aggregate (lifetime counters plus the recency buffer) is
//! serialized as one JSON document under a single namespaced key. Load
//! failures are reported to the caller as "no prior state" so a corrupt or
//! missing snapshot can never take the service down.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregator::{CounterSet, RecencyBuffer};
use crate::types::{EventKind, EventRecord};

use super::{KvStore, StorageResult};

/// The namespaced key the snapshot is stored under
pub const STATS_KEY: &str = "EventStats:stats";

/// Serialized form of the aggregate state
///
/// Field names match the stored document; timestamps inside `recent_events`
/// are RFC 3339 strings and survive a round trip exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub total_notices: u64,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub messages_by_platform: HashMap<String, u64>,
    #[serde(default)]
    pub notices_by_platform: HashMap<String, u64>,
    #[serde(default)]
    pub requests_by_platform: HashMap<String, u64>,
    #[serde(default)]
    pub recent_events: Vec<EventRecord>,
}

impl StatsSnapshot {
    /// Capture the current counters and buffer contents
    pub fn capture(counters: &CounterSet, recent: &RecencyBuffer) -> Self {
        Self {
            total_messages: counters.total_for(EventKind::Message),
            total_notices: counters.total_for(EventKind::Notice),
            total_requests: counters.total_for(EventKind::Request),
            messages_by_platform: counters.platform_map(EventKind::Message).clone(),
            notices_by_platform: counters.platform_map(EventKind::Notice).clone(),
            requests_by_platform: counters.platform_map(EventKind::Request).clone(),
            recent_events: recent.snapshot(),
        }
    }

    /// Rebuild counters and buffer from stored values
    ///
    /// Records are replayed through `push`, so a snapshot holding more
    /// events than the buffer capacity keeps only the newest ones.
    pub fn restore(self) -> (CounterSet, RecencyBuffer) {
        let counters = CounterSet::from_parts(
            self.total_messages,
            self.total_notices,
            self.total_requests,
            self.messages_by_platform,
            self.notices_by_platform,
            self.requests_by_platform,
        );

        let mut recent = RecencyBuffer::new();
        for record in self.recent_events {
            recent.push(record);
        }

        (counters, recent)
    }
}

/// Reads and writes the snapshot through a [`KvStore`]
pub struct SnapshotStore {
    kv: Arc<dyn KvStore>,
}

impl SnapshotStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Serialize and store the snapshot
    pub fn save(&self, snapshot: &StatsSnapshot) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.kv.set(STATS_KEY, &json)
    }

    /// Load the previously saved snapshot
    ///
    /// Returns `None` when nothing was stored yet. A read or parse failure
    /// is logged and also maps to `None`; the caller falls back to a zeroed
    /// state.
    pub fn load(&self) -> Option<StatsSnapshot> {
        let json = match self.kv.get(STATS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::error!("failed to read stored statistics: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::error!("failed to parse stored statistics, starting empty: {}", e);
                None
            }
        }
    }
}
