//! Event Statistics Aggregator
//!
//! Ingests a continuous stream of typed events (message / notice / request)
//! from an external messaging adapter, maintains lifetime counters and a
//! bounded recency buffer, and answers analytical queries over that buffer.
//!
//! # Features
//!
//! - **Lifetime counters**: totals per event kind with per-platform breakdowns
//! - **Recency window**: the last 1000 events, FIFO-evicted, queryable
//! - **Queries**: time-windowed counts, per-minute histograms, filtered
//!   search, per-user and per-group rollups
//! - **Best-effort persistence**: full-state snapshot after every event
//!   through a pluggable key-value store; failures never reach the caller
//! - **Thread-safe**: one `RwLock` guards the whole aggregate, so counters
//!   and buffer always move together
//!
//! # Modules
//!
//! - `types`: core data structures (EventRecord, payloads, query results)
//! - `aggregator`: counters, recency buffer and the service facade
//! - `storage`: key-value boundary and snapshot (de)serialization
//! - `feed`: channel-driven ingestion from the adapter
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use event_stats::aggregator::AggregatorService;
//! use event_stats::storage::FileStore;
//! use event_stats::types::{EventKind, NewEvent};
//!
//! let service = AggregatorService::new(Arc::new(FileStore::from_env()));
//!
//! service.ingest(
//!     NewEvent::new(EventKind::Message)
//!         .with_platform("qq")
//!         .with_user("u1")
//!         .with_alt_message("hello"),
//! );
//!
//! let totals = service.totals();
//! assert_eq!(totals.total_events, totals.total_messages);
//! ```

pub mod aggregator;
pub mod feed;
pub mod storage;
pub mod types;

// Re-export commonly used items at crate root
pub use aggregator::{AggregatorService, RecencyBuffer, RECENT_EVENTS_CAPACITY};
pub use storage::{FileStore, KvStore, MemoryStore, SnapshotStore, StatsSnapshot};
pub use types::{
    EventKind, EventRecord, GroupStats, InboundEvent, NewEvent, PlatformBreakdown, RangeStats,
    SearchFilter, TotalStats, UserStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
