//! Query result types
//!
//! Plain structured values returned by the aggregator's query surface.
//! Everything derives `Serialize` so a presentation layer (chat command,
//! dashboard, CLI) can render results without further mapping.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::event::EventRecord;

/// Lifetime totals per event kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_messages: u64,
    pub total_notices: u64,
    pub total_requests: u64,
    /// Sum of the three kind totals
    pub total_events: u64,
}

/// Lifetime totals broken down by originating platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBreakdown {
    pub messages_by_platform: HashMap<String, u64>,
    pub notices_by_platform: HashMap<String, u64>,
    pub requests_by_platform: HashMap<String, u64>,
}

/// Counts over a trailing time window of the recency buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    pub total_events: u64,
    pub messages: u64,
    pub notices: u64,
    pub requests: u64,
    pub by_platform: HashMap<String, u64>,
    /// The window the counts were computed over
    pub window_minutes: u64,
}

/// Filters for [`search`](crate::aggregator::AggregatorService::search)
///
/// All fields are optional; a record matches when every provided filter is
/// satisfied. The keyword match is a case-insensitive substring test against
/// `alt_message` (records without one are treated as having empty text).
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub keyword: Option<String>,
    pub kind: Option<super::event::EventKind>,
    pub platform: Option<String>,
    pub user_id: Option<String>,
}

/// Per-user rollup computed from the recency buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub total_messages: u64,
    pub total_notices: u64,
    pub total_requests: u64,
    pub total_events: u64,
    /// Distinct platforms the user was seen on, sorted
    pub platforms: BTreeSet<String>,
    /// Tail of the user's events in buffer order, at most 10
    pub recent_events: Vec<EventRecord>,
}

/// Per-group rollup computed from the recency buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group_id: String,
    pub total_messages: u64,
    pub total_notices: u64,
    pub total_requests: u64,
    pub total_events: u64,
    /// Distinct platforms the group was seen on, sorted
    pub platforms: BTreeSet<String>,
    /// Number of distinct users observed in the group
    pub participant_count: u64,
    /// Distinct users observed in the group, sorted
    pub participants: BTreeSet<String>,
    /// Tail of the group's events in buffer order, at most 10
    pub recent_events: Vec<EventRecord>,
}
