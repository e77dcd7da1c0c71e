//! Lifetime event counters
//!
//! Monotonically increasing totals per event kind, each with a per-platform
//! breakdown. A kind total always equals the sum of its platform map.

use std::collections::HashMap;

use crate::types::EventKind;

/// Totals and per-platform breakdowns for the three event kinds
#[derive(Debug, Clone, Default)]
pub struct CounterSet {
    total_messages: u64,
    total_notices: u64,
    total_requests: u64,
    messages_by_platform: HashMap<String, u64>,
    notices_by_platform: HashMap<String, u64>,
    requests_by_platform: HashMap<String, u64>,
}

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a counter set from stored values
    pub fn from_parts(
        total_messages: u64,
        total_notices: u64,
        total_requests: u64,
        messages_by_platform: HashMap<String, u64>,
        notices_by_platform: HashMap<String, u64>,
        requests_by_platform: HashMap<String, u64>,
    ) -> Self {
        Self {
            total_messages,
            total_notices,
            total_requests,
            messages_by_platform,
            notices_by_platform,
            requests_by_platform,
        }
    }

    /// Bump the kind total and its platform entry together
    pub fn increment(&mut self, kind: EventKind, platform: &str) {
        let (total, by_platform) = match kind {
            EventKind::Message => (&mut self.total_messages, &mut self.messages_by_platform),
            EventKind::Notice => (&mut self.total_notices, &mut self.notices_by_platform),
            EventKind::Request => (&mut self.total_requests, &mut self.requests_by_platform),
        };

        *total += 1;
        *by_platform.entry(platform.to_string()).or_insert(0) += 1;
    }

    /// Zero all totals and clear the platform maps
    pub fn reset(&mut self) {
        self.total_messages = 0;
        self.total_notices = 0;
        self.total_requests = 0;
        self.messages_by_platform.clear();
        self.notices_by_platform.clear();
        self.requests_by_platform.clear();
    }

    /// Lifetime total for one kind
    pub fn total_for(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::Message => self.total_messages,
            EventKind::Notice => self.total_notices,
            EventKind::Request => self.total_requests,
        }
    }

    /// Lifetime total across all kinds
    pub fn total_events(&self) -> u64 {
        self.total_messages + self.total_notices + self.total_requests
    }

    /// Per-platform breakdown for one kind
    pub fn platform_map(&self, kind: EventKind) -> &HashMap<String, u64> {
        match kind {
            EventKind::Message => &self.messages_by_platform,
            EventKind::Notice => &self.notices_by_platform,
            EventKind::Request => &self.requests_by_platform,
        }
    }
}
