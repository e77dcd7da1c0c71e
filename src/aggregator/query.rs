//! Aggregate queries over counters and the recency buffer
//!
//! Every function here is a read-only traversal. Time-windowed queries take
//! `now` as an argument so the window math is deterministic under test; the
//! service passes the current wall clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, DurationRound, Local, Utc};

use crate::types::{EventKind, EventRecord, PlatformBreakdown, RangeStats, TotalStats};

use super::AggregateState;

/// Lifetime totals, straight off the counters
pub(super) fn totals(state: &AggregateState) -> TotalStats {
    TotalStats {
        total_messages: state.counters.total_for(EventKind::Message),
        total_notices: state.counters.total_for(EventKind::Notice),
        total_requests: state.counters.total_for(EventKind::Request),
        total_events: state.counters.total_events(),
    }
}

/// Copies of the per-platform counter maps
pub(super) fn platform_breakdown(state: &AggregateState) -> PlatformBreakdown {
    PlatformBreakdown {
        messages_by_platform: state.counters.platform_map(EventKind::Message).clone(),
        notices_by_platform: state.counters.platform_map(EventKind::Notice).clone(),
        requests_by_platform: state.counters.platform_map(EventKind::Request).clone(),
    }
}

/// The last `min(limit, len)` buffered records in arrival order
pub(super) fn recent_events(state: &AggregateState, limit: usize) -> Vec<EventRecord> {
    let len = state.recent.len();
    let skip = len.saturating_sub(limit);
    state.recent.iter().skip(skip).cloned().collect()
}

/// Counts over the trailing `minutes` window of the buffer
pub(super) fn events_in_range(
    state: &AggregateState,
    minutes: u32,
    now: DateTime<Utc>,
) -> RangeStats {
    let since = now - Duration::minutes(i64::from(minutes));

    let mut stats = RangeStats {
        window_minutes: u64::from(minutes),
        ..Default::default()
    };

    for record in state.recent.iter() {
        if record.timestamp < since {
            continue;
        }
        stats.total_events += 1;
        match record.kind {
            EventKind::Message => stats.messages += 1,
            EventKind::Notice => stats.notices += 1,
            EventKind::Request => stats.requests += 1,
        }
        *stats.by_platform.entry(record.platform.clone()).or_insert(0) += 1;
    }

    stats
}

/// Per-minute event counts for the last `minutes` buckets
///
/// Buckets cover `[start, start + 1min)` and include the current, partial
/// minute. Keys are local wall-clock `HH:MM`; when the lookback window spans
/// a day boundary, buckets from different days that share a clock time merge
/// their counts under one key.
pub(super) fn events_per_minute(
    state: &AggregateState,
    minutes: u32,
    now: DateTime<Utc>,
) -> HashMap<String, u64> {
    let mut result = HashMap::new();

    for i in 0..i64::from(minutes) {
        let target = now - Duration::minutes(i);
        let bucket_start = target
            .duration_trunc(Duration::minutes(1))
            .unwrap_or(target);
        let bucket_end = bucket_start + Duration::minutes(1);

        let count = state
            .recent
            .iter()
            .filter(|r| r.timestamp >= bucket_start && r.timestamp < bucket_end)
            .count() as u64;

        let key = target.with_timezone(&Local).format("%H:%M").to_string();
        *result.entry(key).or_insert(0) += count;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RecencyBuffer;
    use crate::types::NewEvent;

    fn state_with(records: Vec<EventRecord>) -> AggregateState {
        let mut state = AggregateState::default();
        for record in records {
            state.counters.increment(record.kind, &record.platform);
            state.recent.push(record);
        }
        state
    }

    fn record_at(kind: EventKind, platform: &str, timestamp: DateTime<Utc>) -> EventRecord {
        EventRecord::from_input(NewEvent::new(kind).with_platform(platform), timestamp)
    }

    #[test]
    fn test_totals_sum() {
        let now = Utc::now();
        let state = state_with(vec![
            record_at(EventKind::Message, "a", now),
            record_at(EventKind::Message, "a", now),
            record_at(EventKind::Notice, "b", now),
        ]);

        let totals = totals(&state);
        assert_eq!(totals.total_messages, 2);
        assert_eq!(totals.total_notices, 1);
        assert_eq!(totals.total_requests, 0);
        assert_eq!(totals.total_events, 3);
    }

    #[test]
    fn test_recent_events_limit() {
        let now = Utc::now();
        let state = state_with(
            (0..5)
                .map(|_| record_at(EventKind::Message, "a", now))
                .collect(),
        );

        assert_eq!(recent_events(&state, 3).len(), 3);
        assert_eq!(recent_events(&state, 10).len(), 5);
        assert!(recent_events(&state, 0).is_empty());
    }

    #[test]
    fn test_events_in_range_window() {
        let now: DateTime<Utc> = "2025-03-01T12:30:00Z".parse().unwrap();
        let state = state_with(vec![
            record_at(EventKind::Message, "a", now - Duration::minutes(10)),
            record_at(EventKind::Message, "a", now - Duration::minutes(3)),
            record_at(EventKind::Notice, "b", now - Duration::seconds(30)),
        ]);

        let stats = events_in_range(&state, 5, now);
        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.notices, 1);
        assert_eq!(stats.by_platform.get("a"), Some(&1));
        assert_eq!(stats.by_platform.get("b"), Some(&1));
        assert_eq!(stats.window_minutes, 5);
    }

    #[test]
    fn test_events_in_range_monotonic_in_window() {
        let now: DateTime<Utc> = "2025-03-01T12:30:00Z".parse().unwrap();
        let state = state_with(
            (0..10)
                .map(|i| record_at(EventKind::Message, "a", now - Duration::minutes(i)))
                .collect(),
        );

        let mut previous = 0;
        for minutes in [1, 3, 5, 8, 60] {
            let count = events_in_range(&state, minutes, now).total_events;
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn test_events_per_minute_buckets() {
        let now: DateTime<Utc> = "2025-03-01T12:30:40Z".parse().unwrap();
        let state = state_with(vec![
            // current partial minute
            record_at(EventKind::Message, "a", "2025-03-01T12:30:05Z".parse().unwrap()),
            record_at(EventKind::Message, "a", "2025-03-01T12:30:39Z".parse().unwrap()),
            // one minute back
            record_at(EventKind::Notice, "a", "2025-03-01T12:29:59Z".parse().unwrap()),
            // outside a 3-minute lookback
            record_at(EventKind::Message, "a", "2025-03-01T12:27:10Z".parse().unwrap()),
        ]);

        let histogram = events_per_minute(&state, 3, now);
        assert_eq!(histogram.len(), 3);

        let key_now = now.with_timezone(&Local).format("%H:%M").to_string();
        assert_eq!(histogram.get(&key_now), Some(&2));

        let key_prev = (now - Duration::minutes(1))
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        assert_eq!(histogram.get(&key_prev), Some(&1));

        let key_oldest = (now - Duration::minutes(2))
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        assert_eq!(histogram.get(&key_oldest), Some(&0));
    }

    #[test]
    fn test_events_per_minute_zero_window() {
        let state = AggregateState {
            counters: Default::default(),
            recent: RecencyBuffer::new(),
        };
        assert!(events_per_minute(&state, 0, Utc::now()).is_empty());
    }
}
