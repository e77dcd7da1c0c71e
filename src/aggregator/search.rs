//! Event search and per-user/per-group rollups
//!
//! Linear scans over the recency buffer. Search walks newest to oldest and
//! stops at the limit; the rollups walk forward once and keep the tail of
//! the matches.

use crate::types::{EventRecord, GroupStats, SearchFilter, UserStats};

use super::AggregateState;

/// How many matching records a rollup returns
const ROLLUP_RECENT_LIMIT: usize = 10;

/// Newest-first filtered scan, stopping once `limit` matches are collected
///
/// A record matches when every provided filter holds. The keyword test is a
/// case-insensitive substring match against `alt_message`, with an absent
/// `alt_message` treated as empty text.
pub(super) fn search(
    state: &AggregateState,
    filter: &SearchFilter,
    limit: usize,
) -> Vec<EventRecord> {
    let keyword = filter.keyword.as_ref().map(|k| k.to_lowercase());
    let mut results = Vec::new();

    for record in state.recent.iter().rev() {
        if results.len() >= limit {
            break;
        }

        if let Some(kind) = filter.kind {
            if record.kind != kind {
                continue;
            }
        }

        if let Some(platform) = &filter.platform {
            if record.platform != *platform {
                continue;
            }
        }

        if let Some(user_id) = &filter.user_id {
            if record.user_id.as_ref() != Some(user_id) {
                continue;
            }
        }

        if let Some(keyword) = &keyword {
            let alt_message = record.alt_message.as_deref().unwrap_or("");
            if !alt_message.to_lowercase().contains(keyword) {
                continue;
            }
        }

        results.push(record.clone());
    }

    results
}

/// Single forward scan accumulating one user's counts, platforms and events
pub(super) fn user_stats(state: &AggregateState, user_id: &str) -> UserStats {
    let mut stats = UserStats {
        user_id: user_id.to_string(),
        ..Default::default()
    };
    let mut matches = Vec::new();

    for record in state.recent.iter() {
        if record.user_id.as_deref() != Some(user_id) {
            continue;
        }

        count_kind(
            record,
            &mut stats.total_messages,
            &mut stats.total_notices,
            &mut stats.total_requests,
        );
        stats.platforms.insert(record.platform.clone());
        matches.push(record.clone());
    }

    stats.total_events = stats.total_messages + stats.total_notices + stats.total_requests;
    stats.recent_events = tail(matches, ROLLUP_RECENT_LIMIT);
    stats
}

/// Single forward scan accumulating one group's counts, platforms,
/// participants and events
pub(super) fn group_stats(state: &AggregateState, group_id: &str) -> GroupStats {
    let mut stats = GroupStats {
        group_id: group_id.to_string(),
        ..Default::default()
    };
    let mut matches = Vec::new();

    for record in state.recent.iter() {
        if record.group_id.as_deref() != Some(group_id) {
            continue;
        }

        count_kind(
            record,
            &mut stats.total_messages,
            &mut stats.total_notices,
            &mut stats.total_requests,
        );
        stats.platforms.insert(record.platform.clone());
        if let Some(user_id) = &record.user_id {
            stats.participants.insert(user_id.clone());
        }
        matches.push(record.clone());
    }

    stats.total_events = stats.total_messages + stats.total_notices + stats.total_requests;
    stats.participant_count = stats.participants.len() as u64;
    stats.recent_events = tail(matches, ROLLUP_RECENT_LIMIT);
    stats
}

fn count_kind(record: &EventRecord, messages: &mut u64, notices: &mut u64, requests: &mut u64) {
    match record.kind {
        crate::types::EventKind::Message => *messages += 1,
        crate::types::EventKind::Notice => *notices += 1,
        crate::types::EventKind::Request => *requests += 1,
    }
}

fn tail(mut matches: Vec<EventRecord>, limit: usize) -> Vec<EventRecord> {
    let skip = matches.len().saturating_sub(limit);
    matches.split_off(skip)
}
