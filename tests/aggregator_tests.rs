//! Integration tests for the event statistics aggregator

use std::sync::Arc;

use event_stats::aggregator::{AggregatorService, RECENT_EVENTS_CAPACITY};
use event_stats::storage::{FileStore, KvStore, MemoryStore, STATS_KEY};
use event_stats::types::{EventKind, NewEvent, SearchFilter};

fn setup_service() -> Arc<AggregatorService> {
    Arc::new(AggregatorService::new(Arc::new(MemoryStore::new())))
}

fn message(platform: &str) -> NewEvent {
    NewEvent::new(EventKind::Message)
        .with_platform(platform)
        .with_detail_type("group")
}

#[test]
fn test_totals_track_ingested_events() {
    let service = setup_service();

    for _ in 0..3 {
        service.ingest(message("A"));
    }
    service.ingest(NewEvent::new(EventKind::Notice).with_platform("B"));

    let totals = service.totals();
    assert_eq!(totals.total_messages, 3);
    assert_eq!(totals.total_notices, 1);
    assert_eq!(totals.total_requests, 0);
    assert_eq!(totals.total_events, 4);
    assert_eq!(
        totals.total_events,
        totals.total_messages + totals.total_notices + totals.total_requests
    );

    let breakdown = service.platform_breakdown();
    assert_eq!(breakdown.messages_by_platform.get("A"), Some(&3));
    assert_eq!(breakdown.messages_by_platform.len(), 1);
    assert_eq!(breakdown.notices_by_platform.get("B"), Some(&1));
}

#[test]
fn test_buffer_evicts_but_totals_keep_counting() {
    let service = setup_service();
    let overflow = 5;

    for n in 0..(RECENT_EVENTS_CAPACITY + overflow) {
        service.ingest(message("A").with_record_id(n.to_string()));
    }

    // totals are lifetime counts, unaffected by eviction
    assert_eq!(
        service.totals().total_messages,
        (RECENT_EVENTS_CAPACITY + overflow) as u64
    );

    // the buffer holds exactly the most recent capacity-many, oldest first
    let recent = service.recent_events(RECENT_EVENTS_CAPACITY * 2);
    assert_eq!(recent.len(), RECENT_EVENTS_CAPACITY);
    assert_eq!(recent[0].record_id.as_deref(), Some(overflow.to_string().as_str()));
    assert_eq!(
        recent.last().unwrap().record_id.as_deref(),
        Some((RECENT_EVENTS_CAPACITY + overflow - 1).to_string().as_str())
    );
}

#[test]
fn test_events_in_range_covers_fresh_events() {
    let service = setup_service();

    service.ingest(message("A"));
    service.ingest(message("B"));
    service.ingest(NewEvent::new(EventKind::Request).with_platform("A"));

    // everything was just ingested, so any window >= 1 minute sees it all
    let stats = service.events_in_range(1);
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.messages, 2);
    assert_eq!(stats.requests, 1);
    assert_eq!(stats.by_platform.get("A"), Some(&2));
    assert_eq!(stats.by_platform.get("B"), Some(&1));
    assert_eq!(stats.window_minutes, 1);

    // a range result is always a subset of the buffer
    let buffered = service.recent_events(RECENT_EVENTS_CAPACITY);
    assert!(stats.total_events <= buffered.len() as u64);
}

#[test]
fn test_histogram_counts_current_minute() {
    let service = setup_service();

    service.ingest(message("A"));
    service.ingest(message("A"));

    let histogram = service.events_per_minute(5);
    assert_eq!(histogram.len(), 5);

    let counted: u64 = histogram.values().sum();
    assert_eq!(counted, 2);
}

#[test]
fn test_unfiltered_search_matches_recent_events() {
    let service = setup_service();

    for n in 0..8 {
        service.ingest(message("A").with_record_id(n.to_string()));
    }

    let mut found = service.search(&SearchFilter::default(), 5);
    found.reverse();

    assert_eq!(found, service.recent_events(5));
}

#[test]
fn test_search_filters_by_keyword_and_user() {
    let service = setup_service();

    service.ingest(
        message("A")
            .with_user("u1")
            .with_alt_message("Deployment finished"),
    );
    service.ingest(
        message("A")
            .with_user("u2")
            .with_alt_message("deployment failed"),
    );
    service.ingest(message("A").with_user("u1").with_alt_message("lunch?"));

    let filter = SearchFilter {
        keyword: Some("deployment".to_string()),
        user_id: Some("u1".to_string()),
        ..Default::default()
    };

    let found = service.search(&filter, 10);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].alt_message.as_deref(), Some("Deployment finished"));
}

#[test]
fn test_user_and_group_rollups() {
    let service = setup_service();

    service.ingest(
        message("qq")
            .with_user("u1")
            .with_group("g1")
            .with_alt_message("hi"),
    );

    let user = service.user_stats("u1");
    assert_eq!(user.total_events, 1);
    assert_eq!(user.total_messages, 1);
    assert_eq!(user.platforms.iter().collect::<Vec<_>>(), vec!["qq"]);
    assert_eq!(user.recent_events.len(), 1);

    let group = service.group_stats("g1");
    assert_eq!(group.total_events, 1);
    assert_eq!(group.participant_count, 1);
    assert!(group.participants.contains("u1"));
}

#[test]
fn test_reset_clears_everything_and_counting_restarts() {
    let service = setup_service();

    for _ in 0..10 {
        service.ingest(message("A").with_user("u1"));
    }
    service.reset();

    assert_eq!(service.totals().total_events, 0);
    assert!(service.platform_breakdown().messages_by_platform.is_empty());
    assert!(service.recent_events(100).is_empty());
    assert_eq!(service.events_in_range(60).total_events, 0);
    assert!(service.search(&SearchFilter::default(), 10).is_empty());
    assert_eq!(service.user_stats("u1").total_events, 0);

    service.ingest(message("A"));
    assert_eq!(service.totals().total_events, 1);
}

#[test]
fn test_state_survives_restart_through_shared_store() {
    let kv: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    let first = AggregatorService::new(kv.clone());
    first.ingest(message("A").with_user("u1").with_alt_message("hello"));
    first.ingest(message("B"));
    first.ingest(NewEvent::new(EventKind::Request).with_platform("A"));
    let totals_before = first.totals();
    let recent_before = first.recent_events(100);
    drop(first);

    let second = AggregatorService::new(kv);
    assert_eq!(second.totals(), totals_before);
    assert_eq!(second.platform_breakdown().messages_by_platform.get("A"), Some(&1));
    // buffer contents and timestamps survive the round trip exactly
    assert_eq!(second.recent_events(100), recent_before);
}

#[test]
fn test_state_survives_restart_on_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("stats");

    let first = AggregatorService::new(Arc::new(FileStore::new(&data_dir)));
    first.ingest(message("qq").with_user("u1"));
    first.ingest(NewEvent::new(EventKind::Notice).with_platform("qq"));
    drop(first);

    let second = AggregatorService::new(Arc::new(FileStore::new(&data_dir)));
    let totals = second.totals();
    assert_eq!(totals.total_messages, 1);
    assert_eq!(totals.total_notices, 1);
    assert_eq!(second.recent_events(10).len(), 2);
}

#[test]
fn test_corrupt_stored_state_falls_back_to_empty() {
    let kv = Arc::new(MemoryStore::new());
    kv.set(STATS_KEY, "{{{ definitely not json").unwrap();

    let service = AggregatorService::new(kv);
    assert_eq!(service.totals().total_events, 0);

    // ingestion still works against the zeroed state
    service.ingest(message("A"));
    assert_eq!(service.totals().total_events, 1);
}

#[test]
fn test_concurrent_queries_during_ingestion() {
    let service = setup_service();

    let writer = {
        let service = service.clone();
        std::thread::spawn(move || {
            for n in 0..200 {
                service.ingest(message("A").with_record_id(n.to_string()));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let totals = service.totals();
                    let buffered = service.recent_events(RECENT_EVENTS_CAPACITY).len() as u64;
                    // counters and buffer always move together
                    assert_eq!(totals.total_events, buffered);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(service.totals().total_messages, 200);
}
