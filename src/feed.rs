//! Adapter event feed
//!
//! Events arrive from the messaging adapter over an mpsc channel and are
//! handled by a single consumer task, one at a time, in arrival order. The
//! feed is the only ingestion path, which keeps the whole ingest sequence
//! serialized end to end.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::aggregator::AggregatorService;
use crate::types::InboundEvent;

/// Parse one newline-delimited JSON payload
///
/// Empty lines yield `None` silently; a line that does not parse as any
/// known payload is logged and skipped. Nothing here can fail the feed.
pub fn parse_line(line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("skipping malformed event payload: {}", e);
            None
        }
    }
}

/// Consume adapter events until the channel closes
pub async fn run_feed(service: Arc<AggregatorService>, mut events: mpsc::Receiver<InboundEvent>) {
    while let Some(event) = events.recv().await {
        service.ingest_event(event);
    }
    log::info!("adapter feed closed");
}
