//! Event Statistics Aggregator - Binary Entry Point
//!
//! Reads newline-delimited JSON event payloads from stdin (the adapter
//! boundary), feeds them to the aggregator, and logs a totals summary on
//! shutdown.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use event_stats::aggregator::AggregatorService;
use event_stats::feed::{parse_line, run_feed};
use event_stats::storage::FileStore;

#[tokio::main]
async fn main() {
    env_logger::init();

    let store = FileStore::from_env();
    log::info!(
        "event statistics aggregator started (data dir: {})",
        store.data_dir().display()
    );

    let service = Arc::new(AggregatorService::new(Arc::new(store)));

    let (tx, rx) = mpsc::channel(256);
    let feed = tokio::spawn(run_feed(service.clone(), rx));

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(event) = parse_line(&line) {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        // dropping tx closes the feed
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutdown requested");
            reader.abort();
        }
        _ = feed => {}
    }

    let totals = service.totals();
    log::info!(
        "final totals: {} messages, {} notices, {} requests ({} events)",
        totals.total_messages,
        totals.total_notices,
        totals.total_requests,
        totals.total_events
    );
}
