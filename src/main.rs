// ===============================
// src/main.rs
// ===============================
/*
=============================================================================
Project : arb_bot_rust — ETF/future pairs-arbitrage engine in Rust
Version : 0.3.0

Summary : Streams synchronized two-instrument order books (mock/replay),
          scans every update for cross-instrument arbitrage, submits one
          fill-or-kill primary order plus its hedge per hit, reconciles
          fills/cancels into an order & position ledger, exposes Prometheus
          metrics, and records JSONL events for replay.
=============================================================================
*/
mod books;
mod config;
mod domain;
mod feed;
mod gateway; // mock exchange (fill -> status after delay)
mod ledger;
mod metrics;
mod recorder;
mod scanner;
mod strategy;

use tokio::{
    select,
    sync::{broadcast, mpsc},
    time::Duration,
};
use tracing::{info, warn};

use crate::domain::{Event, ExchangeEvent, MdEvent, OutboundOrder};

#[tokio::main]
async fn main() {
    // ---- Logging ----
    tracing_subscriber::fmt().with_env_filter("info").init();

    // ---- Load config & limits ----
    let (args, limits) = config::load();

    // ---- Metrics ----
    metrics::init();
    tokio::spawn(metrics::serve_metrics(args.metrics_port));

    // ---- Startup info + export config to metrics ----
    info!(
        feed_mode = %args.feed_mode.label(),
        lot_size = limits.lot_size,
        position_limit = limits.position_limit,
        tick_size = limits.tick_size,
        min_bid_tick = limits.min_bid_tick,
        max_ask_tick = limits.max_ask_tick,
        "startup config"
    );
    metrics::CONFIG_FEED_MODE
        .with_label_values(&[args.feed_mode.label()])
        .set(1);
    metrics::CONFIG_POSITION_LIMIT.set(limits.position_limit);
    metrics::CONFIG_TICK_SIZE.set(limits.tick_size);

    // ---- Buses ----
    let (md_tx, _md_rx) = broadcast::channel::<MdEvent>(4096);
    let (out_tx, out_rx) = mpsc::channel::<OutboundOrder>(1024);
    let (exec_tx, exec_rx) = mpsc::channel::<ExchangeEvent>(4096);

    // ---- Recorder (optional) ----
    let (rec_tx, rec_rx) = mpsc::channel::<Event>(8192);
    if let Some(path) = args.record_file.clone() {
        tokio::spawn(recorder::run(rec_rx, path));
    }

    // ---- FEED (Market Data) ----
    match args.feed_mode {
        config::FeedMode::Mock => {
            tokio::spawn(feed::run_mock(md_tx.clone(), limits.clone()));
        }
        config::FeedMode::Replay => match args.replay_file.clone() {
            Some(path) => {
                tokio::spawn(feed::run_replay(md_tx.clone(), path));
            }
            None => {
                warn!("FEED_MODE=replay tanpa REPLAY_FILE, fallback ke mock");
                tokio::spawn(feed::run_mock(md_tx.clone(), limits.clone()));
            }
        },
    }

    // ---- Mock venue ----
    tokio::spawn(gateway::run_venue(out_rx, exec_tx, args.fill_ms));

    // ---- Strategy: satu instance AutoTrader memegang semua state trading ----
    tokio::spawn(strategy::run(md_tx.subscribe(), exec_rx, out_tx, rec_tx.clone()));

    // ---- Heartbeat + record MD ----
    let mut md_rx_metrics = md_tx.subscribe();
    let rec_tx2 = rec_tx.clone();
    let mut update_count: u64 = 0;

    loop {
        select! {
            Ok(ev) = md_rx_metrics.recv() => {
                if matches!(ev, MdEvent::Book(_)) { update_count += 1; }
                let _ = rec_tx2.try_send(match ev {
                    MdEvent::Book(upd) => Event::Book(upd),
                    MdEvent::Ticks(ticks) => Event::Ticks(ticks),
                });
            },
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                info!(book_updates = update_count, position = metrics::POSITION.get(), "heartbeat");
                update_count = 0;
            }
        }
    }
}
