// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Core trading metrics --------
pub static BOOK_UPDATES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("book_updates_total", "order book updates per instrument"),
        &["instrument"],
    )
    .unwrap()
});

pub static OPPORTUNITIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("opportunities_total", "arbitrage opportunities detected (label: side)"),
        &["side"],
    )
    .unwrap()
});

pub static ORDERS: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("orders_total", "primary orders submitted").unwrap());

pub static HEDGES: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("hedges_total", "hedge orders submitted").unwrap());

pub static EXECS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("exchange_events_total", "exchange events (label: kind)"),
        &["kind"],
    )
    .unwrap()
});

pub static POSITION: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("position_lots", "net ETF position (lots)").unwrap());

// ---- Config visibility ----
pub static CONFIG_FEED_MODE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("config_feed_mode", "feed mode (label: mode)"),
        &["mode"],
    )
    .unwrap()
});

pub static CONFIG_POSITION_LIMIT: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("config_position_limit", "configured position limit (lots)").unwrap());

pub static CONFIG_TICK_SIZE: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("config_tick_size", "configured tick size (cents)").unwrap());

pub fn init() {
    // Register all metrics to the custom registry
    for m in [
        REGISTRY.register(Box::new(BOOK_UPDATES.clone())),
        REGISTRY.register(Box::new(OPPORTUNITIES.clone())),
        REGISTRY.register(Box::new(ORDERS.clone())),
        REGISTRY.register(Box::new(HEDGES.clone())),
        REGISTRY.register(Box::new(EXECS.clone())),
        REGISTRY.register(Box::new(POSITION.clone())),
        // Config visibility
        REGISTRY.register(Box::new(CONFIG_FEED_MODE.clone())),
        REGISTRY.register(Box::new(CONFIG_POSITION_LIMIT.clone())),
        REGISTRY.register(Box::new(CONFIG_TICK_SIZE.clone())),
    ] {
        let _ = m;
    }
}

// Encode all metrics in Prometheus text format
fn encode_metrics() -> Vec<u8> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() || buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    buf
}

// Serve one HTTP request (GET / or /metrics) — tiny HTTP 1.1 responder
fn handle_client(mut stream: TcpStream) {
    // Read a bit to consume headers (no full parse)
    let mut _req_buf = [0u8; 1024];
    let _ = stream.read(&mut _req_buf);

    let body = encode_metrics();
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

// Run the metrics server in a dedicated OS thread (keeps Tokio runtime clean)
pub async fn serve_metrics(port: u16) {
    thread::spawn(move || {
        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .unwrap_or_else(|e| panic!("metrics bind {} failed: {}", addr, e));
        eprintln!("metrics listening on http://{addr}/ (and /metrics)");

        for conn in listener.incoming() {
            match conn {
                Ok(stream) => handle_client(stream),
                Err(e) => eprintln!("metrics accept error: {}", e),
            }
        }
    });
}
