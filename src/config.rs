// ===============================
// src/config.rs
// ===============================
use std::env;
use dotenvy::dotenv;

/// Sumber market data
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedMode {
    Mock,
    Replay,
}

impl FeedMode {
    pub fn from_env(key: &str, default_mode: FeedMode) -> FeedMode {
        match env::var(key).unwrap_or_default().to_ascii_lowercase().as_str() {
            "mock"   => FeedMode::Mock,
            "replay" => FeedMode::Replay,
            _ => default_mode,
        }
    }

    pub fn label(&self) -> &'static str {
        match self { FeedMode::Mock => "mock", FeedMode::Replay => "replay" }
    }
}

#[derive(Clone, Debug)]
pub struct Args {
    pub feed_mode: FeedMode,
    pub replay_file: Option<String>, // wajib ada jika FEED_MODE=replay

    // files/metrics
    pub record_file: Option<String>,
    pub metrics_port: u16,

    // latency fill mock gateway (ms)
    pub fill_ms: u64,
}

/// Konstanta trading (lihat juga mock feed yang memakai band & tick ini).
/// Scanner/controller sengaja tidak meng-clamp terhadap position_limit.
#[derive(Clone, Debug)]
pub struct Limits {
    pub lot_size: i64,
    pub position_limit: i64,
    pub tick_size: i64,
    pub min_bid_tick: i64,
    pub max_ask_tick: i64,
}

pub fn load() -> (Args, Limits) {
    // Pastikan .env dibaca (RECORD_FILE, FEED_MODE, dll)
    let _ = dotenv();

    let feed_mode = FeedMode::from_env("FEED_MODE", FeedMode::Mock);
    let replay_file = env::var("REPLAY_FILE").ok();

    let record_file  = env::var("RECORD_FILE").ok();
    let metrics_port = env::var("METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9898);
    let fill_ms = env::var("FILL_MS").ok().and_then(|s| s.parse().ok()).unwrap_or(2);

    let args = Args { feed_mode, replay_file, record_file, metrics_port, fill_ms };

    // ===== Limits =====
    let lot_size = env::var("LOT_SIZE").ok().and_then(|x| x.parse().ok()).unwrap_or(10);
    let position_limit = env::var("POSITION_LIMIT")
        .ok()
        .and_then(|x| x.parse().ok())
        .unwrap_or(100);
    let tick_size: i64 = env::var("TICK_SIZE").ok().and_then(|x| x.parse().ok()).unwrap_or(100);

    // Band harga valid, dibulatkan ke tick terdekat (bid naik, ask turun)
    let minimum_bid: i64 = env::var("MINIMUM_BID").ok().and_then(|x| x.parse().ok()).unwrap_or(1);
    let maximum_ask: i64 = env::var("MAXIMUM_ASK")
        .ok()
        .and_then(|x| x.parse().ok())
        .unwrap_or(i32::MAX as i64);
    let min_bid_tick = (minimum_bid + tick_size) / tick_size * tick_size;
    let max_ask_tick = maximum_ask / tick_size * tick_size;

    let limits = Limits { lot_size, position_limit, tick_size, min_bid_tick, max_ask_tick };
    (args, limits)
}
