// ===============================
// src/feed.rs
// ===============================
//
// Market data adapters:
// - run_mock   : simulator dua instrument (ETF + future) ~100 update/s per
//                instrument; mid future random-walk, ETF menempel dengan
//                offset yang sesekali terdislokasi supaya scanner terpicu
// - run_replay : putar ulang book update dari file JSONL hasil recorder
//
// Catatan skala: harga dalam sen, selalu kelipatan tick_size, dan dijaga
// di dalam band [min_bid_tick, max_ask_tick] dari config.

use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Limits;
use crate::domain::{BookUpdate, Event, Instrument, MdEvent, PriceLevel, TradeTicks, BOOK_DEPTH};

/// Simulator pasangan ETF/future. Sequence number per instrument.
pub async fn run_mock(md_tx: broadcast::Sender<MdEvent>, limits: Limits) {
    let tick = limits.tick_size;
    let mut fut_mid: i64 = 1_500 * tick;
    let mut offset: i64 = 0; // etf_mid - fut_mid
    let mut etf_seq: u64 = 0;
    let mut fut_seq: u64 = 0;
    let mut ticks_seq: u64 = 0;
    let mut iter: u64 = 0;

    loop {
        // jangan simpan ThreadRng melewati .await
        {
            let mut rng = rand::thread_rng();
            fut_mid = (fut_mid + tick * rng.gen_range(-1..=1))
                .clamp(limits.min_bid_tick + 10 * tick, limits.max_ask_tick - 10 * tick);
            offset += tick * rng.gen_range(-1..=1);
            // sesekali dislokasi besar: ETF jatuh di bawah bid future
            if rng.gen_ratio(1, 97) {
                offset -= 3 * tick;
            }
            offset = offset.clamp(-5 * tick, 5 * tick);
        }
        let etf_mid = fut_mid + offset;

        fut_seq += 1;
        let _ = md_tx.send(MdEvent::Book(book_around(Instrument::Future, fut_seq, fut_mid, &limits)));
        etf_seq += 1;
        let _ = md_tx.send(MdEvent::Book(book_around(Instrument::Etf, etf_seq, etf_mid, &limits)));

        iter += 1;
        if iter % 50 == 0 {
            ticks_seq += 1;
            let book = book_around(Instrument::Etf, ticks_seq, etf_mid, &limits);
            let _ = md_tx.send(MdEvent::Ticks(TradeTicks {
                ts_ns: book.ts_ns,
                instrument: Instrument::Etf,
                sequence: ticks_seq,
                asks: book.asks,
                bids: book.bids,
            }));
        }

        sleep(Duration::from_millis(5)).await;
    }
}

/// Ladder 5 level simetris di sekitar mid, volume kelipatan lot size.
/// Level di luar band harga dibuang (jadi ladder pendek; store yang mem-pad).
fn book_around(instrument: Instrument, sequence: u64, mid: i64, limits: &Limits) -> BookUpdate {
    let tick = limits.tick_size;
    let best_ask = mid / tick * tick + tick;
    let best_bid = best_ask - tick;

    let mut rng = rand::thread_rng();
    let asks: Vec<PriceLevel> = (0..BOOK_DEPTH as i64)
        .map(|i| PriceLevel {
            price: best_ask + i * tick,
            volume: limits.lot_size * rng.gen_range(1..=20),
        })
        .filter(|lvl| lvl.price <= limits.max_ask_tick)
        .collect();
    let bids: Vec<PriceLevel> = (0..BOOK_DEPTH as i64)
        .map(|i| PriceLevel {
            price: best_bid - i * tick,
            volume: limits.lot_size * rng.gen_range(1..=20),
        })
        .filter(|lvl| lvl.price >= limits.min_bid_tick)
        .collect();

    BookUpdate {
        ts_ns: Utc::now().timestamp_nanos_opt().unwrap_or(0) as i128,
        instrument,
        sequence,
        asks,
        bids,
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay io: {0}")]
    Io(#[from] std::io::Error),
    #[error("replay parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Putar ulang file JSONL recorder. Hanya event market data yang dikirim
/// ulang; order/exec yang ikut terekam dilewati.
pub async fn run_replay(md_tx: broadcast::Sender<MdEvent>, path: String) {
    match replay_file(&md_tx, &path).await {
        Ok(count) => info!(%path, count, "replay finished"),
        Err(e) => error!(?e, %path, "replay failed"),
    }
}

async fn replay_file(md_tx: &broadcast::Sender<MdEvent>, path: &str) -> Result<u64, ReplayError> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut count: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(&line)? {
            Event::Book(upd) => {
                if md_tx.send(MdEvent::Book(upd)).is_err() {
                    warn!("no subscribers left, stopping replay");
                    break;
                }
                count += 1;
            }
            Event::Ticks(ticks) => {
                let _ = md_tx.send(MdEvent::Ticks(ticks));
            }
            Event::Ord(_) | Event::Exec(_) => {}
        }
        sleep(Duration::from_millis(5)).await;
    }
    Ok(count)
}
