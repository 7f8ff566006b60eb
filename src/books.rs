// ===============================
// src/books.rs (BookSnapshot store)
// ===============================
//
// Menyimpan ladder bid/ask terakhir per instrument (ETF & future).
// Setiap update mengganti snapshot utuh (last-write-wins); ladder pendek
// dipad dengan sentinel (0,0) sampai BOOK_DEPTH. Sequence number disimpan
// untuk visibilitas saja — deteksi gap urusan layer feed.

use crate::domain::{BookUpdate, Instrument, Ladder, PriceLevel};

#[derive(Debug, Clone, Default)]
pub struct BookSnapshot {
    pub sequence: u64,
    pub bids: Ladder,
    pub asks: Ladder,
}

#[derive(Debug, Clone, Default)]
pub struct BookStore {
    etf: BookSnapshot,
    future: BookSnapshot,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ganti snapshot instrument terkait secara utuh. Tidak ada validasi
    /// urutan sequence di sini; caller (feed) yang menjamin.
    pub fn apply(&mut self, upd: &BookUpdate) {
        let snap = match upd.instrument {
            Instrument::Etf => &mut self.etf,
            Instrument::Future => &mut self.future,
        };
        snap.sequence = upd.sequence;
        snap.asks = pad(&upd.asks);
        snap.bids = pad(&upd.bids);
    }

    pub fn etf(&self) -> &BookSnapshot { &self.etf }
    pub fn future(&self) -> &BookSnapshot { &self.future }
}

/// Ambil maksimal BOOK_DEPTH level; sisanya sentinel (0,0).
fn pad(levels: &[PriceLevel]) -> Ladder {
    let mut out = Ladder::default();
    for (slot, lvl) in out.iter_mut().zip(levels.iter()) {
        *slot = *lvl;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BOOK_DEPTH;

    fn upd(instrument: Instrument, sequence: u64, asks: &[(i64, i64)], bids: &[(i64, i64)]) -> BookUpdate {
        BookUpdate {
            ts_ns: 0,
            instrument,
            sequence,
            asks: asks.iter().map(|&(price, volume)| PriceLevel { price, volume }).collect(),
            bids: bids.iter().map(|&(price, volume)| PriceLevel { price, volume }).collect(),
        }
    }

    #[test]
    fn short_ladders_are_padded_with_sentinels() {
        let mut store = BookStore::new();
        store.apply(&upd(Instrument::Etf, 1, &[(100, 5)], &[(99, 7), (98, 2)]));

        let etf = store.etf();
        assert_eq!(etf.asks[0], PriceLevel { price: 100, volume: 5 });
        for lvl in &etf.asks[1..] {
            assert!(lvl.is_sentinel());
        }
        assert_eq!(etf.bids[1], PriceLevel { price: 98, volume: 2 });
        for lvl in &etf.bids[2..] {
            assert!(lvl.is_sentinel());
        }
    }

    #[test]
    fn update_replaces_wholesale_not_merged() {
        let mut store = BookStore::new();
        store.apply(&upd(
            Instrument::Future,
            1,
            &[(200, 1), (201, 1), (202, 1), (203, 1), (204, 1)],
            &[(199, 1)],
        ));
        store.apply(&upd(Instrument::Future, 2, &[(205, 9)], &[]));

        let fut = store.future();
        assert_eq!(fut.sequence, 2);
        assert_eq!(fut.asks[0], PriceLevel { price: 205, volume: 9 });
        // level lama tidak boleh tersisa
        for lvl in &fut.asks[1..] {
            assert!(lvl.is_sentinel());
        }
        for lvl in &fut.bids {
            assert!(lvl.is_sentinel());
        }
    }

    #[test]
    fn instruments_are_independent() {
        let mut store = BookStore::new();
        store.apply(&upd(Instrument::Etf, 7, &[(100, 5)], &[(99, 5)]));
        store.apply(&upd(Instrument::Future, 3, &[(102, 4)], &[(101, 4)]));

        assert_eq!(store.etf().sequence, 7);
        assert_eq!(store.future().sequence, 3);
        assert_eq!(store.etf().asks[0].price, 100);
        assert_eq!(store.future().bids[0].price, 101);
    }

    #[test]
    fn extra_levels_beyond_depth_are_dropped() {
        let six: Vec<(i64, i64)> = (0..6).map(|i| (100 + i, 1)).collect();
        let mut store = BookStore::new();
        store.apply(&upd(Instrument::Etf, 1, &six, &[]));
        assert_eq!(store.etf().asks.len(), BOOK_DEPTH);
        assert_eq!(store.etf().asks[BOOK_DEPTH - 1].price, 104);
    }
}
