// ===============================
// src/ledger.rs (order & position ledger)
// ===============================
//
// Bookkeeping order outstanding per sisi + posisi netto ETF.
// - client id monoton mulai dari 1 (hedge ikut counter yang sama)
// - dua working set (bids/asks) insertion-ordered, membership O(1)
// - slot resting (id + harga) per sisi; paling banyak satu per sisi
//
// Invariant: posisi hanya berubah lewat on_fill; slot resting hanya
// dibersihkan lewat on_status/on_error.

use indexmap::IndexSet;
use tracing::debug;

use crate::domain::Side;

#[derive(Debug, Default)]
pub struct OrderLedger {
    next_id: u64,
    bids: IndexSet<u64>,
    asks: IndexSet<u64>,
    bid_id: u64,
    bid_price: i64,
    ask_id: u64,
    ask_price: i64,
    position: i64,
}

impl OrderLedger {
    pub fn new() -> Self {
        OrderLedger { next_id: 1, ..Default::default() }
    }

    pub fn next_order_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Catat order baru: masuk working set sisinya dan jadi resting order
    /// untuk sisi itu. Tidak ada guard terhadap resting id lama yang belum
    /// clear; kebijakan itu milik layer di atas.
    pub fn register(&mut self, id: u64, side: Side, price: i64) {
        match side {
            Side::Bid => {
                self.bids.insert(id);
                self.bid_id = id;
                self.bid_price = price;
            }
            Side::Ask => {
                self.asks.insert(id);
                self.ask_id = id;
                self.ask_price = price;
            }
        }
    }

    /// Fill (parsial/penuh): posisi naik untuk bid, turun untuk ask.
    /// Id tak dikenal = fill untuk order yang sudah dilupakan, diabaikan.
    pub fn on_fill(&mut self, id: u64, volume: i64) {
        if self.bids.contains(&id) {
            self.position += volume;
        } else if self.asks.contains(&id) {
            self.position -= volume;
        } else {
            debug!(id, volume, "fill for unknown order id, ignored");
        }
    }

    /// remaining_volume == 0 berarti order selesai (terisi penuh atau
    /// cancel): kosongkan slot resting jika cocok, buang id dari kedua set.
    pub fn on_status(&mut self, id: u64, _fill_volume: i64, remaining_volume: i64, _fees: i64) {
        if remaining_volume == 0 {
            if id == self.bid_id {
                self.bid_id = 0;
            } else if id == self.ask_id {
                self.ask_id = 0;
            }
            // id cuma ada di salah satu set, tapi remove ganda aman
            self.bids.shift_remove(&id);
            self.asks.shift_remove(&id);
        }
    }

    /// Error exchange untuk order yang masih kita kenal: perlakukan seperti
    /// status dengan remaining 0 agar order gagal keluar dari tracking.
    pub fn on_error(&mut self, id: u64) {
        if id != 0 && self.knows(id) {
            self.on_status(id, 0, 0, 0);
        }
    }

    pub fn knows(&self, id: u64) -> bool {
        self.bids.contains(&id) || self.asks.contains(&id)
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn resting_bid_id(&self) -> u64 { self.bid_id }
    pub fn resting_bid_price(&self) -> i64 { self.bid_price }
    pub fn resting_ask_id(&self) -> u64 { self.ask_id }
    pub fn resting_ask_price(&self) -> i64 { self.ask_price }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_from_one() {
        let mut ledger = OrderLedger::new();
        assert_eq!(ledger.next_order_id(), 1);
        assert_eq!(ledger.next_order_id(), 2);
        assert_eq!(ledger.next_order_id(), 3);
    }

    #[test]
    fn bid_fills_raise_position_ask_fills_lower_it() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        ledger.register(2, Side::Ask, 110);
        assert_eq!(ledger.resting_bid_price(), 100);
        assert_eq!(ledger.resting_ask_price(), 110);

        ledger.on_fill(1, 7);
        assert_eq!(ledger.position(), 7);
        ledger.on_fill(2, 3);
        assert_eq!(ledger.position(), 4);
    }

    #[test]
    fn fill_for_unknown_id_is_a_noop() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        ledger.on_fill(999, 10);
        assert_eq!(ledger.position(), 0);
    }

    #[test]
    fn status_with_remaining_zero_retires_the_order() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        assert_eq!(ledger.resting_bid_id(), 1);

        ledger.on_status(1, 5, 0, -20);
        assert_eq!(ledger.resting_bid_id(), 0);
        assert!(!ledger.knows(1));

        // fill telat untuk id yang sudah dilupakan: tidak mengubah posisi
        ledger.on_fill(1, 5);
        assert_eq!(ledger.position(), 0);
    }

    #[test]
    fn status_with_remaining_volume_keeps_the_order() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Ask, 120);
        ledger.on_status(1, 2, 8, 0);
        assert!(ledger.knows(1));
        assert_eq!(ledger.resting_ask_id(), 1);
    }

    #[test]
    fn status_is_idempotent() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        ledger.on_fill(1, 4);

        ledger.on_status(1, 4, 0, 0);
        let pos_after_first = ledger.position();
        ledger.on_status(1, 4, 0, 0);
        assert_eq!(ledger.position(), pos_after_first);
        assert!(!ledger.knows(1));
        assert_eq!(ledger.resting_bid_id(), 0);
    }

    #[test]
    fn status_only_clears_matching_resting_slot() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        ledger.register(2, Side::Bid, 101); // menimpa slot resting bid
        assert_eq!(ledger.resting_bid_price(), 101);

        // order lama selesai: slot resting milik id 2, jangan disentuh
        ledger.on_status(1, 0, 0, 0);
        assert_eq!(ledger.resting_bid_id(), 2);
        assert!(!ledger.knows(1));
        assert!(ledger.knows(2));
    }

    #[test]
    fn error_forces_cleanup_of_known_order() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Ask, 120);
        ledger.on_error(1);
        assert!(!ledger.knows(1));
        assert_eq!(ledger.resting_ask_id(), 0);
    }

    #[test]
    fn error_with_zero_or_unknown_id_changes_nothing() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);

        ledger.on_error(0);
        ledger.on_error(42);
        assert!(ledger.knows(1));
        assert_eq!(ledger.resting_bid_id(), 1);
    }

    #[test]
    fn position_is_only_mutated_by_fills() {
        let mut ledger = OrderLedger::new();
        ledger.register(1, Side::Bid, 100);
        ledger.on_fill(1, 10);
        ledger.on_status(1, 10, 0, 0);
        ledger.on_error(1);
        assert_eq!(ledger.position(), 10);
    }
}
