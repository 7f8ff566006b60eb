// ===============================
// src/scanner.rs (arbitrage scanner)
// ===============================
//
// Fungsi murni atas empat ladder terakhir (ETF ask/bid, future ask/bid).
// Gerbang hanya melihat level terbaik (index 0); begitu terbuka, SEMUA
// pasangan 5x5 discan untuk akumulasi volume. Harga yang dilaporkan adalah
// pasangan qualifying TERAKHIR dalam urutan iterasi, bukan yang terbaik —
// perilaku referensi yang dipertahankan apa adanya, jangan "diperbaiki"
// tanpa persetujuan owner.

use crate::domain::{Ladder, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opportunity {
    /// Harga leg ETF (ask terakhir yang qualifying untuk side Bid).
    pub etf_price: i64,
    /// Total volume dari seluruh pasangan qualifying.
    pub volume: i64,
    /// Bid = beli ETF / jual future; Ask = kebalikannya.
    pub side: Side,
    /// Harga hedge di leg future.
    pub fut_price: i64,
}

impl Opportunity {
    pub fn none() -> Self {
        Opportunity { etf_price: 0, volume: 0, side: Side::Bid, fut_price: 0 }
    }

    pub fn exists(&self) -> bool {
        self.etf_price != 0 && self.volume != 0
    }
}

/// Cari cross-trade terbesar yang mungkin antara ETF dan future.
///
/// Sentinel (0,0) tidak pernah dianggap level riil: tidak membuka gerbang,
/// tidak menambah volume, dan tidak menimpa harga yang dilaporkan.
pub fn find_opportunity(
    etf_asks: &Ladder,
    etf_bids: &Ladder,
    fut_asks: &Ladder,
    fut_bids: &Ladder,
) -> Opportunity {
    if !etf_asks[0].is_sentinel() && etf_asks[0].price < fut_bids[0].price {
        // Beli ETF murah, jual future mahal
        let (etf_price, volume, fut_price) = accumulate(etf_asks, fut_bids);
        Opportunity { etf_price, volume, side: Side::Bid, fut_price }
    } else if !fut_asks[0].is_sentinel() && etf_bids[0].price > fut_asks[0].price {
        // Jual ETF mahal, beli future murah
        let (fut_price, volume, etf_price) = accumulate(fut_asks, etf_bids);
        Opportunity { etf_price, volume, side: Side::Ask, fut_price }
    } else {
        Opportunity::none()
    }
}

/// Cross product ask-ladder x bid-ladder: setiap pasangan dengan
/// ask.price < bid.price menambah min(volume) dan menimpa harga terakhir.
/// Mengembalikan (last ask price, total volume, last bid price).
fn accumulate(asks: &Ladder, bids: &Ladder) -> (i64, i64, i64) {
    let mut volume = 0;
    let mut ask_price = 0;
    let mut bid_price = 0;
    for ask in asks {
        if ask.is_sentinel() {
            continue;
        }
        for bid in bids {
            if bid.is_sentinel() {
                continue;
            }
            if ask.price < bid.price {
                volume += ask.volume.min(bid.volume);
                ask_price = ask.price;
                bid_price = bid.price;
            }
        }
    }
    (ask_price, volume, bid_price)
}
