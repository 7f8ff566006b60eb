// ===============================
// src/domain.rs
// ===============================
use serde::{Deserialize, Serialize};

/// Kedalaman ladder: exchange melaporkan 5 level terbaik per sisi.
pub const BOOK_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side { Bid, Ask }
impl Side {
    pub fn opposite(&self) -> Side { match self { Side::Bid => Side::Ask, Side::Ask => Side::Bid } }
    pub fn label(&self) -> &'static str { match self { Side::Bid => "bid", Side::Ask => "ask" } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instrument { Etf, Future }
impl Instrument {
    pub fn label(&self) -> &'static str {
        match self { Instrument::Etf => "etf", Instrument::Future => "future" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifespan { FillOrKill, GoodForDay }

/// Satu level harga: (harga dalam sen, volume lot). (0,0) = sentinel level kosong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel { pub price: i64, pub volume: i64 }
impl PriceLevel {
    pub fn is_sentinel(&self) -> bool { self.price == 0 }
}

/// Ladder best-to-worst, selalu BOOK_DEPTH entri (sisanya dipad sentinel).
pub type Ladder = [PriceLevel; BOOK_DEPTH];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookUpdate {
    pub ts_ns: i128,
    pub instrument: Instrument,
    pub sequence: u64,
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

/// Agregat aktivitas perdagangan per level (informational only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeTicks {
    pub ts_ns: i128,
    pub instrument: Instrument,
    pub sequence: u64,
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MdEvent { Book(BookUpdate), Ticks(TradeTicks) }

/// Order utama di leg ETF (dikirim FILL_OR_KILL oleh strategi).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub client_id: u64,
    pub side: Side,
    pub price: i64,
    pub volume: i64,
    pub lifespan: Lifespan,
}

/// Hedge tanpa lifespan: offset langsung di leg future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeRequest {
    pub client_id: u64,
    pub side: Side,
    pub price: i64,
    pub volume: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutboundOrder { Insert(OrderRequest), Hedge(HedgeRequest) }

/// Event balik dari exchange (gateway) ke strategi.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExchangeEvent {
    OrderFilled { client_id: u64, price: i64, volume: i64 },
    OrderStatus { client_id: u64, fill_volume: i64, remaining_volume: i64, fees: i64 },
    HedgeFilled { client_id: u64, price: i64, volume: i64 },
    OrderError { client_id: u64, message: String },
}
impl ExchangeEvent {
    pub fn label(&self) -> &'static str {
        match self {
            ExchangeEvent::OrderFilled { .. } => "filled",
            ExchangeEvent::OrderStatus { .. } => "status",
            ExchangeEvent::HedgeFilled { .. } => "hedge_filled",
            ExchangeEvent::OrderError { .. } => "error",
        }
    }
}

/// Event untuk recorder JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event { Book(BookUpdate), Ticks(TradeTicks), Ord(OutboundOrder), Exec(ExchangeEvent) }
