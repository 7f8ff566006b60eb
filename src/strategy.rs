// ===============================
// src/strategy.rs (pairs-arbitrage controller)
// ===============================
//
// Satu instance AutoTrader memiliki seluruh state trading (book store +
// ledger) dan dijalankan oleh satu task; semua event diproses tuntas sesuai
// urutan tiba, jadi tidak perlu lock. Setiap book update: simpan ladder,
// scan peluang, dan kalau ada — satu order FILL_OR_KILL di leg ETF plus
// satu hedge di leg future. Event fill/status/error hanya mengubah ledger,
// tidak pernah memicu scan baru.

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use crate::books::BookStore;
use crate::domain::{
    BookUpdate, Event, ExchangeEvent, HedgeRequest, Lifespan, MdEvent, OrderRequest,
    OutboundOrder, Side, TradeTicks,
};
use crate::ledger::OrderLedger;
use crate::metrics::{BOOK_UPDATES, HEDGES, OPPORTUNITIES, ORDERS, POSITION};
use crate::scanner;

pub struct AutoTrader {
    books: BookStore,
    ledger: OrderLedger,
}

impl AutoTrader {
    pub fn new() -> Self {
        AutoTrader { books: BookStore::new(), ledger: OrderLedger::new() }
    }

    /// Book update masuk: ganti snapshot, lalu scan dengan state terakhir
    /// KEDUA instrument (yang satu baru, yang lain last known). Kalau ada
    /// peluang, alokasikan id, daftarkan sebagai resting order, dan
    /// kembalikan tepat satu order utama + satu hedge.
    pub fn on_book_update(&mut self, upd: &BookUpdate) -> Option<(OrderRequest, HedgeRequest)> {
        self.books.apply(upd);

        let etf = self.books.etf();
        let fut = self.books.future();
        let opp = scanner::find_opportunity(&etf.asks, &etf.bids, &fut.asks, &fut.bids);
        if !opp.exists() {
            return None;
        }

        info!(
            side = opp.side.label(),
            etf_price = opp.etf_price,
            fut_price = opp.fut_price,
            volume = opp.volume,
            "opportunity"
        );

        let id = self.ledger.next_order_id();
        self.ledger.register(id, opp.side, opp.etf_price);
        let hedge_id = self.ledger.next_order_id();

        let order = OrderRequest {
            client_id: id,
            side: opp.side,
            price: opp.etf_price,
            volume: opp.volume,
            lifespan: Lifespan::FillOrKill,
        };
        let hedge = HedgeRequest {
            client_id: hedge_id,
            side: opp.side.opposite(),
            price: opp.fut_price,
            volume: opp.volume,
        };
        Some((order, hedge))
    }

    pub fn on_order_filled(&mut self, client_id: u64, price: i64, volume: i64) {
        info!(client_id, price, volume, "order filled");
        self.ledger.on_fill(client_id, volume);
    }

    pub fn on_order_status(&mut self, client_id: u64, fill_volume: i64, remaining_volume: i64, fees: i64) {
        info!(client_id, fill_volume, remaining_volume, fees, "order status");
        self.ledger.on_status(client_id, fill_volume, remaining_volume, fees);
    }

    /// Error dari exchange: log, lalu paksa order yang masih dikenal keluar
    /// dari tracking. Tidak ada retry.
    pub fn on_error(&mut self, client_id: u64, message: &str) {
        warn!(client_id, message, "error from exchange");
        self.ledger.on_error(client_id);
    }

    /// Hedge fill hanya informasi; tidak ada state yang berubah.
    pub fn on_hedge_filled(&self, client_id: u64, price: i64, volume: i64) {
        info!(client_id, price, volume, "hedge filled");
    }

    pub fn on_trade_ticks(&self, ticks: &TradeTicks) {
        info!(instrument = ticks.instrument.label(), sequence = ticks.sequence, "trade ticks");
    }

    pub fn position(&self) -> i64 {
        self.ledger.position()
    }
}

pub async fn run(
    mut md_rx: broadcast::Receiver<MdEvent>,
    mut exec_rx: mpsc::Receiver<ExchangeEvent>,
    out_tx: mpsc::Sender<OutboundOrder>,
    rec_tx: mpsc::Sender<Event>,
) {
    let mut trader = AutoTrader::new();
    loop {
        tokio::select! {
            res = md_rx.recv() => match res {
                Ok(MdEvent::Book(upd)) => {
                    BOOK_UPDATES.with_label_values(&[upd.instrument.label()]).inc();
                    if let Some((order, hedge)) = trader.on_book_update(&upd) {
                        OPPORTUNITIES.with_label_values(&[order.side.label()]).inc();

                        // rekam hanya yang benar-benar sampai ke venue
                        if let Err(e) = out_tx.send(OutboundOrder::Insert(order.clone())).await {
                            error!(?e, "order send failed");
                        } else {
                            ORDERS.inc();
                            let _ = rec_tx.try_send(Event::Ord(OutboundOrder::Insert(order)));
                        }

                        if let Err(e) = out_tx.send(OutboundOrder::Hedge(hedge.clone())).await {
                            error!(?e, "hedge send failed");
                        } else {
                            HEDGES.inc();
                            let _ = rec_tx.try_send(Event::Ord(OutboundOrder::Hedge(hedge)));
                        }
                    }
                }
                Ok(MdEvent::Ticks(ticks)) => trader.on_trade_ticks(&ticks),
                // ketinggalan update tidak fatal: snapshot berikutnya
                // mengganti ladder secara utuh, lanjut terima
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "md channel lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!("md channel closed");
                    break;
                }
            },
            Some(ev) = exec_rx.recv() => {
                let _ = rec_tx.try_send(Event::Exec(ev.clone()));
                match ev {
                    ExchangeEvent::OrderFilled { client_id, price, volume } => {
                        trader.on_order_filled(client_id, price, volume);
                    }
                    ExchangeEvent::OrderStatus { client_id, fill_volume, remaining_volume, fees } => {
                        trader.on_order_status(client_id, fill_volume, remaining_volume, fees);
                    }
                    ExchangeEvent::HedgeFilled { client_id, price, volume } => {
                        trader.on_hedge_filled(client_id, price, volume);
                    }
                    ExchangeEvent::OrderError { client_id, message } => {
                        trader.on_error(client_id, &message);
                    }
                }
                POSITION.set(trader.position());
            },
        }
    }
}
