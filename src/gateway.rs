// ===============================
// src/gateway.rs (mock exchange)
// ===============================
//
// Simulasi exchange untuk mode mock/replay:
// - order utama (FILL_OR_KILL) -> OrderFilled penuh lalu OrderStatus
//   remaining 0 setelah delay fill_ms
// - hedge -> HedgeFilled
// Lifespan ditegakkan oleh exchange, bukan core; mock ini cukup mengisi
// penuh dan langsung menutup order.

use tokio::{sync::mpsc, time::{sleep, Duration}};
use tracing::debug;

use crate::domain::{ExchangeEvent, OutboundOrder};
use crate::metrics::EXECS;

pub async fn run_venue(
    mut rx: mpsc::Receiver<OutboundOrder>,
    exec_tx: mpsc::Sender<ExchangeEvent>,
    fill_ms: u64,
) {
    while let Some(out) = rx.recv().await {
        sleep(Duration::from_millis(fill_ms)).await;

        match out {
            OutboundOrder::Insert(o) => {
                debug!(client_id = o.client_id, side = o.side.label(), px = o.price, vol = o.volume, "venue insert");

                let fill = ExchangeEvent::OrderFilled {
                    client_id: o.client_id,
                    price: o.price,
                    volume: o.volume,
                };
                EXECS.with_label_values(&[fill.label()]).inc();
                let _ = exec_tx.send(fill).await;

                let status = ExchangeEvent::OrderStatus {
                    client_id: o.client_id,
                    fill_volume: o.volume,
                    remaining_volume: 0,
                    fees: 0,
                };
                EXECS.with_label_values(&[status.label()]).inc();
                let _ = exec_tx.send(status).await;
            }
            OutboundOrder::Hedge(h) => {
                debug!(client_id = h.client_id, side = h.side.label(), px = h.price, vol = h.volume, "venue hedge");

                let fill = ExchangeEvent::HedgeFilled {
                    client_id: h.client_id,
                    price: h.price,
                    volume: h.volume,
                };
                EXECS.with_label_values(&[fill.label()]).inc();
                let _ = exec_tx.send(fill).await;
            }
        }
    }
}
