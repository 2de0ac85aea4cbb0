//! Two-leg arbitrage intent tracking: a `TRADE` allocates an arb id and
//! fires one `NEW` order per leg; `FILL`s are attributed back to their arb
//! by order id and accumulated until both legs are fully filled, at which
//! point the realized spread and P&L are logged.

use crate::arb_log::ArbLog;
use crate::wire::{self, FillMsg, TradeMsg};
use std::collections::HashMap;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::UdpSocket;

const FILL_EPSILON: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown venue {0:?}")]
    UnknownVenue(String),
    #[error("invalid leg side {0:?}, expected BUY or SELL")]
    InvalidSide(String),
    #[error("failed to send order: {0}")]
    SendFailed(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegKey {
    A,
    B,
}

#[derive(Debug, Clone)]
struct LegState {
    exch: String,
    side: String,
    target_qty: f64,
    filled_qty: f64,
    weighted_price_sum: f64,
}

impl LegState {
    fn avg_price(&self) -> f64 {
        self.weighted_price_sum / self.filled_qty.max(1e-12)
    }

    fn is_filled(&self) -> bool {
        self.filled_qty + FILL_EPSILON >= self.target_qty
    }
}

#[derive(Debug, Clone)]
struct ArbState {
    legs: HashMap<LegKey, LegState>,
    closed: bool,
}

pub struct TradeBridge {
    client_id: String,
    routes: HashMap<String, SocketAddr>,
    order_sock: UdpSocket,

    next_arb_id: u64,
    next_order_id: u64,
    order_to_arb: HashMap<(String, u64), (u64, LegKey)>,
    arbs: HashMap<u64, ArbState>,

    arb_log: ArbLog,
}

/// Outcome of a single finalized arbitrage, reported for logging by the
/// caller (kept separate from the CSV write so the bridge's state machine
/// stays testable without a filesystem).
pub struct CompletedArb {
    pub arb_id: u64,
    pub size: f64,
    pub buy_px: f64,
    pub sell_px: f64,
    pub spread_realized: f64,
    pub pnl: f64,
}

impl TradeBridge {
    pub fn new(client_id: String, routes: HashMap<String, SocketAddr>, order_sock: UdpSocket, arb_log: ArbLog) -> Self {
        Self {
            client_id,
            routes,
            order_sock,
            next_arb_id: 1,
            next_order_id: 1,
            order_to_arb: HashMap::new(),
            arbs: HashMap::new(),
            arb_log,
        }
    }

    /// Allocates an arb id for a two-leg intent and sends one `NEW` order
    /// per leg. Returns the allocated arb id.
    pub async fn handle_trade(&mut self, trade: &TradeMsg) -> u64 {
        let arb_id = self.next_arb_id;
        self.next_arb_id += 1;

        let leg_a = LegState {
            exch: trade.leg_a_exch.clone(),
            side: trade.leg_a_side.clone(),
            target_qty: trade.size,
            filled_qty: 0.0,
            weighted_price_sum: 0.0,
        };
        let leg_b = LegState {
            exch: trade.leg_b_exch.clone(),
            side: trade.leg_b_side.clone(),
            target_qty: trade.size,
            filled_qty: 0.0,
            weighted_price_sum: 0.0,
        };

        tracing::info!(
            arb_id,
            leg_a = %format!("{} {} @ {}", trade.leg_a_exch, trade.leg_a_side, trade.leg_a_price),
            leg_b = %format!("{} {} @ {}", trade.leg_b_exch, trade.leg_b_side, trade.leg_b_price),
            size = trade.size,
            "new arb intent"
        );

        for (leg_key, leg, price) in [(LegKey::A, &leg_a, trade.leg_a_price), (LegKey::B, &leg_b, trade.leg_b_price)] {
            if let Err(err) = self.send_leg_order(arb_id, leg_key, leg, price, trade.size).await {
                tracing::warn!(arb_id, ?leg_key, %err, "dropping leg order");
            }
        }

        self.arbs.insert(
            arb_id,
            ArbState {
                legs: HashMap::from([(LegKey::A, leg_a), (LegKey::B, leg_b)]),
                closed: false,
            },
        );

        arb_id
    }

    async fn send_leg_order(&mut self, arb_id: u64, leg_key: LegKey, leg: &LegState, price: f64, qty: f64) -> Result<(), BridgeError> {
        let exch = leg.exch.to_ascii_uppercase();
        let addr = *self.routes.get(&exch).ok_or_else(|| BridgeError::UnknownVenue(exch.clone()))?;

        let side_char = match leg.side.as_str() {
            "BUY" => 'B',
            "SELL" => 'S',
            other => return Err(BridgeError::InvalidSide(other.to_string())),
        };

        let order_id = self.next_order_id;
        self.next_order_id += 1;

        let msg = wire::format_new_limit(&self.client_id, order_id, side_char, price, qty);
        self.order_sock.send_to(msg.as_bytes(), addr).await?;

        self.order_to_arb.insert((exch.clone(), order_id), (arb_id, leg_key));
        tracing::info!(arb_id, %exch, order_id, ?leg_key, side_char, price, qty, "sent leg order");
        Ok(())
    }

    /// Attributes a fill to zero, one, or two open arbs (a fill can be both
    /// our taker leg and our maker leg at once against background flow
    /// that happens to also route through us). Returns any arbs that
    /// became fully filled as a result.
    pub fn handle_fill(&mut self, fill: &FillMsg) -> Vec<CompletedArb> {
        let mut candidates = Vec::new();
        if fill.taker_client == self.client_id {
            candidates.push(fill.taker_oid);
        }
        if fill.maker_client == self.client_id {
            candidates.push(fill.maker_oid);
        }
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut completed = Vec::new();
        for oid in candidates {
            let key = (fill.exch_id.clone(), oid);
            let Some(&(arb_id, leg_key)) = self.order_to_arb.get(&key) else {
                tracing::warn!(exch_id = %fill.exch_id, oid, "fill for unknown order");
                continue;
            };

            let Some(arb) = self.arbs.get_mut(&arb_id) else {
                continue;
            };
            if arb.closed {
                continue;
            }

            let leg = arb.legs.get_mut(&leg_key).expect("leg key always present");
            leg.filled_qty += fill.qty;
            leg.weighted_price_sum += fill.price * fill.qty;

            tracing::info!(
                arb_id,
                ?leg_key,
                exch_id = %fill.exch_id,
                px = fill.price,
                qty = fill.qty,
                filled = leg.filled_qty,
                avg_px = leg.avg_price(),
                "fill applied"
            );

            if let Some(done) = self.maybe_finalize(arb_id) {
                completed.push(done);
            }
        }
        completed
    }

    fn maybe_finalize(&mut self, arb_id: u64) -> Option<CompletedArb> {
        let arb = self.arbs.get_mut(&arb_id)?;
        if arb.closed {
            return None;
        }

        let leg_a = arb.legs.get(&LegKey::A).expect("leg A always present");
        let leg_b = arb.legs.get(&LegKey::B).expect("leg B always present");
        if !leg_a.is_filled() || !leg_b.is_filled() {
            return None;
        }

        let avg_a = leg_a.avg_price();
        let avg_b = leg_b.avg_price();
        let (buy_px, sell_px) = if leg_a.side == "BUY" { (avg_a, avg_b) } else { (avg_b, avg_a) };

        let size = leg_a.filled_qty.min(leg_b.filled_qty);
        let spread_realized = sell_px - buy_px;
        let pnl = spread_realized * size;

        arb.closed = true;

        tracing::info!(arb_id, size, buy_px, sell_px, spread_realized, pnl, "arb done");

        Some(CompletedArb { arb_id, size, buy_px, sell_px, spread_realized, pnl })
    }

    pub fn record_completed_arb(&mut self, done: &CompletedArb) {
        if let Err(err) = self.arb_log.record_completed_arb(done.arb_id, done.size, done.buy_px, done.sell_px, done.spread_realized, done.pnl) {
            tracing::warn!(arb_id = done.arb_id, %err, "failed to write arb log row");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::FillMsg;
    use std::net::SocketAddr;

    async fn bridge_with_routes(arb_log_path: &str) -> TradeBridge {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut routes = HashMap::new();
        routes.insert("EXA".to_string(), "127.0.0.1:1".parse::<SocketAddr>().unwrap());
        routes.insert("EXB".to_string(), "127.0.0.1:2".parse::<SocketAddr>().unwrap());
        let arb_log = ArbLog::open(arb_log_path).unwrap();
        TradeBridge::new("PT".to_string(), routes, sock, arb_log)
    }

    fn fill(exch: &str, price: f64, qty: f64, taker_client: &str, taker_oid: u64, maker_client: &str, maker_oid: u64) -> FillMsg {
        FillMsg {
            exch_id: exch.to_string(),
            symbol: "BTCUSD".to_string(),
            price,
            qty,
            taker_client: taker_client.to_string(),
            taker_oid,
            maker_client: maker_client.to_string(),
            maker_oid,
        }
    }

    #[tokio::test]
    async fn full_reconciliation_produces_completed_arb() {
        let path = std::env::temp_dir().join("trade_bridge_test_full.csv");
        let path = path.to_str().unwrap();
        let mut bridge = bridge_with_routes(path).await;

        let trade = TradeMsg {
            strategy_id: "S1".into(),
            leg_a_exch: "EXA".into(),
            leg_a_side: "BUY".into(),
            leg_a_price: 100.0,
            leg_b_exch: "EXB".into(),
            leg_b_side: "SELL".into(),
            leg_b_price: 100.5,
            size: 1.0,
            spread: 0.5,
        };
        let arb_id = bridge.handle_trade(&trade).await;
        assert_eq!(arb_id, 1);

        // order_to_arb[("EXA", 1)] = (1, A), order_to_arb[("EXB", 2)] = (1, B)
        let completed_a = bridge.handle_fill(&fill("EXA", 100.0, 1.0, "PT", 1, "BG_EXA", 99));
        assert!(completed_a.is_empty(), "only one leg filled so far");

        let completed_b = bridge.handle_fill(&fill("EXB", 100.5, 1.0, "BG_EXB", 98, "PT", 2));
        assert_eq!(completed_b.len(), 1);
        let done = &completed_b[0];
        assert_eq!(done.arb_id, 1);
        assert!((done.buy_px - 100.0).abs() < 1e-9);
        assert!((done.sell_px - 100.5).abs() < 1e-9);
        assert!((done.pnl - 0.5).abs() < 1e-9);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn fill_for_unknown_order_is_ignored() {
        let path = std::env::temp_dir().join("trade_bridge_test_unknown.csv");
        let path = path.to_str().unwrap();
        let mut bridge = bridge_with_routes(path).await;
        let completed = bridge.handle_fill(&fill("EXA", 100.0, 1.0, "PT", 999, "BG_EXA", 1));
        assert!(completed.is_empty());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn closed_arb_does_not_refinalize() {
        let path = std::env::temp_dir().join("trade_bridge_test_closed.csv");
        let path = path.to_str().unwrap();
        let mut bridge = bridge_with_routes(path).await;

        let trade = TradeMsg {
            strategy_id: "S1".into(),
            leg_a_exch: "EXA".into(),
            leg_a_side: "BUY".into(),
            leg_a_price: 100.0,
            leg_b_exch: "EXB".into(),
            leg_b_side: "SELL".into(),
            leg_b_price: 100.5,
            size: 1.0,
            spread: 0.5,
        };
        bridge.handle_trade(&trade).await;
        bridge.handle_fill(&fill("EXA", 100.0, 1.0, "PT", 1, "BG_EXA", 99));
        let first = bridge.handle_fill(&fill("EXB", 100.5, 1.0, "BG_EXB", 98, "PT", 2));
        assert_eq!(first.len(), 1);

        // a stray extra fill against the same, now-closed arb must not re-finalize.
        let second = bridge.handle_fill(&fill("EXB", 100.5, 1.0, "BG_EXB", 97, "PT", 2));
        assert!(second.is_empty());

        std::fs::remove_file(path).ok();
    }
}
