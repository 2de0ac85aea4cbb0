//! Limit order book with price-time priority matching.
//!
//! Core features:
//! - Price-time priority matching (best price first, then FIFO)
//! - Limit and market orders, with partial fills
//! - Eager cancellation, O(1) dispatch to the owning side via an id index
//! - Tick-grid rounding of incoming limit prices, trades always reported at
//!   the resting maker's price

pub mod types;

pub use types::{BookError, Kind, Order, OrderId, Side, Trade, PRICE_EPSILON, QTY_EPSILON};
pub mod price_levels;
pub use price_levels::PriceLevels;

use std::collections::HashMap;

/// Central limit order book for a single symbol, with separate bid/ask
/// sides. Not thread-safe — callers that need concurrent access wrap it
/// in a lock, the way `exchange-service` did for the teacher's multi-symbol
/// service; this simulator drives one `OrderBook` per venue from a single
/// cooperative loop instead.
pub struct OrderBook {
    pub symbol: String,
    pub tick_size: f64,
    pub bids: PriceLevels,
    pub asks: PriceLevels,
    id_side: HashMap<OrderId, Side>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>, tick_size: f64) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size,
            bids: PriceLevels::new(Side::Bid),
            asks: PriceLevels::new(Side::Ask),
            id_side: HashMap::new(),
        }
    }

    /// Rounds a raw price to the nearest tick and returns it in integer
    /// ticks. Rounding follows round-half-to-even, matching the reference
    /// implementation's `round()` behavior.
    pub fn round_to_ticks(&self, price: f64) -> i64 {
        (price / self.tick_size).round_ties_even() as i64
    }

    /// Admits an order (limit or market), matching immediately against the
    /// opposite side and resting any unfilled limit remainder. Market
    /// orders never rest: once the opposite side empties, any unfilled
    /// market quantity is silently discarded.
    ///
    /// A zero-quantity order is a no-op that returns `Ok(vec![])`. Returns
    /// `BookError::InvalidOrder` for a negative or non-finite quantity, a
    /// symbol mismatch, or (for limit orders) a non-finite price.
    pub fn add_order(&mut self, mut taker: Order) -> Result<Vec<Trade>, BookError> {
        if taker.qty < 0.0 || !taker.qty.is_finite() {
            return Err(BookError::InvalidOrder {
                reason: "quantity must be non-negative and finite",
            });
        }
        if taker.qty == 0.0 {
            return Ok(Vec::new());
        }
        if taker.symbol != self.symbol {
            return Err(BookError::InvalidOrder {
                reason: "symbol does not match this book",
            });
        }
        if taker.kind == Kind::Limit && !taker.px_ticks_valid() {
            return Err(BookError::InvalidOrder {
                reason: "limit price must be finite",
            });
        }

        let ts_ns = taker.ts_ns;
        let mut trades = Vec::new();

        let (own, opp) = match taker.side {
            Side::Bid => (&mut self.bids, &mut self.asks),
            Side::Ask => (&mut self.asks, &mut self.bids),
        };

        while taker.remaining > QTY_EPSILON {
            let Some(best_px) = opp.best_price() else {
                break;
            };

            if taker.kind == Kind::Limit {
                let crosses = match taker.side {
                    Side::Bid => (best_px as f64) <= taker.px_ticks as f64 + PRICE_EPSILON,
                    Side::Ask => (best_px as f64) >= taker.px_ticks as f64 - PRICE_EPSILON,
                };
                if !crosses {
                    break;
                }
            }

            let mut maker = match opp.pop_best() {
                Some(o) => o,
                None => break,
            };
            self.id_side.remove(&maker.id);

            let fill = taker.remaining.min(maker.remaining);
            taker.remaining -= fill;
            maker.remaining -= fill;

            trades.push(Trade {
                symbol: taker.symbol.clone(),
                px_ticks: best_px,
                qty: fill,
                taker: taker.id,
                maker: maker.id,
                taker_client_id: taker.client_id.clone(),
                maker_client_id: maker.client_id.clone(),
                ts_ns,
            });

            if maker.remaining > QTY_EPSILON {
                self.id_side.insert(maker.id, maker.side);
                opp.push_front(maker);
            }
        }

        if taker.kind == Kind::Limit && taker.remaining > QTY_EPSILON {
            self.id_side.insert(taker.id, taker.side);
            own.push(taker);
        }
        // Unfilled market-order remainder is discarded: market orders
        // never rest in the book (reference implementation behavior).

        Ok(trades)
    }

    /// Cancels a resting order by id, wherever it rests. Returns `true` iff
    /// a live order with that id was removed.
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        let Some(side) = self.id_side.remove(&id) else {
            return false;
        };
        match side {
            Side::Bid => self.bids.cancel(id),
            Side::Ask => self.asks.cancel(id),
        }
    }

    /// Best bid/ask price in ticks.
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<i64> {
        self.asks.best_price()
    }

    /// Best bid/ask price paired with the aggregated resting quantity at
    /// that price, or `None` on an empty side.
    pub fn top_of_book(&self) -> (Option<(i64, f64)>, Option<(i64, f64)>) {
        let bid = self.bids.best_price().map(|px| (px, self.bids.best_qty()));
        let ask = self.asks.best_price().map(|px| (px, self.asks.best_qty()));
        (bid, ask)
    }
}
