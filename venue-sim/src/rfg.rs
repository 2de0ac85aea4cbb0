//! Background random order flow: the synthetic participants that keep a
//! venue's book moving even when no real trader is acting on it.

use orderbook::{BookError, Kind, Order, OrderBook, OrderId, Side, Trade};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub struct RandomOrderFlow {
    exch_id: String,
    mid_price: f64,
    volatility: f64,
    order_prob: f64,
    cross_prob: f64,
    min_qty: f64,
    max_qty: f64,
    next_order_id: u64,
    rng: SmallRng,
}

impl RandomOrderFlow {
    pub fn new(exch_id: impl Into<String>, base_price: f64, volatility: f64) -> Self {
        Self::with_probs(exch_id, base_price, volatility, 0.4, 0.2, 0.01, 0.1)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_probs(
        exch_id: impl Into<String>,
        base_price: f64,
        volatility: f64,
        order_prob: f64,
        cross_prob: f64,
        min_qty: f64,
        max_qty: f64,
    ) -> Self {
        Self {
            exch_id: exch_id.into(),
            mid_price: base_price,
            volatility,
            order_prob,
            cross_prob,
            min_qty,
            max_qty,
            next_order_id: 1_000_000_000,
            rng: SmallRng::from_rng(rand::thread_rng()).expect("system RNG is available"),
        }
    }

    fn client_id(&self) -> String {
        format!("BG_{}", self.exch_id)
    }

    fn next_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    /// Advances the synthetic mid by one Gaussian step, then probabilistically
    /// posts a resting limit order and/or crosses the spread with a market
    /// order. Returns any trades produced (background flow can cross
    /// against other background flow, or against a resting real order).
    pub fn step(&mut self, book: &mut OrderBook, now_ns: u128) -> Vec<Trade> {
        let mut trades = Vec::new();

        let normal = Normal::new(0.0, self.volatility.max(1e-12)).expect("volatility is positive");
        self.mid_price += normal.sample(&mut self.rng);
        if self.mid_price <= 0.0 {
            self.mid_price = self.mid_price.abs() + 1.0;
        }

        if self.rng.gen::<f64>() < self.order_prob {
            if let Some(t) = self.post_resting_order(book, now_ns) {
                trades.extend(t);
            }
        }

        if self.rng.gen::<f64>() < self.cross_prob {
            if let Some(t) = self.cross_spread(book, now_ns) {
                trades.extend(t);
            }
        }

        trades
    }

    fn post_resting_order(&mut self, book: &mut OrderBook, now_ns: u128) -> Option<Vec<Trade>> {
        let side = if self.rng.gen_bool(0.5) { Side::Bid } else { Side::Ask };
        let spread_half = 1.5;
        let offset = self.rng.gen::<f64>() * spread_half;
        let price = match side {
            Side::Bid => self.mid_price - offset,
            Side::Ask => self.mid_price + offset,
        };
        let qty = self.rng.gen_range(self.min_qty..=self.max_qty);
        let px_ticks = book.round_to_ticks(price);
        let id = self.next_id();
        let order = Order::new(id, self.client_id(), book.symbol.clone(), side, Kind::Limit, px_ticks, qty, now_ns);
        Self::submit(book, order)
    }

    /// Picks a random target side; if that side has a resting quote, sends
    /// a market order on the *opposite* side to cross it (matching the
    /// reference generator: "cross against the best bid" means sell into
    /// it, not buy alongside it).
    fn cross_spread(&mut self, book: &mut OrderBook, now_ns: u128) -> Option<Vec<Trade>> {
        let target_side = if self.rng.gen_bool(0.5) { Side::Bid } else { Side::Ask };
        let (top, aggressor_side) = match target_side {
            Side::Bid => (book.best_bid(), Side::Ask),
            Side::Ask => (book.best_ask(), Side::Bid),
        };
        let px_ticks = top?;
        let qty = self.rng.gen_range(self.min_qty..=self.max_qty);
        let id = self.next_id();
        let order = Order::new_market(id, self.client_id(), book.symbol.clone(), aggressor_side, qty, now_ns);
        let _ = px_ticks;
        Self::submit(book, order)
    }

    fn submit(book: &mut OrderBook, order: Order) -> Option<Vec<Trade>> {
        match book.add_order(order) {
            Ok(trades) => Some(trades),
            Err(BookError::InvalidOrder { reason }) => {
                tracing::warn!(reason, "background flow produced an invalid order");
                None
            }
        }
    }
}
