use serde::{Deserialize, Serialize};

/// Quantity collapse epsilon: a remaining quantity at or below this is
/// treated as fully consumed (spec epsilon policy).
pub const QTY_EPSILON: f64 = 1e-9;

/// Price-cross comparison epsilon (spec epsilon policy).
pub const PRICE_EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Wire encoding: `B` or `S`. Internal code never matches on these chars.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Side::Bid => "B",
            Side::Ask => "S",
        }
    }

    pub fn from_wire(s: &str) -> Option<Side> {
        match s {
            "B" => Some(Side::Bid),
            "S" => Some(Side::Ask),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Limit,
    Market,
}

impl Kind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Kind::Limit => "L",
            Kind::Market => "M",
        }
    }

    pub fn from_wire(s: &str) -> Option<Kind> {
        match s {
            "L" => Some(Kind::Limit),
            "M" => Some(Kind::Market),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

/// A resting or incoming order. `px_ticks` is the limit price rounded to
/// the book's tick grid on admission (ignored for market orders);
/// `remaining` is non-increasing and collapses the order once it drops
/// to or below [`QTY_EPSILON`].
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub client_id: String,
    pub symbol: String,
    pub side: Side,
    pub kind: Kind,
    pub qty: f64,
    pub px_ticks: i64,
    pub remaining: f64,
    /// Arrival timestamp at the book (post-delay), used for time priority.
    pub ts_ns: u128,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        client_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        kind: Kind,
        px_ticks: i64,
        qty: f64,
        ts_ns: u128,
    ) -> Self {
        Self {
            id,
            client_id: client_id.into(),
            symbol: symbol.into(),
            side,
            kind,
            qty,
            px_ticks,
            remaining: qty,
            ts_ns,
        }
    }

    /// Constructs a market order. `px_ticks` is unused for matching (market
    /// orders cross at whatever price the opposite side is resting at) and
    /// is set to zero so it never participates in price comparisons.
    pub fn new_market(
        id: OrderId,
        client_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        qty: f64,
        ts_ns: u128,
    ) -> Self {
        Self::new(id, client_id, symbol, side, Kind::Market, 0, qty, ts_ns)
    }

    pub fn is_filled(&self) -> bool {
        self.remaining <= QTY_EPSILON
    }

    /// Limit orders must carry a finite tick price; market orders ignore
    /// `px_ticks` entirely, so any value is valid.
    pub fn px_ticks_valid(&self) -> bool {
        match self.kind {
            Kind::Limit => self.px_ticks != i64::MIN,
            Kind::Market => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub px_ticks: i64,
    pub qty: f64,
    pub taker: OrderId,
    pub maker: OrderId,
    pub taker_client_id: String,
    pub maker_client_id: String,
    pub ts_ns: u128,
}

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: &'static str },
}
