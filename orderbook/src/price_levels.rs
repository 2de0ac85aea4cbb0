use crate::types::{Order, OrderId, Side};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Price levels for one side of the book: a FIFO queue of resting orders
/// at each price, kept in a BTreeMap so the best price is a map endpoint.
/// - Asks: lowest price is best (front of map).
/// - Bids: highest price is best (back of map).
///
/// Cancellation is eager (matching the reference book, not the lazy
/// mark-and-sweep a pure-performance book would use): the id index points
/// at the owning price level, and removal is a linear scan bounded by that
/// level's depth, not the whole book.
pub struct PriceLevels {
    side: Side,
    levels: BTreeMap<i64, VecDeque<Order>>,
    index: HashMap<OrderId, i64>,
}

impl PriceLevels {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    /// Adds an order at its price level, preserving FIFO arrival order.
    pub fn push(&mut self, order: Order) {
        let px = order.px_ticks;
        let id = order.id;
        self.levels.entry(px).or_default().push_back(order);
        self.index.insert(id, px);
    }

    /// Pushes an order back to the front of its level (used to restore a
    /// partially-filled maker without losing its time priority).
    pub fn push_front(&mut self, order: Order) {
        let px = order.px_ticks;
        let id = order.id;
        self.levels.entry(px).or_default().push_front(order);
        self.index.insert(id, px);
    }

    pub fn get_price_levels(&self) -> &BTreeMap<i64, VecDeque<Order>> {
        &self.levels
    }

    /// Best price for this side, or `None` if empty.
    pub fn best_price(&self) -> Option<i64> {
        match self.side {
            Side::Ask => self.levels.first_key_value().map(|(px, _)| *px),
            Side::Bid => self.levels.last_key_value().map(|(px, _)| *px),
        }
    }

    /// Aggregated remaining quantity resting at the best price.
    pub fn best_qty(&self) -> f64 {
        match self.best_price() {
            Some(px) => self
                .levels
                .get(&px)
                .map(|q| q.iter().map(|o| o.remaining).sum())
                .unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Number of resting orders at the best price.
    pub fn best_level_size(&self) -> usize {
        match self.best_price() {
            Some(px) => self.levels.get(&px).map(|q| q.len()).unwrap_or(0),
            None => 0,
        }
    }

    /// Total count of resting orders across all price levels on this side.
    pub fn total_len(&self) -> usize {
        self.levels.values().map(|q| q.len()).sum()
    }

    /// Removes and returns the order at the head of the best price level.
    /// Cleans up the level from the map once it empties.
    pub fn pop_best(&mut self) -> Option<Order> {
        let px = self.best_price()?;
        let q = self.levels.get_mut(&px)?;
        let order = q.pop_front();
        if let Some(ref o) = order {
            self.index.remove(&o.id);
        }
        if q.is_empty() {
            self.levels.remove(&px);
        }
        order
    }

    /// Removes a specific order by id, wherever it sits in its level's
    /// queue. Returns `true` iff a live resting order with that id existed.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let Some(px) = self.index.remove(&id) else {
            return false;
        };
        let Some(q) = self.levels.get_mut(&px) else {
            return false;
        };
        if let Some(pos) = q.iter().position(|o| o.id == id) {
            q.remove(pos);
            if q.is_empty() {
                self.levels.remove(&px);
            }
            true
        } else {
            false
        }
    }
}
