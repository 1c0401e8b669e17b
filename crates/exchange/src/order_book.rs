use std::collections::{BTreeMap, HashMap, VecDeque};

use agora_core::{BookSnapshot, Order, OrderId, Price, PriceLevel, Quantity, Side, Tick};
use log::debug;

use crate::error::{ExchangeError, Result};

/// Order book for a single instrument.
///
/// Both sides are keyed by price; within a price level orders queue in
/// arrival order, so consuming from the front of the best level is exactly
/// price-time priority. Every mutation bumps the `revision` counter, which
/// stamps the snapshots consumed by the imbalance signal.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Bids keyed by price ascending; best bid is the last key
    bids: BTreeMap<Price, VecDeque<Order>>,
    /// Asks keyed by price ascending; best ask is the first key
    asks: BTreeMap<Price, VecDeque<Order>>,
    /// Quick lookup of resting orders by id
    index: HashMap<OrderId, (Side, Price)>,
    /// Monotonically increasing mutation counter
    revision: u64,
    /// Arrival sequence stamped onto inserted orders
    arrivals: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Rest an order on its own side of the book.
    ///
    /// Rejects malformed orders (non-positive price or quantity). The caller
    /// is responsible for matching first; `insert` never crosses the book.
    pub fn insert(&mut self, mut order: Order) -> Result<OrderId> {
        if !order.validate() {
            return Err(ExchangeError::InvalidOrder(format!(
                "price {} qty {} must both be positive",
                order.price, order.quantity
            )));
        }

        self.arrivals += 1;
        order.arrival = self.arrivals;

        let id = order.id;
        self.index.insert(id, (order.side, order.price));
        self.side_mut(order.side)
            .entry(order.price)
            .or_default()
            .push_back(order);

        self.revision += 1;
        Ok(id)
    }

    /// Remove a resting order.
    ///
    /// Reports `OrderNotFound` for ids that are absent (already filled or
    /// cancelled); callers treat that as a logged no-op.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order> {
        let (side, price) = self
            .index
            .remove(&order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;

        let queue = self
            .side_mut(side)
            .get_mut(&price)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;
        let pos = queue
            .iter()
            .position(|o| o.id == order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;
        let order = queue.remove(pos).ok_or(ExchangeError::OrderNotFound(order_id))?;

        if queue.is_empty() {
            self.side_mut(side).remove(&price);
        }

        self.revision += 1;
        debug!("cancelled order {} ({} @ {})", order_id, order.side, order.price);
        Ok(order)
    }

    /// The highest-priority resting order on `side`, if any.
    pub fn best_resting(&self, side: Side) -> Option<&Order> {
        match side {
            Side::Buy => self.bids.last_key_value(),
            Side::Sell => self.asks.first_key_value(),
        }
        .and_then(|(_, queue)| queue.front())
    }

    /// Apply a fill of `qty` to a resting order, removing it once exhausted.
    pub fn fill_resting(&mut self, order_id: OrderId, qty: Quantity) -> Result<()> {
        let (side, price) = *self
            .index
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;

        let queue = self
            .side_mut(side)
            .get_mut(&price)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;
        let order = queue
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;

        if qty > order.remaining() {
            return Err(ExchangeError::Internal(format!(
                "fill {} exceeds remaining {} on order {}",
                qty,
                order.remaining(),
                order_id
            )));
        }

        order.fill(qty);
        if order.is_filled() {
            queue.retain(|o| o.id != order_id);
            if queue.is_empty() {
                self.side_mut(side).remove(&price);
            }
            self.index.remove(&order_id);
        }

        self.revision += 1;
        Ok(())
    }

    /// Top-of-book price and aggregate quantity on the bid side
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids
            .last_key_value()
            .map(|(price, queue)| PriceLevel::new(*price, Self::queue_quantity(queue)))
    }

    /// Top-of-book price and aggregate quantity on the ask side
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks
            .first_key_value()
            .map(|(price, queue)| PriceLevel::new(*price, Self::queue_quantity(queue)))
    }

    /// Top-`depth` aggregated price levels per side, best first
    pub fn levels(&self, depth: usize) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
        let bids = self
            .bids
            .iter()
            .rev()
            .take(depth)
            .map(|(price, queue)| PriceLevel::new(*price, Self::queue_quantity(queue)))
            .collect();
        let asks = self
            .asks
            .iter()
            .take(depth)
            .map(|(price, queue)| PriceLevel::new(*price, Self::queue_quantity(queue)))
            .collect();
        (bids, asks)
    }

    /// Capture an immutable snapshot of the top `depth` levels
    pub fn snapshot(&self, tick: Tick, depth: usize) -> BookSnapshot {
        let (bids, asks) = self.levels(depth);
        BookSnapshot {
            tick,
            revision: self.revision,
            bids,
            asks,
        }
    }

    /// True when best bid and best ask overlap. Transient only: matching
    /// consumes any cross before control returns to the session.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Price, VecDeque<Order>> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn queue_quantity(queue: &VecDeque<Order>) -> Quantity {
        queue
            .iter()
            .fold(Quantity::ZERO, |acc, o| acc + o.remaining())
    }
}
