use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{OrderId, Price, Quantity, Side, Tick, TraderId};

/// A limit order resting in (or entering) the book.
///
/// Immutable once placed except for `filled`, which grows on partial fills.
/// An order is removed from the book when fully filled or cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: TraderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled: Quantity,
    /// Tick at which the order was submitted
    pub submitted_at: Tick,
    /// Book-assigned arrival sequence, used for time priority at equal price
    pub arrival: u64,
}

impl Order {
    pub fn new(
        trader: TraderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        submitted_at: Tick,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trader,
            side,
            price,
            quantity,
            filled: Quantity::ZERO,
            submitted_at,
            arrival: 0,
        }
    }

    /// Basic well-formedness: strictly positive price and quantity.
    pub fn validate(&self) -> bool {
        self.price.is_positive() && self.quantity.is_positive()
    }

    pub fn remaining(&self) -> Quantity {
        self.quantity.saturating_sub(self.filled)
    }

    pub fn is_filled(&self) -> bool {
        self.filled >= self.quantity
    }

    /// Apply a fill of `qty` against this order.
    pub fn fill(&mut self, qty: Quantity) {
        self.filled = self.filled + qty;
    }

    /// Whether this order's limit crosses a resting price on the opposite side.
    pub fn crosses(&self, resting_price: Price) -> bool {
        match self.side {
            Side::Buy => self.price >= resting_price,
            Side::Sell => self.price <= resting_price,
        }
    }
}
