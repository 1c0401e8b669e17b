use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{OrderId, Price, Quantity, Tick, TradeId, TraderId};

/// Trade resulting from matching two orders.
///
/// Created only by the matching engine, immutable once created,
/// appended to the session tape and never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub price: Price,
    pub quantity: Quantity,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: TraderId,
    pub seller: TraderId,
    pub tick: Tick,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        price: Price,
        quantity: Quantity,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buyer: TraderId,
        seller: TraderId,
        tick: Tick,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            price,
            quantity,
            buy_order_id,
            sell_order_id,
            buyer,
            seller,
            tick,
        }
    }

    /// Notional value of the trade (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price.inner() * self.quantity.inner()
    }
}
