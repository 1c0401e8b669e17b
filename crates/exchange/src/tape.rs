use agora_core::{Order, OrderId, Price, Quantity, Side, Tick, Trade, TraderId};

/// One entry on the session tape.
#[derive(Debug, Clone)]
pub enum TapeEvent {
    /// A quote accepted by the exchange (before any matching it caused)
    Quote {
        tick: Tick,
        order_id: OrderId,
        trader: TraderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    /// An executed trade
    Trade(Trade),
    /// A resting quote withdrawn before execution
    Cancel {
        tick: Tick,
        order_id: OrderId,
        trader: TraderId,
    },
}

/// Append-only chronological record of market events.
///
/// The tape is the single source of truth for downstream analysis: events
/// are only ever appended, in simulated-time order, and never mutated.
#[derive(Debug, Default)]
pub struct Tape {
    events: Vec<TapeEvent>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_quote(&mut self, order: &Order) {
        self.events.push(TapeEvent::Quote {
            tick: order.submitted_at,
            order_id: order.id,
            trader: order.trader.clone(),
            side: order.side,
            price: order.price,
            quantity: order.quantity,
        });
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.events.push(TapeEvent::Trade(trade));
    }

    pub fn record_cancel(&mut self, tick: Tick, order: &Order) {
        self.events.push(TapeEvent::Cancel {
            tick,
            order_id: order.id,
            trader: order.trader.clone(),
        });
    }

    pub fn events(&self) -> &[TapeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Executed trades, in tape order
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.events.iter().filter_map(|e| match e {
            TapeEvent::Trade(trade) => Some(trade),
            _ => None,
        })
    }

    /// Price of the most recent trade, if any
    pub fn last_trade_price(&self) -> Option<Price> {
        self.trades().last().map(|t| t.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(price: i64, qty: i64, tick: Tick) -> Trade {
        Trade::new(
            Price::from_int(price),
            Quantity::from_int(qty),
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            TraderId::new("B00"),
            TraderId::new("S00"),
            tick,
        )
    }

    #[test]
    fn test_append_and_iterate() {
        let mut tape = Tape::new();
        let order = Order::new(
            TraderId::new("B00"),
            Side::Buy,
            Price::from_int(100),
            Quantity::from_int(1),
            3,
        );

        tape.record_quote(&order);
        tape.record_trade(trade(100, 1, 3));
        tape.record_trade(trade(101, 2, 4));

        assert_eq!(tape.len(), 3);
        assert_eq!(tape.trades().count(), 2);
        assert_eq!(tape.last_trade_price(), Some(Price::from_int(101)));
    }

    #[test]
    fn test_trades_stay_in_tick_order() {
        let mut tape = Tape::new();
        for tick in 0..5 {
            tape.record_trade(trade(100, 1, tick));
        }

        let ticks: Vec<Tick> = tape.trades().map(|t| t.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3, 4]);
    }
}
