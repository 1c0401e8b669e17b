use agora_core::{Order, OrderId, Side, Trade};
use log::debug;

use crate::error::{ExchangeError, Result};
use crate::order_book::OrderBook;

/// Outcome of submitting one order: the trades it produced and whether any
/// unfilled remainder now rests on the book.
#[derive(Debug, Clone)]
pub struct Submission {
    pub order_id: OrderId,
    pub trades: Vec<Trade>,
    pub rested: bool,
}

/// Price-time priority matching engine (FIFO).
///
/// Incoming orders are matched against the opposite side before resting:
/// 1. Best price first (highest bid, lowest ask)
/// 2. Earliest arrival first at equal price
///
/// Execution is always at the resting order's price, so any price
/// improvement goes to the standing order.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    book: OrderBook,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            book: OrderBook::new(),
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Match an incoming order against the book, resting any remainder.
    ///
    /// Emits one `Trade` per maker order consumed. Guarantees that no trade
    /// violates either party's limit and that per-trade quantity never
    /// exceeds either side's remaining quantity.
    pub fn submit(&mut self, order: Order) -> Result<Submission> {
        let mut order = order;
        if !order.validate() {
            return Err(ExchangeError::InvalidOrder(format!(
                "price {} qty {} must both be positive",
                order.price, order.quantity
            )));
        }

        let mut trades = Vec::new();

        loop {
            if order.remaining().is_zero() {
                break;
            }

            let Some(maker) = self.book.best_resting(order.side.opposite()) else {
                break;
            };
            if !order.crosses(maker.price) {
                break;
            }

            let maker_id = maker.id;
            let maker_trader = maker.trader.clone();
            let maker_price = maker.price;
            let qty = order.remaining().min(maker.remaining());

            // resting-price execution
            let trade = match order.side {
                Side::Buy => Trade::new(
                    maker_price,
                    qty,
                    order.id,
                    maker_id,
                    order.trader.clone(),
                    maker_trader,
                    order.submitted_at,
                ),
                Side::Sell => Trade::new(
                    maker_price,
                    qty,
                    maker_id,
                    order.id,
                    maker_trader,
                    order.trader.clone(),
                    order.submitted_at,
                ),
            };

            self.book.fill_resting(maker_id, qty)?;
            order.fill(qty);

            debug!(
                "trade: {} x {} (taker {} vs maker {})",
                trade.price, trade.quantity, order.id, maker_id
            );
            trades.push(trade);
        }

        let order_id = order.id;
        let rested = if order.remaining().is_positive() {
            self.book.insert(order)?;
            true
        } else {
            false
        };

        Ok(Submission {
            order_id,
            trades,
            rested,
        })
    }

    /// Cancel a resting order, reporting `OrderNotFound` if it is absent.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order> {
        self.book.cancel(order_id)
    }
}
