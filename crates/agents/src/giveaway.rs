use agora_core::{Trade, TraderId};
use rust_decimal::Decimal;

use crate::market_view::MarketView;
use crate::trader::{Assignment, FillReport, QuoteRequest, StrategyError, Trader, TraderCore};

/// Giveaway trader: quotes its assignment limit price directly.
///
/// The simplest possible strategy. It hands the whole margin to the
/// counterparty but never makes a loss.
pub struct GiveawayTrader {
    core: TraderCore,
}

impl GiveawayTrader {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            core: TraderCore::new(id),
        }
    }
}

impl Trader for GiveawayTrader {
    fn id(&self) -> &TraderId {
        &self.core.id
    }

    fn strategy(&self) -> &'static str {
        "Giveaway"
    }

    fn assign(&mut self, assignment: Assignment) {
        self.core.assign(assignment);
    }

    fn has_assignment(&self) -> bool {
        self.core.has_assignment()
    }

    fn decide(&mut self, _view: &MarketView) -> Result<Option<QuoteRequest>, StrategyError> {
        let Some(assignment) = &self.core.assignment else {
            return Ok(None);
        };

        Ok(Some(QuoteRequest {
            side: assignment.side,
            price: assignment.limit,
            quantity: assignment.quantity,
        }))
    }

    fn on_fill(&mut self, fill: &FillReport) {
        self.core.settle(fill);
    }

    fn observe(&mut self, _view: &MarketView, _trade: Option<&Trade>) {}

    fn balance(&self) -> Decimal {
        self.core.balance
    }

    fn trades_done(&self) -> u32 {
        self.core.n_trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{Price, Quantity, Side};

    fn empty_view() -> MarketView {
        MarketView {
            tick: 0,
            revision: 0,
            bids: Vec::new(),
            asks: Vec::new(),
            last_trade: None,
            price_floor: Price::from_int(1),
            price_ceiling: Price::from_int(200),
        }
    }

    #[test]
    fn test_quotes_limit_price() {
        let mut trader = GiveawayTrader::new("B00");
        trader.assign(Assignment {
            id: 1,
            side: Side::Buy,
            limit: Price::from_int(120),
            quantity: Quantity::from_int(1),
            issued_at: 0,
        });

        let quote = trader.decide(&empty_view()).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(120));
        assert_eq!(quote.side, Side::Buy);
    }

    #[test]
    fn test_no_assignment_no_quote() {
        let mut trader = GiveawayTrader::new("B00");
        assert!(trader.decide(&empty_view()).unwrap().is_none());
    }
}
