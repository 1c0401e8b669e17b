use agora_core::{Price, Side, Trade, TraderId};
use rust_decimal::Decimal;

use crate::market_view::MarketView;
use crate::trader::{Assignment, FillReport, QuoteRequest, StrategyError, Trader, TraderCore};

/// Shaver trader: improves the touch by one price tick, clipped to its
/// limit. With no standing quote on its side it starts from the worst
/// allowable price and waits to be improved upon.
pub struct ShaverTrader {
    core: TraderCore,
}

impl ShaverTrader {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            core: TraderCore::new(id),
        }
    }
}

impl Trader for ShaverTrader {
    fn id(&self) -> &TraderId {
        &self.core.id
    }

    fn strategy(&self) -> &'static str {
        "Shaver"
    }

    fn assign(&mut self, assignment: Assignment) {
        self.core.assign(assignment);
    }

    fn has_assignment(&self) -> bool {
        self.core.has_assignment()
    }

    fn decide(&mut self, view: &MarketView) -> Result<Option<QuoteRequest>, StrategyError> {
        let Some(assignment) = &self.core.assignment else {
            return Ok(None);
        };

        let one = Price::from_int(1);
        let price = match assignment.side {
            Side::Buy => match view.best_bid() {
                Some(best) => (best.price + one).min(assignment.limit),
                None => view.price_floor.min(assignment.limit),
            },
            Side::Sell => match view.best_ask() {
                Some(best) => (best.price - one).max(assignment.limit),
                None => view.price_ceiling.max(assignment.limit),
            },
        };

        Ok(Some(QuoteRequest {
            side: assignment.side,
            price,
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
    use agora_core::{PriceLevel, Quantity};

    fn view(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> MarketView {
        MarketView {
            tick: 0,
            revision: 0,
            bids: bids
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
            asks: asks
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
            last_trade: None,
            price_floor: Price::from_int(1),
            price_ceiling: Price::from_int(200),
        }
    }

    fn assignment(side: Side, limit: i64) -> Assignment {
        Assignment {
            id: 1,
            side,
            limit: Price::from_int(limit),
            quantity: Quantity::from_int(1),
            issued_at: 0,
        }
    }

    #[test]
    fn test_improves_best_bid_by_one() {
        let mut trader = ShaverTrader::new("B00");
        trader.assign(assignment(Side::Buy, 120));

        let quote = trader.decide(&view(&[(100, 5)], &[(110, 5)])).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(101));
    }

    #[test]
    fn test_clips_to_limit() {
        let mut trader = ShaverTrader::new("B00");
        trader.assign(assignment(Side::Buy, 100));

        let quote = trader.decide(&view(&[(100, 5)], &[(110, 5)])).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(100));
    }

    #[test]
    fn test_empty_side_starts_from_worst_price() {
        let mut buyer = ShaverTrader::new("B00");
        buyer.assign(assignment(Side::Buy, 120));
        let quote = buyer.decide(&view(&[], &[(110, 5)])).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(1));

        let mut seller = ShaverTrader::new("S00");
        seller.assign(assignment(Side::Sell, 60));
        let quote = seller.decide(&view(&[(50, 5)], &[])).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(200));
    }

    #[test]
    fn test_undercuts_best_ask_by_one() {
        let mut trader = ShaverTrader::new("S00");
        trader.assign(assignment(Side::Sell, 60));

        let quote = trader.decide(&view(&[(100, 5)], &[(110, 5)])).unwrap().unwrap();
        assert_eq!(quote.price, Price::from_int(109));
    }
}
