use agora_core::{Price, Side, Trade, TraderId};
use rand::prelude::*;
use rust_decimal::Decimal;

use crate::market_view::MarketView;
use crate::trader::{Assignment, FillReport, QuoteRequest, StrategyError, Trader, TraderCore};

/// Configuration for the zero-intelligence-constrained trader
#[derive(Debug, Clone, Default)]
pub struct ZicConfig {
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

/// Zero-Intelligence Constrained trader, after Gode & Sunder 1993.
///
/// Quotes a uniform random price inside the system band, constrained so it
/// can never trade through its own limit: buyers draw from
/// `[floor, limit]`, sellers from `[limit, ceiling]`.
pub struct ZicTrader {
    core: TraderCore,
    rng: StdRng,
}

impl ZicTrader {
    pub fn new(id: impl Into<String>, config: ZicConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            core: TraderCore::new(id),
            rng,
        }
    }
}

impl Trader for ZicTrader {
    fn id(&self) -> &TraderId {
        &self.core.id
    }

    fn strategy(&self) -> &'static str {
        "Zic"
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

        let limit = assignment.limit.to_i64();
        let (lo, hi) = match assignment.side {
            Side::Buy => (view.price_floor.to_i64(), limit),
            Side::Sell => (limit, view.price_ceiling.to_i64()),
        };

        if lo > hi {
            return Err(StrategyError::LimitOutOfBand {
                limit: assignment.limit,
                floor: view.price_floor,
                ceiling: view.price_ceiling,
            });
        }

        let price = self.rng.gen_range(lo..=hi);
        Ok(Some(QuoteRequest {
            side: assignment.side,
            price: Price::from_int(price),
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
    use agora_core::Quantity;

    fn view() -> MarketView {
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
    fn test_bid_never_exceeds_limit() {
        let mut trader = ZicTrader::new("B00", ZicConfig { seed: Some(42) });
        trader.assign(assignment(Side::Buy, 80));

        for _ in 0..200 {
            let quote = trader.decide(&view()).unwrap().unwrap();
            assert!(quote.price <= Price::from_int(80));
            assert!(quote.price >= Price::from_int(1));
        }
    }

    #[test]
    fn test_ask_never_undercuts_limit() {
        let mut trader = ZicTrader::new("S00", ZicConfig { seed: Some(42) });
        trader.assign(assignment(Side::Sell, 60));

        for _ in 0..200 {
            let quote = trader.decide(&view()).unwrap().unwrap();
            assert!(quote.price >= Price::from_int(60));
            assert!(quote.price <= Price::from_int(200));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = ZicTrader::new("S00", ZicConfig { seed: Some(7) });
        let mut b = ZicTrader::new("S01", ZicConfig { seed: Some(7) });
        a.assign(assignment(Side::Sell, 60));
        b.assign(assignment(Side::Sell, 60));

        for _ in 0..20 {
            let qa = a.decide(&view()).unwrap().unwrap();
            let qb = b.decide(&view()).unwrap().unwrap();
            assert_eq!(qa.price, qb.price);
        }
    }

    #[test]
    fn test_limit_outside_band_is_strategy_error() {
        let mut trader = ZicTrader::new("B00", ZicConfig { seed: Some(1) });
        trader.assign(assignment(Side::Buy, 0));

        let err = trader.decide(&view()).unwrap_err();
        assert!(matches!(err, StrategyError::LimitOutOfBand { .. }));
    }
}
