use agora_core::{Price, Side, Trade, TraderId};
use agora_signal::{ImbalanceTracker, SignalConfig, is_imbalance_significant};
use rust_decimal::Decimal;

use crate::market_view::MarketView;
use crate::trader::{Assignment, FillReport, QuoteRequest, StrategyError, Trader, TraderCore};

/// Tuning for the impact-sensitive trader
#[derive(Debug, Clone)]
pub struct ImpactConfig {
    pub signal: SignalConfig,
    /// Gate the imbalance shift behind the significance filter. Off means
    /// the offset is applied on every decision.
    pub filter_enabled: bool,
    /// Weight pulling the baseline quote towards `benchmark + offset`
    pub blend: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            filter_enabled: true,
            blend: 0.8,
        }
    }
}

/// Impact-sensitive trader.
///
/// Baseline behaviour joins the touch on its own side, clipped to the
/// assignment limit. On top of that it tracks multi-level order-flow
/// imbalance between consecutive book snapshots and shifts its quote
/// towards `mid + offset`: aggressive into bid pressure, passive into ask
/// pressure. The significance filter can be toggled independently of the
/// impact pricing, giving the filtered and unfiltered configurations.
pub struct ImpactSensitiveTrader {
    core: TraderCore,
    tracker: ImbalanceTracker,
    config: ImpactConfig,
}

impl ImpactSensitiveTrader {
    pub fn new(id: impl Into<String>, config: ImpactConfig) -> Self {
        Self {
            core: TraderCore::new(id),
            tracker: ImbalanceTracker::new(config.signal.clone()),
            config,
        }
    }

    fn offset_active(&self) -> bool {
        !self.config.filter_enabled
            || is_imbalance_significant(
                self.tracker.volume_ratio(),
                self.config.signal.significance_threshold,
            )
    }

    fn shifted_price(
        &self,
        view: &MarketView,
        assignment: &Assignment,
        baseline: Price,
    ) -> Result<Price, StrategyError> {
        let offset = self.tracker.price_offset();
        if !offset.is_finite() {
            return Err(StrategyError::Computation(
                "imbalance offset is not finite".to_string(),
            ));
        }

        let benchmark = view
            .mid_price()
            .map(|p| p.to_f64())
            .unwrap_or_else(|| baseline.to_f64());
        let target = benchmark + offset;
        let blended = baseline.to_f64() + self.config.blend * (target - baseline.to_f64());

        let price =
            Price::from_f64_rounded(blended).clamp_to(view.price_floor, view.price_ceiling);
        Ok(match assignment.side {
            Side::Buy => price.min(assignment.limit),
            Side::Sell => price.max(assignment.limit),
        })
    }
}

impl Trader for ImpactSensitiveTrader {
    fn id(&self) -> &TraderId {
        &self.core.id
    }

    fn strategy(&self) -> &'static str {
        if self.config.filter_enabled {
            "ImpactSensitiveFiltered"
        } else {
            "ImpactSensitive"
        }
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

        // join the touch, never through the limit
        let baseline = match assignment.side {
            Side::Buy => view
                .best_bid()
                .map(|l| l.price.min(assignment.limit))
                .unwrap_or(assignment.limit),
            Side::Sell => view
                .best_ask()
                .map(|l| l.price.max(assignment.limit))
                .unwrap_or(assignment.limit),
        };

        let price = if self.offset_active() {
            self.shifted_price(view, assignment, baseline)?
        } else {
            baseline
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

    fn observe(&mut self, view: &MarketView, _trade: Option<&Trade>) {
        self.tracker.observe(&view.as_snapshot());
    }

    fn balance(&self) -> Decimal {
        self.core.balance
    }

    fn trades_done(&self) -> u32 {
        self.core.n_trades
    }
}
