use agora_core::{Price, Quantity, Side, Tick, Trade, TraderId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::market_view::MarketView;

/// A customer assignment: the private limit price and quantity a trader is
/// working. Buyers must not pay more than the limit, sellers must not accept
/// less.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub id: u64,
    pub side: Side,
    pub limit: Price,
    pub quantity: Quantity,
    pub issued_at: Tick,
}

/// A quote the trader wants live on the book
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Execution report for one fill of the trader's own quote
#[derive(Debug, Clone)]
pub struct FillReport {
    pub tick: Tick,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Failure of a trader's internal decision logic.
///
/// Caught at the session boundary: the trader's action for the tick is
/// treated as "no order" and the session continues.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("assignment limit {limit} outside system band [{floor}, {ceiling}]")]
    LimitOutOfBand {
        limit: Price,
        floor: Price,
        ceiling: Price,
    },

    #[error("strategy computation failed: {0}")]
    Computation(String),
}

/// Capability contract shared by every strategy variant.
///
/// The session drives the calls: `assign` hands over customer orders,
/// `decide` is invoked when the trader is picked for a tick, `on_fill`
/// settles executions against the working assignment, and `observe` lets
/// the trader update internal state from the published market view.
pub trait Trader: Send {
    fn id(&self) -> &TraderId;

    /// Strategy tag used for per-type balance aggregation
    fn strategy(&self) -> &'static str;

    /// Take on a new customer assignment, replacing any previous one
    fn assign(&mut self, assignment: Assignment);

    fn has_assignment(&self) -> bool;

    /// Observe market state and decide the quote for this tick, if any
    fn decide(&mut self, view: &MarketView) -> Result<Option<QuoteRequest>, StrategyError>;

    /// One of this trader's quotes was (partially) filled
    fn on_fill(&mut self, fill: &FillReport);

    /// Market events published after each processed order. Updates internal
    /// beliefs only; must not touch the book.
    fn observe(&mut self, _view: &MarketView, _trade: Option<&Trade>) {}

    /// Accumulated profit from filled assignments
    fn balance(&self) -> Decimal;

    fn trades_done(&self) -> u32;
}

/// Book-keeping state shared by all strategy variants.
///
/// Profit per fill is the margin between the assignment's limit price and
/// the execution price; the assignment is retired once its quantity is
/// exhausted.
#[derive(Debug, Clone)]
pub struct TraderCore {
    pub id: TraderId,
    pub balance: Decimal,
    pub assignment: Option<Assignment>,
    pub n_trades: u32,
}

impl TraderCore {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: TraderId::new(id),
            balance: Decimal::ZERO,
            assignment: None,
            n_trades: 0,
        }
    }

    pub fn assign(&mut self, assignment: Assignment) {
        self.assignment = Some(assignment);
    }

    pub fn has_assignment(&self) -> bool {
        self.assignment.is_some()
    }

    /// Settle a fill against the working assignment
    pub fn settle(&mut self, fill: &FillReport) {
        let Some(assignment) = &mut self.assignment else {
            return;
        };

        let margin = match fill.side {
            Side::Buy => assignment.limit.inner() - fill.price.inner(),
            Side::Sell => fill.price.inner() - assignment.limit.inner(),
        };
        self.balance += margin * fill.quantity.inner();
        self.n_trades += 1;

        assignment.quantity = assignment.quantity.saturating_sub(fill.quantity);
        if assignment.quantity.is_zero() {
            self.assignment = None;
        }
    }
}
