//! The market session scheduler.
//!
//! One session is one bounded trading day: a state machine over discrete
//! ticks that issues customer assignments, lets one uniformly chosen trader
//! quote per tick, routes the quote through the matching engine, settles the
//! resulting fills and publishes the post-event book state to every trader.
//!
//! Processing is strictly serial. One order is fully matched, including
//! cascading fills, before the next trader acts; nothing inside a session
//! runs concurrently.

use std::collections::HashMap;

use agora_agents::{
    FillReport, GiveawayTrader, ImpactSensitiveTrader, MarketView, QuoteRequest, ShaverTrader,
    Trader, ZicConfig, ZicTrader,
};
use agora_core::{Order, OrderId, Price, Side, Tick, Trade, TraderId};
use agora_exchange::{ExchangeError, MatchingEngine, OrderBook, Tape};
use log::{debug, info, warn};
use rand::prelude::*;
use rust_decimal::Decimal;

use crate::config::{SessionConfig, SignalSettings, StrategyKind};
use crate::error::{ConfigError, SessionError};
use crate::schedule::AssignmentScheduler;

/// Lifecycle states of a trading-day session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Trading,
    Closed,
}

/// Per-strategy aggregate profit for one session
#[derive(Debug, Clone)]
pub struct StrategyBalance {
    pub strategy: String,
    pub traders: u32,
    pub total_profit: Decimal,
    pub mean_profit: Decimal,
}

/// Summary of one completed session, including the full tape
#[derive(Debug)]
pub struct SessionReport {
    pub session_id: String,
    pub ticks: Tick,
    pub orders_submitted: u64,
    pub trades_executed: u64,
    pub volume: Decimal,
    pub balances: Vec<StrategyBalance>,
    pub tape: Tape,
}

/// One trading-day session with exclusive ownership of its book, tape,
/// RNG and trader population.
pub struct MarketSession {
    id: String,
    config: SessionConfig,
    engine: MatchingEngine,
    tape: Tape,
    traders: Vec<Box<dyn Trader>>,
    /// Slot of each trader by id, for settling fills
    slots: HashMap<TraderId, usize>,
    /// The single live quote each trader may have on the book
    live_quotes: Vec<Option<OrderId>>,
    scheduler: AssignmentScheduler,
    rng: StdRng,
    tick: Tick,
    state: SessionState,
    stop_requested: bool,
    orders_submitted: u64,
}

impl MarketSession {
    pub fn new(id: impl Into<String>, config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let id = id.into();
        let seed = config.seed.unwrap_or(0);
        let traders = build_traders(&config, seed);
        let slots = traders
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id().clone(), i))
            .collect();
        let live_quotes = vec![None; traders.len()];
        let scheduler = AssignmentScheduler::new(
            config.schedule.clone(),
            config.price_floor,
            config.price_ceiling,
            config.n_buyers(),
            config.n_sellers(),
            seed.wrapping_add(1),
        );

        info!(
            "session {id}: {} buyers, {} sellers, {} ticks",
            config.n_buyers(),
            config.n_sellers(),
            config.session_ticks
        );

        Ok(Self {
            id,
            engine: MatchingEngine::new(),
            tape: Tape::new(),
            traders,
            slots,
            live_quotes,
            scheduler,
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
            state: SessionState::Open,
            stop_requested: false,
            orders_submitted: 0,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn book(&self) -> &OrderBook {
        self.engine.book()
    }

    /// Register an extra trader on top of the configured population.
    ///
    /// Added traders take part in tick selection but receive no scheduled
    /// customer assignments; they work whatever state they carry themselves.
    pub fn add_trader(&mut self, trader: Box<dyn Trader>) {
        self.slots.insert(trader.id().clone(), self.traders.len());
        self.live_quotes.push(None);
        self.traders.push(trader);
    }

    /// Move from Open to Trading
    pub fn open(&mut self) {
        if self.state == SessionState::Open {
            self.state = SessionState::Trading;
            info!("session {} trading", self.id);
        }
    }

    /// Ask the session to close after the current tick completes.
    /// In-flight matching is never interrupted mid-trade.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Run the session from Open to Closed and summarise it
    pub fn run(&mut self) -> SessionReport {
        self.open();
        while self.state == SessionState::Trading {
            // step only fails once the session is closed
            if self.step().is_err() {
                break;
            }
        }
        self.report()
    }

    /// Advance the session by one tick.
    ///
    /// Closed sessions reject further submissions.
    pub fn step(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Trading {
            return Err(SessionError::Closed);
        }

        // issue customer assignments now due; a superseding assignment
        // withdraws the trader's resting quote
        for (slot, assignment) in self.scheduler.due(self.tick) {
            if let Some(order_id) = self.live_quotes[slot].take() {
                self.withdraw(order_id);
            }
            self.traders[slot].assign(assignment);
        }

        // one uniformly chosen trader with work to do quotes this tick
        let active: Vec<usize> = self
            .traders
            .iter()
            .enumerate()
            .filter(|(_, t)| t.has_assignment())
            .map(|(i, _)| i)
            .collect();

        let mut step_trades = Vec::new();
        if let Some(&slot) = active.choose(&mut self.rng) {
            let view = self.market_view();
            match self.traders[slot].decide(&view) {
                Ok(Some(quote)) => step_trades = self.place_quote(slot, quote),
                Ok(None) => {}
                Err(e) => {
                    // strategy failures never abort the session; the trader
                    // simply takes no action this tick
                    warn!(
                        "session {}: trader {} skipped at tick {}: {e}",
                        self.id,
                        self.traders[slot].id(),
                        self.tick
                    );
                }
            }
        }

        // every trader updates its beliefs from the post-event state
        let view = self.market_view();
        let last_trade = step_trades.last();
        for trader in &mut self.traders {
            trader.observe(&view, last_trade);
        }

        self.tick += 1;
        if self.tick >= self.config.session_ticks || self.stop_requested {
            self.close();
        }
        Ok(())
    }

    fn close(&mut self) {
        self.state = SessionState::Closed;
        info!(
            "session {} closed after {} ticks, {} orders, {} trades",
            self.id,
            self.tick,
            self.orders_submitted,
            self.tape.trades().count()
        );
    }

    fn market_view(&self) -> MarketView {
        let book = self.engine.book();
        let (bids, asks) = book.levels(self.config.published_depth);
        MarketView {
            tick: self.tick,
            revision: book.revision(),
            bids,
            asks,
            last_trade: self.tape.last_trade_price(),
            price_floor: Price::from_int(self.config.price_floor),
            price_ceiling: Price::from_int(self.config.price_ceiling),
        }
    }

    fn withdraw(&mut self, order_id: OrderId) {
        match self.engine.cancel(order_id) {
            Ok(order) => self.tape.record_cancel(self.tick, &order),
            // already filled between quoting and withdrawal
            Err(ExchangeError::OrderNotFound(_)) => {
                debug!("session {}: order {} already gone", self.id, order_id)
            }
            Err(e) => warn!("session {}: cancel of {} failed: {e}", self.id, order_id),
        }
    }

    /// Route one quote through the engine: replace the trader's previous
    /// quote, log the raw quote and any trades to the tape, settle fills.
    fn place_quote(&mut self, slot: usize, quote: QuoteRequest) -> Vec<Trade> {
        if let Some(order_id) = self.live_quotes[slot].take() {
            self.withdraw(order_id);
        }

        let trader_id = self.traders[slot].id().clone();
        let order = Order::new(trader_id.clone(), quote.side, quote.price, quote.quantity, self.tick);
        self.tape.record_quote(&order);

        match self.engine.submit(order) {
            Err(e) => {
                // malformed order: discarded, originating trader notified,
                // session continues
                warn!("session {}: order from {trader_id} rejected: {e}", self.id);
                Vec::new()
            }
            Ok(submission) => {
                self.orders_submitted += 1;
                if submission.rested {
                    self.live_quotes[slot] = Some(submission.order_id);
                }
                for trade in &submission.trades {
                    self.tape.record_trade(trade.clone());
                    self.settle(trade);
                }
                self.sweep_live_quotes();
                submission.trades
            }
        }
    }

    /// Deliver fill reports to both parties of a trade
    fn settle(&mut self, trade: &Trade) {
        let parties = [
            (trade.buyer.clone(), Side::Buy),
            (trade.seller.clone(), Side::Sell),
        ];
        for (trader_id, side) in parties {
            if let Some(&slot) = self.slots.get(&trader_id) {
                self.traders[slot].on_fill(&FillReport {
                    tick: trade.tick,
                    side,
                    price: trade.price,
                    quantity: trade.quantity,
                });
            }
        }
    }

    /// Forget live quotes that matching fully consumed
    fn sweep_live_quotes(&mut self) {
        let book = self.engine.book();
        for entry in &mut self.live_quotes {
            if let Some(order_id) = entry {
                if !book.contains(*order_id) {
                    *entry = None;
                }
            }
        }
    }

    /// Summarise the session and hand over the tape
    pub fn report(&mut self) -> SessionReport {
        let trades_executed = self.tape.trades().count() as u64;
        let volume = self
            .tape
            .trades()
            .fold(Decimal::ZERO, |acc, t| acc + t.quantity.inner());

        let mut by_strategy: HashMap<&'static str, (u32, Decimal)> = HashMap::new();
        for trader in &self.traders {
            let entry = by_strategy.entry(trader.strategy()).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += trader.balance();
        }

        let mut balances: Vec<StrategyBalance> = by_strategy
            .into_iter()
            .map(|(strategy, (traders, total_profit))| StrategyBalance {
                strategy: strategy.to_string(),
                traders,
                total_profit,
                mean_profit: total_profit / Decimal::from(traders),
            })
            .collect();
        balances.sort_by(|a, b| a.strategy.cmp(&b.strategy));

        SessionReport {
            session_id: self.id.clone(),
            ticks: self.tick,
            orders_submitted: self.orders_submitted,
            trades_executed,
            volume,
            balances,
            tape: std::mem::take(&mut self.tape),
        }
    }
}

fn build_traders(config: &SessionConfig, seed: u64) -> Vec<Box<dyn Trader>> {
    let mut traders: Vec<Box<dyn Trader>> = Vec::new();

    let mut n = 0usize;
    for entry in &config.buyers {
        for _ in 0..entry.count {
            let name = format!("B{n:02}");
            let trader_seed = seed.wrapping_add(traders.len() as u64 + 1);
            traders.push(make_trader(entry.strategy, name, trader_seed, &config.signal));
            n += 1;
        }
    }

    let mut n = 0usize;
    for entry in &config.sellers {
        for _ in 0..entry.count {
            let name = format!("S{n:02}");
            let trader_seed = seed.wrapping_add(traders.len() as u64 + 1);
            traders.push(make_trader(entry.strategy, name, trader_seed, &config.signal));
            n += 1;
        }
    }

    traders
}

fn make_trader(
    kind: StrategyKind,
    id: String,
    seed: u64,
    signal: &SignalSettings,
) -> Box<dyn Trader> {
    match kind {
        StrategyKind::Giveaway => Box::new(GiveawayTrader::new(id)),
        StrategyKind::Zic => Box::new(ZicTrader::new(id, ZicConfig { seed: Some(seed) })),
        StrategyKind::Shaver => Box::new(ShaverTrader::new(id)),
        StrategyKind::ImpactSensitive => {
            Box::new(ImpactSensitiveTrader::new(id, signal.impact_config(false)))
        }
        StrategyKind::ImpactSensitiveFiltered => {
            Box::new(ImpactSensitiveTrader::new(id, signal.impact_config(true)))
        }
    }
}
