//! Agora Agents
//!
//! Trading strategies that observe market state and decide quote actions.
//! All variants share the `Trader` capability contract and only ever mutate
//! their own balance; regardless of strategy, a trader works one customer
//! assignment (a private limit price) at a time and keeps at most one quote
//! live on the book.

mod giveaway;
mod impact;
mod market_view;
mod shaver;
mod trader;
mod zic;

pub use giveaway::GiveawayTrader;
pub use impact::{ImpactConfig, ImpactSensitiveTrader};
pub use market_view::MarketView;
pub use shaver::ShaverTrader;
pub use trader::{Assignment, FillReport, QuoteRequest, StrategyError, Trader, TraderCore};
pub use zic::{ZicConfig, ZicTrader};
