//! Agora Core Domain
//!
//! Pure domain types for the Agora market simulator.
//! This crate contains no I/O and no randomness, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{BookSnapshot, Order, PriceLevel, Trade};
pub use values::{OrderId, Price, Quantity, Side, Tick, TradeId, TraderId};
