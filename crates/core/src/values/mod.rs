mod ids;
mod price;
mod quantity;
mod side;

pub use ids::{OrderId, TradeId, TraderId};
pub use price::Price;
pub use quantity::Quantity;
pub use side::Side;

/// Discrete simulated time. One tick = one scheduler step.
pub type Tick = u64;
