mod order;
mod price_level;
mod snapshot;
mod trade;

pub use order::Order;
pub use price_level::PriceLevel;
pub use snapshot::BookSnapshot;
pub use trade::Trade;
