pub mod models;
pub mod symbol;

pub use models::{InfoRecord, Quote, TickerInfo};
pub use symbol::{Symbol, GOLD_SPOT_TICKER};
