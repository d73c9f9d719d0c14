pub mod cache;
pub mod calculator;

pub use cache::{CacheKey, EquityCache};
pub use calculator::{calculate_equities, EquityCurves, Position, SEED_EQUITY};
