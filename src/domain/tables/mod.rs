// ============================================================================
// Concrete Table Groups
// ============================================================================

pub mod securities;
pub mod trading_dates;

pub use securities::{Securities, SecurityRow};
pub use trading_dates::{TradingDates, TradingDatesRow};
