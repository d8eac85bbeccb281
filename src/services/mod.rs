pub mod dashboard_calculator;
pub mod day_calendar;
pub mod risk_validator;
pub mod stats_aggregator;
pub mod trade_journal;

pub use dashboard_calculator::*;
pub use day_calendar::*;
pub use risk_validator::*;
pub use stats_aggregator::*;
pub use trade_journal::*;
