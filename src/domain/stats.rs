use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rollup of a set of trades. Output only, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_profit: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage of winning trades, rounded to two decimals.
    pub win_rate: Decimal,
    pub risk_used: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Normal,
    Elevated,
    Critical,
}

/// Everything the dashboard needs for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub day: NaiveDate,
    pub stats: StatsSnapshot,
    pub daily_limit: Decimal,
    /// Share of the daily limit used, one decimal.
    pub risk_percent: Decimal,
    pub remaining_limit: Decimal,
    pub gains: Decimal,
    pub losses: Decimal,
    pub risk_level: RiskLevel,
    pub alert: bool,
}
