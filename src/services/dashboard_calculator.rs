use crate::domain::{DashboardMetrics, RiskConfig, RiskLevel, StatsSnapshot};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

const ELEVATED_RISK_PCT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const CRITICAL_RISK_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

pub struct DashboardCalculator;

impl DashboardCalculator {
    /// Assemble the dashboard view of one day from its stats and the owner's
    /// risk config.
    pub fn build(day: NaiveDate, stats: StatsSnapshot, config: &RiskConfig) -> DashboardMetrics {
        let risk_percent = Self::risk_percent(stats.risk_used, config.daily_limit);
        let (gains, losses) = Self::profit_split(stats.total_profit);

        DashboardMetrics {
            day,
            daily_limit: config.daily_limit,
            remaining_limit: Self::remaining_limit(stats.risk_used, config.daily_limit),
            risk_level: Self::risk_level(risk_percent),
            alert: risk_percent >= config.alert_threshold_pct,
            risk_percent,
            gains,
            losses,
            stats,
        }
    }

    /// Share of the daily limit consumed, as a percentage with one decimal.
    /// A zero limit reads as fully used once any risk is on the books.
    pub fn risk_percent(risk_used: Decimal, daily_limit: Decimal) -> Decimal {
        if daily_limit <= Decimal::ZERO {
            return if risk_used > Decimal::ZERO {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
        }

        risk_used
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(daily_limit))
            .unwrap_or(Decimal::MAX)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn remaining_limit(risk_used: Decimal, daily_limit: Decimal) -> Decimal {
        daily_limit.saturating_sub(risk_used)
    }

    /// Split net profit into the (gains, losses) pair shown on the P&L bar.
    pub fn profit_split(total_profit: Decimal) -> (Decimal, Decimal) {
        if total_profit > Decimal::ZERO {
            (total_profit, Decimal::ZERO)
        } else {
            (Decimal::ZERO, total_profit.abs())
        }
    }

    pub fn risk_level(risk_percent: Decimal) -> RiskLevel {
        if risk_percent > CRITICAL_RISK_PCT {
            RiskLevel::Critical
        } else if risk_percent > ELEVATED_RISK_PCT {
            RiskLevel::Elevated
        } else {
            RiskLevel::Normal
        }
    }
}
