use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two limits a candidate trade is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub per_trade_limit: Decimal,
    pub daily_limit: Decimal,
}

/// Per-user risk settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub daily_limit: Decimal,
    pub per_trade_limit: Decimal,
    /// Dashboard alert fires once this share of the daily limit is used.
    pub alert_threshold_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            daily_limit: Decimal::from(1000),
            per_trade_limit: Decimal::from(500),
            alert_threshold_pct: Decimal::from(80),
        }
    }
}

impl RiskConfig {
    pub fn limits(&self) -> RiskLimits {
        RiskLimits {
            per_trade_limit: self.per_trade_limit,
            daily_limit: self.daily_limit,
        }
    }

    /// Merge a partial update over this config. Fields left out of the
    /// update keep their current value.
    pub fn apply(&self, update: &RiskConfigUpdate) -> Result<Self, RiskViolation> {
        let merged = Self {
            daily_limit: update.daily_limit.unwrap_or(self.daily_limit),
            per_trade_limit: update.per_trade_limit.unwrap_or(self.per_trade_limit),
            alert_threshold_pct: update
                .alert_threshold_pct
                .unwrap_or(self.alert_threshold_pct),
        };

        for (field, value) in [
            ("daily_limit", merged.daily_limit),
            ("per_trade_limit", merged.per_trade_limit),
            ("alert_threshold_pct", merged.alert_threshold_pct),
        ] {
            if value < Decimal::ZERO {
                return Err(RiskViolation::InvalidInput {
                    field: field.to_string(),
                    issue: InputIssue::Negative,
                });
            }
        }

        Ok(merged)
    }
}

/// Partial risk config change; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfigUpdate {
    pub daily_limit: Option<Decimal>,
    pub per_trade_limit: Option<Decimal>,
    pub alert_threshold_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputIssue {
    Negative,
    NotNumeric,
}

/// Reason a candidate trade (or a config change) was refused.
///
/// Carries the numbers involved rather than a rendered message so callers can
/// phrase the rejection however they like.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskViolation {
    #[error("invalid {field}: {issue:?}")]
    InvalidInput { field: String, issue: InputIssue },

    #[error("trade risk {risk} exceeds per-trade limit {limit}")]
    PerTradeLimitExceeded { risk: Decimal, limit: Decimal },

    #[error("daily risk {todays_risk} exceeds daily limit {limit}")]
    DailyLimitExceeded { todays_risk: Decimal, limit: Decimal },
}
