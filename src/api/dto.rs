use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{InputIssue, NewTrade, RiskConfigUpdate, RiskViolation, Trade};

// Request DTOs

/// Amounts arrive as JSON numbers or numeric strings; anything else is
/// refused with `InvalidInput`.
#[derive(Debug, Default, Deserialize)]
pub struct RecordTradeRequest {
    pub profit: Option<Value>,
    pub risk: Option<Value>,
    pub symbol: Option<String>,
    pub setup: Option<String>,
    pub notes: Option<String>,
}

impl RecordTradeRequest {
    pub fn into_new_trade(self) -> Result<NewTrade, RiskViolation> {
        Ok(NewTrade {
            profit: parse_amount("profit", self.profit.as_ref())?,
            risk: parse_amount("risk", self.risk.as_ref())?,
            symbol: self.symbol,
            setup: self.setup,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRiskConfigRequest {
    pub daily_limit: Option<Value>,
    pub per_trade_limit: Option<Value>,
    pub alert_threshold_pct: Option<Value>,
}

impl UpdateRiskConfigRequest {
    pub fn into_update(self) -> Result<RiskConfigUpdate, RiskViolation> {
        Ok(RiskConfigUpdate {
            daily_limit: parse_amount("daily_limit", self.daily_limit.as_ref())?,
            per_trade_limit: parse_amount("per_trade_limit", self.per_trade_limit.as_ref())?,
            alert_threshold_pct: parse_amount(
                "alert_threshold_pct",
                self.alert_threshold_pct.as_ref(),
            )?,
        })
    }
}

/// Trade history query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Stats / dashboard query parameters
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub day: Option<NaiveDate>,
}

// Response DTOs

#[derive(Debug, Serialize, Deserialize)]
pub struct TradeDto {
    pub id: Uuid,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
    pub profit: Option<Decimal>,
    pub risk: Option<Decimal>,
    pub symbol: Option<String>,
    pub setup: Option<String>,
    pub notes: Option<String>,
}

impl From<Trade> for TradeDto {
    fn from(trade: Trade) -> Self {
        Self {
            id: trade.id,
            owner_id: trade.owner_id,
            timestamp: trade.timestamp,
            profit: trade.profit,
            risk: trade.risk,
            symbol: trade.symbol,
            setup: trade.setup,
            notes: trade.notes,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<RiskViolation>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            violation: None,
        }
    }
}

fn parse_amount(field: &str, value: Option<&Value>) -> Result<Option<Decimal>, RiskViolation> {
    let not_numeric = || RiskViolation::InvalidInput {
        field: field.to_string(),
        issue: InputIssue::NotNumeric,
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).map(Some).ok_or_else(not_numeric),
        Some(Value::String(s)) => parse_decimal(s.trim()).map(Some).ok_or_else(not_numeric),
        Some(_) => Err(not_numeric()),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(value: Value) -> RecordTradeRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numbers_and_numeric_strings_are_accepted() {
        let trade = request(json!({ "profit": -40.5, "risk": "30.25" }))
            .into_new_trade()
            .unwrap();

        assert_eq!(trade.profit, Some(dec!(-40.5)));
        assert_eq!(trade.risk, Some(dec!(30.25)));
    }

    #[test]
    fn test_missing_and_null_amounts_are_none() {
        let trade = request(json!({ "risk": null })).into_new_trade().unwrap();

        assert_eq!(trade.profit, None);
        assert_eq!(trade.risk, None);
    }

    #[test]
    fn test_non_numeric_risk_is_invalid_input() {
        for bad in [json!("abc"), json!(true), json!([1]), json!({ "v": 1 })] {
            let err = request(json!({ "risk": bad })).into_new_trade().unwrap_err();

            assert_eq!(
                err,
                RiskViolation::InvalidInput {
                    field: "risk".to_string(),
                    issue: InputIssue::NotNumeric,
                }
            );
        }
    }

    #[test]
    fn test_decimal_precision_is_kept() {
        let trade = request(json!({ "risk": 500.01 })).into_new_trade().unwrap();

        assert_eq!(trade.risk, Some(dec!(500.01)));
    }
}
