use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded trade. `profit` and `risk` are never mutated once the trade
/// has been accepted into the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub profit: Option<Decimal>,
    #[serde(default)]
    pub risk: Option<Decimal>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Trade {
    /// Build a trade from user input, stamping it with a fresh id.
    pub fn from_new(owner_id: impl Into<String>, timestamp: DateTime<Utc>, new: NewTrade) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            timestamp,
            profit: new.profit,
            risk: new.risk,
            symbol: new.symbol,
            setup: new.setup,
            notes: new.notes,
        }
    }

    /// Profit with a missing value counted as breakeven.
    pub fn profit_or_zero(&self) -> Decimal {
        self.profit.unwrap_or(Decimal::ZERO)
    }

    /// Risk with a missing value counted as zero.
    pub fn risk_or_zero(&self) -> Decimal {
        self.risk.unwrap_or(Decimal::ZERO)
    }

    pub fn is_win(&self) -> bool {
        self.profit_or_zero() > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.profit_or_zero() < Decimal::ZERO
    }
}

/// User-supplied fields of a trade that has not been recorded yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTrade {
    pub profit: Option<Decimal>,
    pub risk: Option<Decimal>,
    pub symbol: Option<String>,
    pub setup: Option<String>,
    pub notes: Option<String>,
}

impl NewTrade {
    pub fn new(profit: Option<Decimal>, risk: Option<Decimal>) -> Self {
        Self {
            profit,
            risk,
            ..Default::default()
        }
    }
}
