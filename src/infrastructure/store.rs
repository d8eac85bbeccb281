use crate::domain::{RiskConfig, Trade};
use anyhow::Result;
use async_trait::async_trait;

/// Durable, per-owner trade log. Trades come back in insertion order.
#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn load_trades(&self, owner_id: &str) -> Result<Vec<Trade>>;

    async fn append_trade(&self, owner_id: &str, trade: &Trade) -> Result<()>;
}

/// Per-owner risk settings. `None` means the owner never saved any.
#[async_trait]
pub trait RiskConfigStore: Send + Sync {
    async fn load_risk_config(&self, owner_id: &str) -> Result<Option<RiskConfig>>;

    async fn save_risk_config(&self, owner_id: &str, config: &RiskConfig) -> Result<()>;
}

pub trait JournalStore: TradeStore + RiskConfigStore {}

impl<T: TradeStore + RiskConfigStore> JournalStore for T {}
