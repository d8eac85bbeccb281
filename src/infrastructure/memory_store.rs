use crate::domain::{RiskConfig, Trade};
use crate::infrastructure::{RiskConfigStore, TradeStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Used when no Redis URL is configured and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// owner -> trades in insertion order
    trades: Arc<RwLock<HashMap<String, Vec<Trade>>>>,

    /// owner -> risk config
    configs: Arc<RwLock<HashMap<String, RiskConfig>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeStore for InMemoryStore {
    async fn load_trades(&self, owner_id: &str) -> Result<Vec<Trade>> {
        let trades = self.trades.read().await;
        Ok(trades.get(owner_id).cloned().unwrap_or_default())
    }

    async fn append_trade(&self, owner_id: &str, trade: &Trade) -> Result<()> {
        let mut trades = self.trades.write().await;
        trades
            .entry(owner_id.to_string())
            .or_default()
            .push(trade.clone());
        Ok(())
    }
}

#[async_trait]
impl RiskConfigStore for InMemoryStore {
    async fn load_risk_config(&self, owner_id: &str) -> Result<Option<RiskConfig>> {
        Ok(self.configs.read().await.get(owner_id).copied())
    }

    async fn save_risk_config(&self, owner_id: &str, config: &RiskConfig) -> Result<()> {
        self.configs
            .write()
            .await
            .insert(owner_id.to_string(), *config);
        Ok(())
    }
}
