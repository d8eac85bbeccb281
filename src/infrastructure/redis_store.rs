//! Redis-backed journal store.
//! Trades live in a list per owner (RPUSH keeps insertion order), the risk
//! config in a plain string key.
use crate::domain::{RiskConfig, Trade};
use crate::infrastructure::{RiskConfigStore, TradeStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

pub struct RedisStore {
    redis_client: redis::Client,
}

impl RedisStore {
    pub fn new(redis_url: String) -> Result<Self> {
        let redis_client =
            redis::Client::open(redis_url).context("Failed to create Redis client")?;

        Ok(Self { redis_client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")
    }

    fn trades_key(owner_id: &str) -> String {
        format!("journal:{}:trades", owner_id)
    }

    fn risk_config_key(owner_id: &str) -> String {
        format!("journal:{}:risk_config", owner_id)
    }
}

#[async_trait]
impl TradeStore for RedisStore {
    async fn load_trades(&self, owner_id: &str) -> Result<Vec<Trade>> {
        let mut conn = self.connection().await?;
        let key = Self::trades_key(owner_id);

        let raw: Vec<String> = conn
            .lrange(&key, 0, -1)
            .await
            .with_context(|| format!("Failed to read {}", key))?;

        let trades = raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<Trade>(entry) {
                Ok(trade) => Some(trade),
                Err(e) => {
                    warn!("Skipping malformed trade in {}: {}", key, e);
                    None
                }
            })
            .collect();

        Ok(trades)
    }

    async fn append_trade(&self, owner_id: &str, trade: &Trade) -> Result<()> {
        let mut conn = self.connection().await?;
        let key = Self::trades_key(owner_id);
        let payload = serde_json::to_string(trade).context("Failed to encode trade")?;

        let _: () = conn
            .rpush(&key, payload)
            .await
            .with_context(|| format!("Failed to append to {}", key))?;

        debug!("Appended trade {} to {}", trade.id, key);
        Ok(())
    }
}

#[async_trait]
impl RiskConfigStore for RedisStore {
    async fn load_risk_config(&self, owner_id: &str) -> Result<Option<RiskConfig>> {
        let mut conn = self.connection().await?;
        let key = Self::risk_config_key(owner_id);

        let raw: Option<String> = conn
            .get(&key)
            .await
            .with_context(|| format!("Failed to read {}", key))?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(config) => Ok(Some(config)),
                Err(e) => {
                    warn!("Ignoring malformed risk config in {}: {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save_risk_config(&self, owner_id: &str, config: &RiskConfig) -> Result<()> {
        let mut conn = self.connection().await?;
        let key = Self::risk_config_key(owner_id);
        let payload = serde_json::to_string(config).context("Failed to encode risk config")?;

        let _: () = conn
            .set(&key, payload)
            .await
            .with_context(|| format!("Failed to write {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_scoped_per_owner() {
        assert_eq!(RedisStore::trades_key("alice"), "journal:alice:trades");
        assert_eq!(
            RedisStore::risk_config_key("alice"),
            "journal:alice:risk_config"
        );
    }

    #[tokio::test]
    async fn test_risk_config_errors_carry_context() -> Result<()> {
        // Nothing listens on port 1
        let store = RedisStore::new("redis://127.0.0.1:1/".to_string())?;

        let load = store.load_risk_config("alice").await.unwrap_err();
        let save = store
            .save_risk_config("alice", &RiskConfig::default())
            .await
            .unwrap_err();

        assert_eq!(load.to_string(), "Failed to connect to Redis");
        assert_eq!(save.to_string(), "Failed to connect to Redis");
        Ok(())
    }
}
