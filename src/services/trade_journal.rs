use crate::domain::{
    DashboardMetrics, NewTrade, RiskConfig, RiskConfigUpdate, RiskViolation, StatsSnapshot, Trade,
};
use crate::infrastructure::{Clock, JournalStore};
use crate::services::{DashboardCalculator, DayCalendar, RiskValidator, StatsAggregator};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("trade rejected: {0}")]
    Rejected(#[from] RiskViolation),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Settings the journal falls back on when an owner has not saved their own.
#[derive(Debug, Clone, Copy)]
pub struct JournalConfig {
    pub calendar: DayCalendar,
    pub default_risk: RiskConfig,
    pub history_limit: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            calendar: DayCalendar::default(),
            default_risk: RiskConfig::default(),
            history_limit: 10,
        }
    }
}

/// Trade Journal
///
/// Owns the validate-then-append sequence. Submissions for the same owner are
/// serialized behind a per-owner lock so two trades that each fit the daily
/// limit cannot both be accepted when together they exceed it.
pub struct TradeJournal {
    store: Arc<dyn JournalStore>,
    clock: Arc<dyn Clock>,
    config: JournalConfig,
    validator: RiskValidator,
    aggregator: StatsAggregator,

    /// owner -> write lock, only for owners with a submission in flight
    owner_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl TradeJournal {
    pub fn new(store: Arc<dyn JournalStore>, clock: Arc<dyn Clock>, config: JournalConfig) -> Self {
        Self {
            store,
            clock,
            validator: RiskValidator::new(config.calendar),
            aggregator: StatsAggregator::new(config.calendar),
            config,
            owner_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Current calendar day according to the journal's clock.
    pub fn today(&self) -> NaiveDate {
        self.config.calendar.day_of(&self.clock.now())
    }

    /// Validate `new_trade` against everything the owner has recorded and
    /// append it when it fits. Rejected trades are never stored.
    pub async fn record_trade(&self, owner_id: &str, new_trade: NewTrade) -> Result<Trade, JournalError> {
        let lock = self.owner_lock(owner_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.validate_and_append(owner_id, new_trade).await
        };
        drop(lock);
        self.release_owner_lock(owner_id).await;

        result
    }

    async fn validate_and_append(&self, owner_id: &str, new_trade: NewTrade) -> Result<Trade, JournalError> {
        let trade = Trade::from_new(owner_id, self.clock.now(), new_trade);
        let existing = self
            .store
            .load_trades(owner_id)
            .await
            .context("Failed to load trades")?;
        let config = self.risk_config(owner_id).await?;

        if let Err(violation) = self.validator.validate(&trade, &existing, &config.limits()) {
            warn!(
                "Rejected trade for {} (risk {:?}): {}",
                owner_id, trade.risk, violation
            );
            return Err(violation.into());
        }

        self.store
            .append_trade(owner_id, &trade)
            .await
            .context("Failed to append trade")?;

        info!(
            "Recorded trade {} for {} (profit {:?}, risk {:?})",
            trade.id, owner_id, trade.profit, trade.risk
        );

        Ok(trade)
    }

    /// Most recent trades first, at most `limit`. A missing or zero limit
    /// falls back to the configured default.
    pub async fn trade_history(&self, owner_id: &str, limit: Option<usize>) -> Result<Vec<Trade>> {
        let limit = limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.config.history_limit);
        let trades = self.store.load_trades(owner_id).await?;

        Ok(trades.into_iter().rev().take(limit).collect())
    }

    /// Stats for `day`, or for today when no day is given.
    pub async fn stats(&self, owner_id: &str, day: Option<NaiveDate>) -> Result<StatsSnapshot> {
        let day = day.unwrap_or_else(|| self.today());
        let trades = self.store.load_trades(owner_id).await?;

        Ok(self.aggregator.aggregate(&trades, Some(day)))
    }

    pub async fn dashboard(&self, owner_id: &str, day: Option<NaiveDate>) -> Result<DashboardMetrics> {
        let day = day.unwrap_or_else(|| self.today());
        let stats = self.stats(owner_id, Some(day)).await?;
        let config = self.risk_config(owner_id).await?;

        debug!(
            "Dashboard for {} on {}: {} trades, risk used {}",
            owner_id, day, stats.total_trades, stats.risk_used
        );

        Ok(DashboardCalculator::build(day, stats, &config))
    }

    pub async fn risk_config(&self, owner_id: &str) -> Result<RiskConfig> {
        let stored = self
            .store
            .load_risk_config(owner_id)
            .await
            .context("Failed to load risk config")?;

        Ok(stored.unwrap_or(self.config.default_risk))
    }

    /// Merge `update` over the owner's current config and persist it.
    pub async fn update_risk_config(
        &self,
        owner_id: &str,
        update: RiskConfigUpdate,
    ) -> Result<RiskConfig, JournalError> {
        let lock = self.owner_lock(owner_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.merge_and_save(owner_id, update).await
        };
        drop(lock);
        self.release_owner_lock(owner_id).await;

        result
    }

    async fn merge_and_save(
        &self,
        owner_id: &str,
        update: RiskConfigUpdate,
    ) -> Result<RiskConfig, JournalError> {
        let merged = self.risk_config(owner_id).await?.apply(&update)?;
        self.store
            .save_risk_config(owner_id, &merged)
            .await
            .context("Failed to save risk config")?;

        info!(
            "Updated risk config for {}: per-trade {}, daily {}",
            owner_id, merged.per_trade_limit, merged.daily_limit
        );

        Ok(merged)
    }

    /// Owners with a write lock currently held or waited on.
    pub async fn locked_owners(&self) -> usize {
        self.owner_locks.read().await.len()
    }

    async fn owner_lock(&self, owner_id: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.owner_locks.read().await.get(owner_id) {
            return Arc::clone(lock);
        }

        let mut locks = self.owner_locks.write().await;
        Arc::clone(locks.entry(owner_id.to_string()).or_default())
    }

    /// Drop the owner's lock entry once no other task holds a handle to it.
    /// Handles are only cloned out of the map under its lock, so a count of
    /// one means nobody is waiting.
    async fn release_owner_lock(&self, owner_id: &str) {
        let mut locks = self.owner_locks.write().await;
        if locks
            .get(owner_id)
            .map_or(false, |lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(owner_id);
        }
    }
}
