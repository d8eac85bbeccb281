use crate::domain::RiskConfig;
use crate::services::{DayCalendar, JournalConfig};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// No URL means trades are kept in memory only.
    pub redis_url: Option<String>,
    pub default_risk: RiskConfig,
    pub utc_offset: FixedOffset,
    pub dashboard_refresh: Duration,
    pub history_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = RiskConfig::default();

        let utc_offset = match std::env::var("JOURNAL_UTC_OFFSET") {
            Ok(raw) => raw
                .parse::<FixedOffset>()
                .with_context(|| format!("Invalid JOURNAL_UTC_OFFSET: {}", raw))?,
            Err(_) => DayCalendar::local().offset(),
        };

        Ok(Self {
            port: env_or("PORT", 3000)?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            default_risk: RiskConfig {
                daily_limit: env_or("DAILY_RISK_LIMIT", defaults.daily_limit)?,
                per_trade_limit: env_or("TRADE_RISK_LIMIT", defaults.per_trade_limit)?,
                alert_threshold_pct: env_or(
                    "RISK_ALERT_THRESHOLD_PCT",
                    defaults.alert_threshold_pct,
                )?,
            }
            .apply(&Default::default())
            .context("Risk limits must not be negative")?,
            utc_offset,
            dashboard_refresh: refresh_interval(env_or("DASHBOARD_REFRESH_MS", 5000)?)
                .context("Invalid DASHBOARD_REFRESH_MS")?,
            history_limit: env_or("HISTORY_LIMIT", 10)?,
        })
    }

    pub fn journal_config(&self) -> JournalConfig {
        JournalConfig {
            calendar: DayCalendar::new(self.utc_offset),
            default_risk: self.default_risk,
            history_limit: self.history_limit,
        }
    }
}

/// Dashboard push period. `tokio::time::interval` panics on a zero period.
fn refresh_interval(millis: u64) -> Result<Duration> {
    anyhow::ensure!(millis > 0, "refresh interval must be at least 1ms");
    Ok(Duration::from_millis(millis))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}={}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}
