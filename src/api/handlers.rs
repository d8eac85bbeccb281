use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{dto::*, errors::ApiError};
use crate::domain::{DashboardMetrics, RiskConfig, StatsSnapshot};
use crate::services::TradeJournal;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<TradeJournal>,
    pub dashboard_refresh: Duration,
}

/// GET /health - Health check
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "trading-journal"
    }))
}

/// POST /users/:owner/trades - Validate and record a trade
pub async fn record_trade(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    payload: Result<Json<RecordTradeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TradeDto>), ApiError> {
    let Json(payload) = payload?;
    let new_trade = payload.into_new_trade()?;

    let trade = state.journal.record_trade(&owner, new_trade).await?;

    Ok((StatusCode::CREATED, Json(TradeDto::from(trade))))
}

/// GET /users/:owner/trades - Most recent trades, newest first
pub async fn get_trade_history(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<TradeDto>>, ApiError> {
    let Query(query) = query?;
    let trades = state
        .journal
        .trade_history(&owner, query.limit)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to load trades: {}", e)))?;

    Ok(Json(trades.into_iter().map(TradeDto::from).collect()))
}

/// GET /users/:owner/stats - Stats for a day (today by default)
pub async fn get_stats(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    let Query(query) = query?;
    let stats = state
        .journal
        .stats(&owner, query.day)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to compute stats: {}", e)))?;

    Ok(Json(stats))
}

/// GET /users/:owner/dashboard - Stats plus risk gauge for a day
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let Query(query) = query?;
    let dashboard = state
        .journal
        .dashboard(&owner, query.day)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to build dashboard: {}", e)))?;

    Ok(Json(dashboard))
}

/// GET /users/:owner/risk-config - Current risk settings
pub async fn get_risk_config(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<RiskConfig>, ApiError> {
    let config = state
        .journal
        .risk_config(&owner)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to load risk config: {}", e)))?;

    Ok(Json(config))
}

/// PUT /users/:owner/risk-config - Merge new risk settings
pub async fn update_risk_config(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    payload: Result<Json<UpdateRiskConfigRequest>, JsonRejection>,
) -> Result<Json<RiskConfig>, ApiError> {
    let Json(payload) = payload?;
    let update = payload.into_update()?;

    let config = state.journal.update_risk_config(&owner, update).await?;

    Ok(Json(config))
}
