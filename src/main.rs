use anyhow::Result;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trading_journal::api::AppState;
use trading_journal::config::AppConfig;
use trading_journal::create_router;
use trading_journal::infrastructure::{InMemoryStore, JournalStore, RedisStore, SystemClock};
use trading_journal::services::TradeJournal;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting Trading Journal Backend");

    let config = AppConfig::from_env()?;

    info!("Configuration:");
    info!("  Port: {}", config.port);
    info!("  Day offset: {}", config.utc_offset);
    info!(
        "  Default limits: per-trade {}, daily {}",
        config.default_risk.per_trade_limit, config.default_risk.daily_limit
    );
    info!("  Dashboard refresh: {:?}", config.dashboard_refresh);

    let store: Arc<dyn JournalStore> = match &config.redis_url {
        Some(url) => {
            info!("  Store: redis ({})", url);
            Arc::new(RedisStore::new(url.clone())?)
        }
        None => {
            info!("  Store: in-memory (REDIS_URL not set, trades are lost on restart)");
            Arc::new(InMemoryStore::new())
        }
    };

    let journal = Arc::new(TradeJournal::new(
        store,
        Arc::new(SystemClock),
        config.journal_config(),
    ));
    info!("Trade journal initialized");

    let state = AppState {
        journal,
        dashboard_refresh: config.dashboard_refresh,
    };

    // Create router with middleware
    let app = create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start HTTP server
    let addr = format!("0.0.0.0:{}", config.port);
    info!("HTTP server starting on {}", addr);
    info!("Dashboard stream at ws://{}/users/:owner/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
