use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use stockpulse::config::Config;
use stockpulse::services::{ExportStore, Forecaster, SeasonalTrendModel};
use stockpulse::sources::YahooFinanceClient;
use stockpulse::{api, AppState};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpulse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!(
        "Starting StockPulse server on {}:{}",
        config.host, config.port
    );

    let market = Arc::new(YahooFinanceClient::new());
    let engine = Arc::new(SeasonalTrendModel::default());
    let store = ExportStore::new(Duration::from_secs(config.export_ttl_secs));

    let forecaster = Arc::new(Forecaster::new(
        market,
        engine,
        store.clone(),
        config.clone(),
    ));

    // Create application state
    let state = AppState {
        config: config.clone(),
        forecaster,
        store: store.clone(),
    };

    // Start the periodic export sweep
    {
        let store = store.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                store.cleanup();
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("StockPulse server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
