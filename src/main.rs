use axum::{routing::get, Router};
use riskboard::config::Config;
use riskboard::services::DashboardEngine;
use riskboard::tui::{self, LogBuffer, LogMakeWriter};
use riskboard::{api, websocket, AppState};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log lines kept for the terminal logs view.
const LOG_CAPACITY: usize = 1_000;

fn init_tracing(config: &Config, logs: &Arc<LogBuffer>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "riskboard=info,tower_http=info".into());

    if config.tui_enabled {
        // The terminal belongs to the TUI; logs go to the in-memory buffer
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(LogMakeWriter::new(logs.clone())),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .route("/ws", get(websocket::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env());
    let logs = Arc::new(LogBuffer::new(LOG_CAPACITY));
    init_tracing(&config, &logs);

    info!(
        "Starting Riskboard (api: {}, tui: {}, seed: {:?})",
        config.api_enabled, config.tui_enabled, config.rng_seed
    );

    let engine = DashboardEngine::start(config.dashboard(), config.rng_seed);
    let state = AppState::new(config.clone(), engine.clone());

    let server = if config.api_enabled {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Riskboard server listening on {}", addr);

        let app = router(state.clone());
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("HTTP server error: {}", e);
            }
        }))
    } else {
        None
    };

    if config.tui_enabled {
        tui::run_tui(state, logs).await?;
    } else {
        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");
    }

    engine.shutdown().await;
    if let Some(server) = server {
        server.abort();
    }

    Ok(())
}
