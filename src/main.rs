// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::{FileSettingsStore, load_app_config};
use crate::infrastructure::data_stream_store::FileDataStreamRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_server, data_stream_client, data_stream_type_client, get_settings, health_check,
    remove_server, save_settings, server_client, test_server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let app_config = load_app_config()?;
    let settings_store = FileSettingsStore::new(app_config.settings_path.clone());
    let data_streams = FileDataStreamRepository::load(&app_config.data_streams_path).await?;
    tracing::info!("Using influxdb settings at {}", settings_store.path().display());

    // Create application state
    let state = Arc::new(AppState {
        settings_store: Arc::new(settings_store),
        data_streams: Arc::new(data_streams),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/settings/influxdb", get(get_settings).put(save_settings))
        .route("/settings/influxdb/servers", post(add_server))
        .route("/settings/influxdb/servers/:delta/remove", post(remove_server))
        .route("/settings/influxdb/servers/:delta/test", post(test_server))
        .route("/servers/:id/client", get(server_client))
        .route("/data-streams/:id/client", get(data_stream_client))
        .route("/data-stream-types/:id/client", get(data_stream_type_client))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", app_config.listen_addr))?;
    tracing::info!("Starting farm-influxdb service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
