// HTTP request handlers
use crate::application::data_stream_type::{InfluxdbBase, InfluxdbDataStreamType};
use crate::application::settings_form::{ConnectionTestResult, ServerSettingsForm};
use crate::domain::server_config::{ClientOptions, ClientOverrides};
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

/// Plugin id used when resolving clients for data streams over HTTP
const DATA_STREAM_PLUGIN: &str = "influxdb";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current persisted server list as form state
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServerSettingsForm>, ApiError> {
    let settings = state.settings_store.load().await?;
    Ok(Json(ServerSettingsForm::from_settings(settings)))
}

pub async fn add_server(Json(mut form): Json<ServerSettingsForm>) -> Json<ServerSettingsForm> {
    let delta = form.add_server();
    tracing::debug!("Added server row {}", delta);
    Json(form)
}

pub async fn remove_server(
    Path(delta): Path<usize>,
    Json(mut form): Json<ServerSettingsForm>,
) -> Result<Json<ServerSettingsForm>, ApiError> {
    form.remove_server(delta)?;
    Ok(Json(form))
}

pub async fn test_server(
    Path(delta): Path<usize>,
    Json(form): Json<ServerSettingsForm>,
) -> Result<Json<ConnectionTestResult>, ApiError> {
    Ok(Json(form.test_server(delta).await?))
}

/// Validate and persist the submitted server list
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ServerSettingsForm>,
) -> Result<Json<ServerSettingsForm>, ApiError> {
    let settings = form.submit(state.settings_store.as_ref()).await?;
    Ok(Json(ServerSettingsForm::from_settings(settings)))
}

/// Resolved client options for a server id, token redacted
pub async fn server_client(
    Path(server_id): Path<String>,
    Query(overrides): Query<ClientOverrides>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClientOptions>, ApiError> {
    let factory = state.client_factory().await?;
    let client = factory.create_client_from_server_config(&server_id, overrides)?;
    Ok(Json(client.options().redacted()))
}

pub async fn data_stream_type_client(
    Path(type_id): Path<String>,
    Query(overrides): Query<ClientOverrides>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClientOptions>, ApiError> {
    let factory = state.client_factory().await?;
    let client = factory
        .create_client_from_data_stream_type(&type_id, overrides)
        .await?;
    Ok(Json(client.options().redacted()))
}

pub async fn data_stream_client(
    Path(stream_id): Path<String>,
    Query(overrides): Query<ClientOverrides>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClientOptions>, ApiError> {
    let factory = state.client_factory().await?;
    let data_stream = factory.load_data_stream(&stream_id).await?;

    let plugin = InfluxdbBase::new(DATA_STREAM_PLUGIN, Arc::new(factory));
    let client = plugin.get_client(&data_stream, overrides).await?;
    Ok(Json(client.options().redacted()))
}
