// Client factory - Resolve server ids, data streams and data stream types to clients
use crate::application::data_stream_repository::DataStreamRepository;
use crate::domain::data_stream::DataStream;
use crate::domain::server_config::{ClientOptions, ClientOverrides, ServerConfig};
use crate::infrastructure::influx_client::InfluxdbServerClient;
use std::sync::Arc;

/// Third party settings provider holding the `server_id` binding.
pub const THIRD_PARTY_PROVIDER: &str = "farm_influxdb";
pub const SERVER_ID_SETTING: &str = "server_id";

#[derive(Debug, thiserror::Error)]
pub enum ClientFactoryError {
    #[error("The influxdb server id \"{server_id}\" does not exist. Check the farm_influxdb configuration.")]
    ServerNotFound { server_id: String },

    #[error("The \"{label}\" ({type_id}) data stream type does not have an influxdb server id configured. Check the farm_influxdb configuration.")]
    MissingServerId { type_id: String, label: String },

    #[error("The data stream type \"{type_id}\" does not exist.")]
    DataStreamTypeNotFound { type_id: String },

    #[error("The data stream \"{stream_id}\" does not exist.")]
    DataStreamNotFound { stream_id: String },

    #[error("Failed to build the influxdb client for server \"{server_id}\": {reason:#}")]
    Client {
        server_id: String,
        reason: anyhow::Error,
    },

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

/// Builds InfluxDB clients from the configured server list.
///
/// The server list is a snapshot taken when the factory is created.
#[derive(Clone)]
pub struct ClientFactory {
    servers: Vec<ServerConfig>,
    data_streams: Arc<dyn DataStreamRepository>,
}

impl ClientFactory {
    pub fn new(servers: Vec<ServerConfig>, data_streams: Arc<dyn DataStreamRepository>) -> Self {
        Self {
            servers,
            data_streams,
        }
    }

    /// Resolve client options for a server id. The first server with a
    /// matching id wins.
    pub fn resolve_options(
        &self,
        server_id: &str,
        overrides: ClientOverrides,
    ) -> Result<ClientOptions, ClientFactoryError> {
        let mut matches = self.servers.iter().filter(|s| s.id == server_id);

        let server = matches
            .next()
            .ok_or_else(|| ClientFactoryError::ServerNotFound {
                server_id: server_id.to_string(),
            })?;

        let duplicates = matches.count();
        if duplicates > 0 {
            tracing::warn!(
                "Found {} additional influxdb servers with id {}, using the first",
                duplicates,
                server_id
            );
        }

        Ok(ClientOptions::merge(server, overrides))
    }

    pub async fn resolve_options_for_data_stream_type(
        &self,
        type_id: &str,
        overrides: ClientOverrides,
    ) -> Result<ClientOptions, ClientFactoryError> {
        let stream_type = self.data_streams.load_type(type_id).await?.ok_or_else(|| {
            ClientFactoryError::DataStreamTypeNotFound {
                type_id: type_id.to_string(),
            }
        })?;

        let server_id = stream_type
            .third_party_setting(THIRD_PARTY_PROVIDER, SERVER_ID_SETTING)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientFactoryError::MissingServerId {
                type_id: stream_type.id.clone(),
                label: stream_type.label.clone(),
            })?;

        tracing::debug!("Data stream type {} is bound to server {}", type_id, server_id);
        self.resolve_options(server_id, overrides)
    }

    pub async fn resolve_options_for_data_stream(
        &self,
        data_stream: &DataStream,
        overrides: ClientOverrides,
    ) -> Result<ClientOptions, ClientFactoryError> {
        self.resolve_options_for_data_stream_type(&data_stream.type_id, overrides)
            .await
    }

    pub fn create_client_from_server_config(
        &self,
        server_id: &str,
        overrides: ClientOverrides,
    ) -> Result<InfluxdbServerClient, ClientFactoryError> {
        let options = self.resolve_options(server_id, overrides)?;
        Self::build(options)
    }

    pub async fn create_client_from_data_stream(
        &self,
        data_stream: &DataStream,
        overrides: ClientOverrides,
    ) -> Result<InfluxdbServerClient, ClientFactoryError> {
        let options = self
            .resolve_options_for_data_stream(data_stream, overrides)
            .await?;
        Self::build(options)
    }

    pub async fn create_client_from_data_stream_type(
        &self,
        type_id: &str,
        overrides: ClientOverrides,
    ) -> Result<InfluxdbServerClient, ClientFactoryError> {
        let options = self
            .resolve_options_for_data_stream_type(type_id, overrides)
            .await?;
        Self::build(options)
    }

    /// Look up a data stream entity by id
    pub async fn load_data_stream(&self, stream_id: &str) -> Result<DataStream, ClientFactoryError> {
        self.data_streams
            .load_stream(stream_id)
            .await?
            .ok_or_else(|| ClientFactoryError::DataStreamNotFound {
                stream_id: stream_id.to_string(),
            })
    }

    fn build(options: ClientOptions) -> Result<InfluxdbServerClient, ClientFactoryError> {
        let server_id = options.server_id.clone();
        let client = InfluxdbServerClient::new(options)
            .map_err(|reason| ClientFactoryError::Client {
                server_id: server_id.clone(),
                reason,
            })?;

        tracing::info!("Created influxdb client for server {}", server_id);
        Ok(client)
    }
}
