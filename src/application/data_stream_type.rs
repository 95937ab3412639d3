// Data stream type plugins backed by an influxdb server
use crate::application::client_factory::{ClientFactory, ClientFactoryError};
use crate::domain::data_stream::DataStream;
use crate::domain::server_config::ClientOverrides;
use crate::infrastructure::influx_client::InfluxdbServerClient;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait InfluxdbDataStreamType: Send + Sync {
    /// Retrieve an influxdb client for a data stream of this type
    async fn get_client(
        &self,
        data_stream: &DataStream,
        overrides: ClientOverrides,
    ) -> Result<InfluxdbServerClient, ClientFactoryError>;
}

/// Shared base for influxdb data stream type plugins.
#[derive(Clone)]
pub struct InfluxdbBase {
    plugin_id: String,
    factory: Arc<ClientFactory>,
}

impl InfluxdbBase {
    pub fn new(plugin_id: impl Into<String>, factory: Arc<ClientFactory>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            factory,
        }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }
}

#[async_trait]
impl InfluxdbDataStreamType for InfluxdbBase {
    async fn get_client(
        &self,
        data_stream: &DataStream,
        overrides: ClientOverrides,
    ) -> Result<InfluxdbServerClient, ClientFactoryError> {
        tracing::debug!(
            "Plugin {} requested a client for data stream {}",
            self.plugin_id,
            data_stream.id
        );
        self.factory
            .create_client_from_data_stream(data_stream, overrides)
            .await
    }
}
