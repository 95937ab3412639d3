// Store trait for the persisted influxdb settings
use crate::domain::server_config::ServerConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxdbSettings {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<InfluxdbSettings>;

    /// Replace the persisted settings
    async fn save(&self, settings: &InfluxdbSettings) -> anyhow::Result<()>;
}
