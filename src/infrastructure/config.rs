use crate::application::settings_store::{InfluxdbSettings, SettingsStore};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub settings_path: PathBuf,
    pub data_streams_path: PathBuf,
}

/// Load the service configuration from `config/app` with `FARM_INFLUXDB_*`
/// environment overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("listen_addr", "0.0.0.0:8080")?
        .set_default("settings_path", "config/farm_influxdb.toml")?
        .set_default("data_streams_path", "config/data_streams.toml")?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("FARM_INFLUXDB"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Influxdb settings kept in a TOML file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> anyhow::Result<InfluxdbSettings> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            // No servers have been configured yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(InfluxdbSettings::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn save(&self, settings: &InfluxdbSettings) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(settings).context("Failed to serialize influxdb settings")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::debug!("Wrote influxdb settings to {}", self.path.display());
        Ok(())
    }
}
