// Data stream entities loaded from a TOML file
use crate::application::data_stream_repository::DataStreamRepository;
use crate::domain::data_stream::{DataStream, DataStreamType};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct DataStreamsFile {
    #[serde(default)]
    types: Vec<DataStreamType>,
    #[serde(default)]
    streams: Vec<DataStream>,
}

#[derive(Debug, Clone, Default)]
pub struct FileDataStreamRepository {
    types: HashMap<String, DataStreamType>,
    streams: HashMap<String, DataStream>,
}

impl FileDataStreamRepository {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("No data streams file at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        Self::from_toml(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let file: DataStreamsFile = toml::from_str(contents)?;

        let mut repository = Self::default();
        for stream_type in file.types {
            if repository.types.contains_key(&stream_type.id) {
                anyhow::bail!("Duplicate data stream type \"{}\"", stream_type.id);
            }
            repository.types.insert(stream_type.id.clone(), stream_type);
        }
        for stream in file.streams {
            if !repository.types.contains_key(&stream.type_id) {
                tracing::warn!(
                    "Data stream {} references unknown type {}",
                    stream.id,
                    stream.type_id
                );
            }
            repository.streams.insert(stream.id.clone(), stream);
        }

        tracing::info!(
            "Loaded {} data stream types and {} data streams",
            repository.types.len(),
            repository.streams.len()
        );
        Ok(repository)
    }
}

#[async_trait]
impl DataStreamRepository for FileDataStreamRepository {
    async fn load_stream(&self, stream_id: &str) -> anyhow::Result<Option<DataStream>> {
        Ok(self.streams.get(stream_id).cloned())
    }

    async fn load_type(&self, type_id: &str) -> anyhow::Result<Option<DataStreamType>> {
        Ok(self.types.get(type_id).cloned())
    }
}
