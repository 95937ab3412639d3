// Repository trait for data stream entity lookups
use crate::domain::data_stream::{DataStream, DataStreamType};
use async_trait::async_trait;

#[async_trait]
pub trait DataStreamRepository: Send + Sync {
    /// Load a data stream by ID
    async fn load_stream(&self, stream_id: &str) -> anyhow::Result<Option<DataStream>>;

    /// Load a data stream type by ID
    async fn load_type(&self, type_id: &str) -> anyhow::Result<Option<DataStreamType>>;
}
