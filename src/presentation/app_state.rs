// Application state for HTTP handlers
use crate::application::client_factory::ClientFactory;
use crate::application::data_stream_repository::DataStreamRepository;
use crate::application::settings_store::SettingsStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings_store: Arc<dyn SettingsStore>,
    pub data_streams: Arc<dyn DataStreamRepository>,
}

impl AppState {
    /// Build a client factory over the currently persisted server list
    pub async fn client_factory(&self) -> anyhow::Result<ClientFactory> {
        let settings = self.settings_store.load().await?;
        Ok(ClientFactory::new(settings.servers, self.data_streams.clone()))
    }
}
