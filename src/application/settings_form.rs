// Settings form - Add, remove, test and save influxdb servers
use crate::application::settings_store::{InfluxdbSettings, SettingsStore};
use crate::domain::server_config::{ClientOptions, ClientOverrides, ServerConfig};
use crate::infrastructure::influx_client::InfluxdbServerClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("There is no server at delta {0}.")]
    UnknownDelta(usize),

    #[error("The influxdb settings are invalid: {}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Outcome of a connectivity check against one server row.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTestResult {
    pub delta: usize,
    pub success: bool,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

/// Editable state of the server list.
///
/// Rows are keyed by delta. Removing a row never renumbers the others, so a
/// delta keeps pointing at the same server for the lifetime of the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettingsForm {
    #[serde(default)]
    pub servers: BTreeMap<usize, ServerConfig>,
    #[serde(default, skip_deserializing)]
    pub rebuild: bool,
}

impl ServerSettingsForm {
    pub fn from_settings(settings: InfluxdbSettings) -> Self {
        Self {
            servers: settings.servers.into_iter().enumerate().collect(),
            rebuild: false,
        }
    }

    /// Append a blank server and return its delta
    pub fn add_server(&mut self) -> usize {
        let delta = self
            .servers
            .last_key_value()
            .map(|(delta, _)| delta + 1)
            .unwrap_or(0);
        let label = format!("Server {}", self.servers.len() + 1);

        self.servers.insert(delta, ServerConfig::draft(label));
        self.rebuild = true;
        delta
    }

    pub fn remove_server(&mut self, delta: usize) -> Result<ServerConfig, SettingsError> {
        let removed = self
            .servers
            .remove(&delta)
            .ok_or(SettingsError::UnknownDelta(delta))?;
        self.rebuild = true;
        Ok(removed)
    }

    /// Heading for a server row: the label, followed by the id once set
    pub fn details_title(&self, delta: usize) -> Option<String> {
        self.servers.get(&delta).map(|server| {
            if server.id.is_empty() {
                server.label.clone()
            } else {
                format!("{} ({})", server.label, server.id)
            }
        })
    }

    /// Check that a server row can reach its InfluxDB instance.
    ///
    /// Connection problems are reported in the result, only an unknown delta
    /// is an error.
    pub async fn test_server(&self, delta: usize) -> Result<ConnectionTestResult, SettingsError> {
        let server = self
            .servers
            .get(&delta)
            .ok_or(SettingsError::UnknownDelta(delta))?;

        let outcome = match InfluxdbServerClient::new(ClientOptions::merge(
            server,
            ClientOverrides::default(),
        )) {
            Ok(client) => client.list_organizations().await,
            Err(e) => Err(e),
        };

        let (success, message) = match outcome {
            Ok(orgs) => {
                tracing::info!("Connection test for server {} succeeded", server.label);
                (
                    true,
                    format!(
                        "Successfully connected to {}. Found {} organizations.",
                        server.label,
                        orgs.len()
                    ),
                )
            }
            Err(e) => {
                tracing::error!("Connection test for server {} failed: {:#}", server.label, e);
                (false, format!("Connection to {} failed: {:#}", server.label, e))
            }
        };

        Ok(ConnectionTestResult {
            delta,
            success,
            message,
            checked_at: Utc::now(),
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (delta, server) in &self.servers {
            let name = if server.label.trim().is_empty() {
                format!("Server at delta {}", delta)
            } else {
                server.label.clone()
            };

            if server.label.trim().is_empty() {
                errors.push(format!("{}: label is required.", name));
            }
            if server.id.is_empty() {
                errors.push(format!("{}: server ID is required.", name));
            } else if !is_machine_name(&server.id) {
                errors.push(format!(
                    "{}: server ID must contain only lowercase letters, numbers and underscores.",
                    name
                ));
            } else if !seen.insert(server.id.as_str()) {
                errors.push(format!("{}: server ID \"{}\" is already in use.", name, server.id));
            }
            if server.url.is_empty() {
                errors.push(format!("{}: URL is required.", name));
            } else if !is_http_url(&server.url) {
                errors.push(format!("{}: URL \"{}\" is not a valid http(s) URL.", name, server.url));
            }
            if server.token.is_empty() {
                errors.push(format!("{}: token is required.", name));
            }
            if server.timeout == 0 {
                errors.push(format!("{}: timeout must be at least 1 second.", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Invalid(errors))
        }
    }

    pub fn into_settings(self) -> InfluxdbSettings {
        InfluxdbSettings {
            servers: self.servers.into_values().collect(),
        }
    }

    /// Validate and persist the server list in delta order
    pub async fn submit(self, store: &dyn SettingsStore) -> Result<InfluxdbSettings, SettingsError> {
        self.validate()?;

        let settings = self.into_settings();
        store.save(&settings).await?;
        tracing::info!("Saved {} influxdb servers", settings.servers.len());
        Ok(settings)
    }
}

fn is_machine_name(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_http_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::client_factory::tests::server;
    use crate::infrastructure::influx_client::stub;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemorySettingsStore {
        pub settings: Mutex<InfluxdbSettings>,
    }

    #[async_trait]
    impl SettingsStore for MemorySettingsStore {
        async fn load(&self) -> anyhow::Result<InfluxdbSettings> {
            Ok(self.settings.lock().await.clone())
        }

        async fn save(&self, settings: &InfluxdbSettings) -> anyhow::Result<()> {
            *self.settings.lock().await = settings.clone();
            Ok(())
        }
    }

    fn form() -> ServerSettingsForm {
        ServerSettingsForm::from_settings(InfluxdbSettings {
            servers: vec![
                server("primary", "https://primary.example.com"),
                server("backup", "https://backup.example.com"),
                server("lab", "https://lab.example.com"),
            ],
        })
    }

    #[test]
    fn test_add_server_appends_default_row() {
        let mut form = form();
        let delta = form.add_server();

        assert_eq!(delta, 3);
        assert!(form.rebuild);
        let added = &form.servers[&delta];
        assert_eq!(added.label, "Server 4");
        assert!(added.verify_ssl);
        assert_eq!(added.timeout, 10);
        assert!(added.id.is_empty());
        assert_eq!(form.details_title(delta).as_deref(), Some("Server 4"));
    }

    #[test]
    fn test_add_server_to_empty_form() {
        let mut form = ServerSettingsForm::default();
        assert_eq!(form.add_server(), 0);
        assert_eq!(form.servers[&0].label, "Server 1");
    }

    #[test]
    fn test_remove_server_keeps_other_rows() {
        let mut form = form();
        let removed = form.remove_server(1).unwrap();

        assert_eq!(removed.id, "backup");
        assert!(form.rebuild);
        assert_eq!(form.servers.len(), 2);
        assert_eq!(form.servers[&0].id, "primary");
        assert_eq!(form.servers[&2].id, "lab");
        assert_eq!(form.details_title(2).as_deref(), Some("Server lab (lab)"));

        // A new row does not reuse the removed delta
        let delta = form.add_server();
        assert_eq!(delta, 3);
        assert_eq!(form.servers[&delta].label, "Server 3");
    }

    #[test]
    fn test_remove_unknown_delta() {
        let mut form = form();
        assert!(matches!(form.remove_server(9), Err(SettingsError::UnknownDelta(9))));
        assert!(!form.rebuild);
        assert_eq!(form.servers.len(), 3);
    }

    #[test]
    fn test_validate_rejects_incomplete_rows() {
        let mut form = form();
        form.add_server();

        match form.validate() {
            Err(SettingsError::Invalid(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().all(|e| e.starts_with("Server 4:")));
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_ids_and_bad_values() {
        let mut form = form();
        form.servers.insert(5, server("primary", "https://other.example.com"));
        form.servers.insert(6, server("Bad-Id", "ftp://files.example.com"));

        let Err(SettingsError::Invalid(errors)) = form.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("already in use"));
        assert!(errors[1].contains("lowercase"));
        assert!(errors[2].contains("ftp://files.example.com"));
    }

    #[tokio::test]
    async fn test_submit_persists_rows_in_order() {
        let store = MemorySettingsStore::default();
        let mut form = form();
        form.remove_server(0).unwrap();

        let saved = form.submit(&store).await.unwrap();
        let ids: Vec<_> = saved.servers.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["backup", "lab"]);
        assert_eq!(store.load().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_submit_invalid_form_does_not_persist() {
        let store = MemorySettingsStore::default();
        let mut form = form();
        form.add_server();

        assert!(form.submit(&store).await.is_err());
        assert!(store.load().await.unwrap().servers.is_empty());
    }

    #[tokio::test]
    async fn test_server_connection_success() {
        let url = stub::spawn_influxdb().await;
        let mut form = ServerSettingsForm::default();
        let mut row = server("live", &url);
        row.token = stub::TOKEN.to_string();
        form.servers.insert(0, row);

        let result = form.test_server(0).await.unwrap();
        assert!(result.success);
        assert_eq!(result.delta, 0);
        assert!(result.message.contains("Found 2 organizations"));
    }

    #[tokio::test]
    async fn test_server_connection_failure_is_reported() {
        let url = stub::closed_port_url().await;
        let mut form = ServerSettingsForm::default();
        form.servers.insert(4, server("down", &url));

        let result = form.test_server(4).await.unwrap();
        assert!(!result.success);
        assert!(result.message.starts_with("Connection to Server down failed"));
    }

    #[tokio::test]
    async fn test_server_connection_respects_timeout() {
        let url = stub::spawn_influxdb_with_delay(std::time::Duration::from_secs(4)).await;
        let mut form = ServerSettingsForm::default();
        let mut row = server("slow", &url);
        row.token = stub::TOKEN.to_string();
        row.timeout = 1;
        form.servers.insert(0, row);

        let started = std::time::Instant::now();
        let result = form.test_server(0).await.unwrap();
        assert!(!result.success);
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_server_with_blank_url_is_reported() {
        let mut form = ServerSettingsForm::default();
        form.add_server();

        let result = form.test_server(0).await.unwrap();
        assert!(!result.success);
        assert!(result.message.contains("Invalid InfluxDB URL"));
    }

    #[tokio::test]
    async fn test_server_unknown_delta() {
        assert!(matches!(
            form().test_server(42).await,
            Err(SettingsError::UnknownDelta(42))
        ));
    }
}
