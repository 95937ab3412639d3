// Server configuration domain models
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_verify_ssl() -> bool {
    true
}

/// A named bundle of InfluxDB connection parameters.
///
/// Rows created in the settings form start out with empty `id`, `url` and
/// `token`, so those fields default to empty strings when deserializing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(rename = "verifySSL", default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

impl ServerConfig {
    /// A blank row as appended by the settings form.
    pub fn draft(label: String) -> Self {
        Self {
            id: String::new(),
            label,
            url: String::new(),
            token: String::new(),
            org: None,
            bucket: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            verify_ssl: true,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WritePrecision {
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

/// Caller supplied client options. Any field set here replaces the value
/// stored in the server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientOverrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub org: Option<String>,
    pub bucket: Option<String>,
    pub timeout: Option<u64>,
    #[serde(rename = "verifySSL")]
    pub verify_ssl: Option<bool>,
    pub precision: Option<WritePrecision>,
}

/// The final option bundle handed to the InfluxDB client.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ClientOptions {
    pub server_id: String,
    pub url: String,
    pub token: String,
    pub org: Option<String>,
    pub bucket: Option<String>,
    pub timeout: u64,
    #[serde(rename = "verifySSL")]
    pub verify_ssl: bool,
    pub precision: Option<WritePrecision>,
}

impl ClientOptions {
    pub fn merge(server: &ServerConfig, overrides: ClientOverrides) -> Self {
        Self {
            server_id: server.id.clone(),
            url: overrides.url.unwrap_or_else(|| server.url.clone()),
            token: overrides.token.unwrap_or_else(|| server.token.clone()),
            org: overrides.org.or_else(|| server.org.clone()),
            bucket: overrides.bucket.or_else(|| server.bucket.clone()),
            timeout: overrides.timeout.unwrap_or(server.timeout),
            verify_ssl: overrides.verify_ssl.unwrap_or(server.verify_ssl),
            precision: overrides.precision,
        }
    }

    /// Copy safe to hand out over the API.
    pub fn redacted(&self) -> Self {
        Self {
            token: "<redacted>".to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("server_id", &self.server_id)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("precision", &self.precision)
            .finish()
    }
}
