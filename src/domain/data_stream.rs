// Data stream domain models
use serde::Deserialize;
use std::collections::HashMap;

/// A time-series data channel on the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct DataStream {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
}

/// The category of a data stream. Other modules attach their own settings
/// to it, keyed by provider name.
#[derive(Debug, Clone, Deserialize)]
pub struct DataStreamType {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub third_party_settings: HashMap<String, HashMap<String, String>>,
}

impl DataStreamType {
    pub fn third_party_setting(&self, provider: &str, key: &str) -> Option<&str> {
        self.third_party_settings
            .get(provider)
            .and_then(|settings| settings.get(key))
            .map(String::as_str)
    }

    #[cfg(test)]
    pub fn set_third_party_setting(&mut self, provider: &str, key: &str, value: String) {
        self.third_party_settings
            .entry(provider.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}
