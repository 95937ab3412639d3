// InfluxDB client handle built from resolved client options
use crate::domain::server_config::ClientOptions;
use anyhow::{Context, Result};
use influxdb2::api::organization::ListOrganizationRequest;
use influxdb2::models::Organization;
use std::fmt;
use std::time::Duration;

/// A configured InfluxDB client.
///
/// The SDK client shares one HTTP stack carrying the configured timeout and
/// TLS verification policy.
pub struct InfluxdbServerClient {
    options: ClientOptions,
    sdk: influxdb2::Client,
}

impl InfluxdbServerClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let parsed = reqwest::Url::parse(&options.url)
            .with_context(|| format!("Invalid InfluxDB URL \"{}\"", options.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported InfluxDB URL scheme \"{}\"", parsed.scheme());
        }

        let sdk = influxdb2::ClientBuilder::with_builder(
            http_builder(&options),
            options.url.trim_end_matches('/'),
            options.org.clone().unwrap_or_default(),
            options.token.clone(),
        )
        .build()
        .context("Failed to build InfluxDB client")?;

        Ok(Self { options, sdk })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn sdk(&self) -> &influxdb2::Client {
        &self.sdk
    }

    /// List the organizations visible to the configured token
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let organizations = self
            .sdk()
            .list_organizations(ListOrganizationRequest::default())
            .await
            .context("Failed to list InfluxDB organizations")?;

        tracing::debug!(
            "Listed {} organizations on {}",
            organizations.orgs.len(),
            self.options.url
        );
        Ok(organizations.orgs)
    }
}

fn http_builder(options: &ClientOptions) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder();
    if options.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(options.timeout));
    }
    builder.danger_accept_invalid_certs(!options.verify_ssl)
}

impl fmt::Debug for InfluxdbServerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxdbServerClient")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn options(url: String, token: &str) -> ClientOptions {
        ClientOptions {
            server_id: "primary".to_string(),
            url,
            token: token.to_string(),
            org: Some("farm".to_string()),
            bucket: None,
            timeout: 5,
            verify_ssl: true,
            precision: None,
        }
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(InfluxdbServerClient::new(options("not a url".to_string(), "t")).is_err());
        assert!(InfluxdbServerClient::new(options("ftp://influx.local".to_string(), "t")).is_err());
    }

    #[test]
    fn test_http_builder_carries_timeout_and_tls_policy() {
        let mut opts = options("https://influx.example.com".to_string(), "t");
        opts.timeout = 7;

        let strict = format!("{:?}", http_builder(&opts));
        assert!(strict.contains("timeout: 7s"));
        assert!(!strict.contains("danger_accept_invalid_certs"));

        opts.verify_ssl = false;
        let relaxed = format!("{:?}", http_builder(&opts));
        assert!(relaxed.contains("danger_accept_invalid_certs: true"));
    }

    #[tokio::test]
    async fn test_list_organizations() {
        let url = stub::spawn_influxdb().await;
        let client = InfluxdbServerClient::new(options(format!("{}/", url), stub::TOKEN)).unwrap();

        let orgs = client.list_organizations().await.unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[0].name, "farm");
        assert_eq!(client.sdk().org, "farm");
    }

    #[tokio::test]
    async fn test_list_organizations_with_bad_token() {
        let url = stub::spawn_influxdb().await;
        let client = InfluxdbServerClient::new(options(url, "wrong")).unwrap();

        let err = client.list_organizations().await.unwrap_err();
        assert!(format!("{:#}", err).contains("401"));
    }

    #[tokio::test]
    async fn test_sdk_requests_honour_timeout() {
        let url = stub::spawn_influxdb_with_delay(Duration::from_secs(4)).await;
        let mut opts = options(url, stub::TOKEN);
        opts.timeout = 1;
        let client = InfluxdbServerClient::new(opts).unwrap();

        let started = Instant::now();
        let result = client
            .sdk()
            .list_organizations(ListOrganizationRequest::default())
            .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_client_without_tls_verification() {
        let url = stub::spawn_influxdb().await;
        let mut opts = options(url, stub::TOKEN);
        opts.verify_ssl = false;
        let client = InfluxdbServerClient::new(opts).unwrap();

        assert!(!client.options().verify_ssl);
        assert_eq!(client.list_organizations().await.unwrap().len(), 2);
    }
}
