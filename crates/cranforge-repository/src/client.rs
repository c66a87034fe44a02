//! HTTP client for the package database with retry on server errors.

use crate::error::{RepositoryError, Result};
use crate::source::MetadataSource;
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use cranforge_core::{PackageDependency, PackageVersionId, ResolvedDependencySet};
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the package database.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retries for 5xx responses.
    pub max_retries: usize,
    /// Delay between retries.
    pub retry_delay: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Defaults for the given database root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Override the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: cranforge_config::Config::DEFAULT_PACKAGE_DB_URL.to_string(),
            timeout: Duration::from_secs(cranforge_config::Config::DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: cranforge_config::Config::DEFAULT_MAX_RETRIES,
            retry_delay: Duration::ZERO,
            user_agent: format!("cranforge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&cranforge_config::Config> for ClientConfig {
    fn from(config: &cranforge_config::Config) -> Self {
        Self {
            base_url: config.package_db_url.clone(),
            timeout: config.request_timeout(),
            max_retries: config.max_retries,
            ..Self::default()
        }
    }
}

/// HTTP client statistics.
#[derive(Debug, Default)]
pub struct ClientStats {
    /// Total requests made, including retries.
    pub requests: AtomicU64,
    /// Successful requests (2xx).
    pub successes: AtomicU64,
    /// Client errors (4xx).
    pub client_errors: AtomicU64,
    /// Server errors (5xx).
    pub server_errors: AtomicU64,
    /// Retries attempted.
    pub retries: AtomicU64,
}

impl ClientStats {
    /// Total requests made.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Retries attempted.
    #[must_use]
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }
}

/// Client for the package database HTTP API.
#[derive(Debug)]
pub struct PackageDatabaseClient {
    client: Client,
    base_url: Url,
    config: ClientConfig,
    stats: Arc<ClientStats>,
}

impl PackageDatabaseClient {
    /// Create a client.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| RepositoryError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .zstd(true)
            .default_headers(headers)
            .build()
            .map_err(|e| RepositoryError::InvalidConfig {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            config,
            stats: Arc::new(ClientStats::default()),
        })
    }

    /// Request statistics.
    #[must_use]
    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RepositoryError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot be a base".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let body = self.get_with_retry(url).await?;
        sonic_rs::from_slice(&body).map_err(|e| RepositoryError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_with_retry(&self, url: &Url) -> Result<Vec<u8>> {
        let stats = &self.stats;
        let timeout_secs = self.config.timeout.as_secs();

        (move || async move {
            stats.requests.fetch_add(1, Ordering::Relaxed);
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| transport_error(url, &e, timeout_secs))?;

            let status = response.status();
            if status.is_success() {
                stats.successes.fetch_add(1, Ordering::Relaxed);
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| transport_error(url, &e, timeout_secs))?;
                return Ok(body.to_vec());
            }

            if status.is_server_error() {
                stats.server_errors.fetch_add(1, Ordering::Relaxed);
            } else {
                stats.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            Err(RepositoryError::Network {
                url: url.to_string(),
                message: format!("unexpected status: {status}"),
                status: Some(status.as_u16()),
            })
        })
        .retry(
            ConstantBuilder::default()
                .with_delay(self.config.retry_delay)
                .with_max_times(self.config.max_retries),
        )
        .when(RepositoryError::is_server_error)
        .notify(|err, _| {
            stats.retries.fetch_add(1, Ordering::Relaxed);
            warn!(url = %url, error = %err, "retrying request");
        })
        .await
    }
}

fn transport_error(url: &Url, err: &reqwest::Error, timeout_secs: u64) -> RepositoryError {
    if err.is_timeout() {
        RepositoryError::Timeout {
            url: url.to_string(),
            timeout_secs,
        }
    } else {
        RepositoryError::Network {
            url: url.to_string(),
            message: err.to_string(),
            status: None,
        }
    }
}

#[async_trait]
impl MetadataSource for PackageDatabaseClient {
    async fn resolve_dependencies(&self, id: &PackageVersionId) -> Result<ResolvedDependencySet> {
        let url = self.endpoint([
            "package",
            id.group(),
            id.name(),
            id.version(),
            "resolveDependencies",
        ])?;
        debug!(package = %id, "fetching resolved dependencies");
        self.get_json(&url).await
    }

    async fn resolve_unqualified(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<Vec<PackageVersionId>> {
        if dependencies.is_empty() {
            return Ok(Vec::new());
        }
        let mut url = self.endpoint(["packages", "resolveDependencies"])?;
        {
            let mut query = url.query_pairs_mut();
            for dependency in dependencies {
                query.append_pair(dependency.name(), dependency.version_range());
            }
        }
        self.get_json(&url).await
    }

    async fn resolve_suggests(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<ResolvedDependencySet> {
        let mut url = self.endpoint(["packages", "resolveSuggests"])?;
        {
            let mut query = url.query_pairs_mut();
            for dependency in dependencies {
                query.append_pair("p", dependency.name());
            }
        }
        self.get_json(&url).await
    }

    async fn query_package_list(&self, filter: &str) -> Result<Vec<PackageVersionId>> {
        let segments =
            std::iter::once("packages").chain(filter.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(segments)?;
        debug!(filter, "querying package list");
        self.get_json(&url).await
    }
}
