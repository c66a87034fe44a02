//! HTTP mock server for package database interactions.

use cranforge_core::{PackageVersionId, ResolvedDependencySet};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock package database server.
#[derive(Debug)]
pub struct MockPackageDatabase {
    server: MockServer,
}

impl MockPackageDatabase {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the base URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Serve the resolved dependency set of `id`.
    pub async fn register_dependencies(&self, id: &PackageVersionId, set: &ResolvedDependencySet) {
        Mock::given(method("GET"))
            .and(path(format!("{}/resolveDependencies", id.path())))
            .respond_with(ResponseTemplate::new(200).set_body_json(set))
            .mount(&self.server)
            .await;
    }

    /// Serve the package list for `filter`.
    pub async fn register_package_list(&self, filter: &str, ids: &[PackageVersionId]) {
        Mock::given(method("GET"))
            .and(path(format!("/packages/{filter}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ids))
            .mount(&self.server)
            .await;
    }

    /// Serve a raw JSON array of strings for `filter`, valid triplets or not.
    pub async fn register_raw_package_list(&self, filter: &str, entries: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("/packages/{filter}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries))
            .mount(&self.server)
            .await;
    }

    /// Serve the batch resolution of `name`, matching on its query parameter.
    pub async fn register_unqualified(
        &self,
        name: &str,
        version_range: &str,
        resolved: &[PackageVersionId],
    ) {
        Mock::given(method("GET"))
            .and(path("/packages/resolveDependencies"))
            .and(query_param(name, version_range))
            .respond_with(ResponseTemplate::new(200).set_body_json(resolved))
            .mount(&self.server)
            .await;
    }

    /// Serve the suggests resolution for a request naming `name`.
    pub async fn register_suggests(&self, name: &str, set: &ResolvedDependencySet) {
        Mock::given(method("GET"))
            .and(path("/packages/resolveSuggests"))
            .and(query_param("p", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(set))
            .mount(&self.server)
            .await;
    }

    /// Respond with `status` to requests for `id`'s dependencies.
    ///
    /// With `times`, the failure is served that many times and then falls
    /// through to any lower-priority mock for the same path.
    pub async fn register_failure(&self, id: &PackageVersionId, status: u16, times: Option<u64>) {
        let mut mock = Mock::given(method("GET"))
            .and(path(format!("{}/resolveDependencies", id.path())))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "status": "error",
                "message": format!("status {status}")
            })))
            .with_priority(1);
        if let Some(n) = times {
            mock = mock.up_to_n_times(n);
        }
        mock.mount(&self.server).await;
    }

    /// Get received requests count.
    pub async fn received_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .len()
    }
}
