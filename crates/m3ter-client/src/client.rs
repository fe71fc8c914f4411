//! The API client context.

use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use m3ter_core::{Bill, OrganizationConfig, Page, Resource};

use crate::auth::fetch_token;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::resource::ResourceClient;
use crate::transport::{ApiRequest, ApiResponse, Auth, HttpTransport, Transport};

/// Authenticated context for one organization.
///
/// Holds the bearer token, the resolved hosts and the transport. Construct it
/// once per run and pass it by reference to everything that calls the API.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    token: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_host", &self.config.api_host())
            .field("organization", &self.config.organization)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build an HTTP transport and authenticate.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built or the token
    /// exchange fails.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        Self::connect_with(config, transport).await
    }

    /// Authenticate over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn connect_with(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let token = fetch_token(transport.as_ref(), &config).await?;

        tracing::debug!(
            api_host = %config.api_host(),
            organization = %config.organization,
            "API client ready"
        );

        Ok(Self::with_token(config, transport, token))
    }

    /// Build a client around an already-issued token.
    #[must_use]
    pub fn with_token(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            config,
            transport,
            token: token.into(),
        }
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// CRUD and pagination for one resource type.
    #[must_use]
    pub fn resource<R: Resource>(&self) -> ResourceClient<'_, R> {
        ResourceClient::new(self)
    }

    /// URL of a path under the organization on the API host.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/organizations/{}/{}",
            self.config.api_host(),
            self.config.organization,
            path
        )
    }

    /// URL of a path under the organization on the ingest host.
    #[must_use]
    pub fn ingest_url(&self, path: &str) -> String {
        format!(
            "{}/organizations/{}/{}",
            self.config.ingest_host(),
            self.config.organization,
            path
        )
    }

    /// Send an authenticated request and return the raw response, whatever
    /// its status.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if no response was obtained.
    pub async fn execute(
        &self,
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        tracing::debug!(method = %method, url = %url, "API request");

        let response = self
            .transport
            .execute(ApiRequest {
                method,
                url,
                auth: Auth::Bearer(self.token.clone()),
                body,
            })
            .await?;

        if self.config.trace_responses {
            tracing::trace!(status = response.status, body = %response.body, "API response");
        } else if !response.is_success() {
            tracing::debug!(status = response.status, "API request failed");
        }

        Ok(response)
    }

    /// Send an authenticated request and decode a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on a non-2xx status and
    /// `ClientError::Decode` if the body does not decode as `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        self.execute(method, url, body)
            .await?
            .error_for_status()?
            .json()
    }

    /// All bills for one account (`GET /bills/accountid/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn bills_for_account(&self, account_id: &str) -> Result<Vec<Bill>> {
        let url = self.api_url(&format!("{}/accountid/{account_id}", Bill::PATH));
        let page: Page<Bill> = self.send(Method::GET, url, None).await?;
        Ok(page.data)
    }

    /// Organization-wide configuration (a singleton, fetched without an ID).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn organization_config(&self) -> Result<OrganizationConfig> {
        self.send(Method::GET, self.api_url("organizationconfig"), None)
            .await
    }

    /// Run a data-explorer usage query and return the raw result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn query_usage(&self, query: &serde_json::Value) -> Result<serde_json::Value> {
        self.send(
            Method::POST,
            self.api_url("dataexplorer/usagedata"),
            Some(query.clone()),
        )
        .await
    }
}

/// Append query parameters to a URL, leaving it untouched when there are none.
pub(crate) fn with_query(base: &str, params: &[(&str, String)]) -> Result<String> {
    if params.is_empty() {
        return Ok(base.to_string());
    }

    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| ClientError::Configuration(format!("invalid URL {base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_encoded() {
        let url = with_query(
            "https://api.m3ter.com/organizations/o/bills",
            &[("nextToken", "a+b/c=".to_string())],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.m3ter.com/organizations/o/bills?nextToken=a%2Bb%2Fc%3D"
        );
    }

    #[test]
    fn no_params_leaves_url_alone() {
        let url = with_query("https://api.m3ter.com/organizations/o/bills", &[]).unwrap();
        assert_eq!(url, "https://api.m3ter.com/organizations/o/bills");
    }

    #[test]
    fn invalid_base_is_configuration_error() {
        let err = with_query("not a url", &[("a", "b".to_string())]).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }
}
