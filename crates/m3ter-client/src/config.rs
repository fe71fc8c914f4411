//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;

/// Environment name that maps to the unprefixed production hosts.
pub const PRODUCTION: &str = "prod";

/// Connection settings for one m3ter organization.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deployment environment (`prod`, `dev`, `sandbox`, ...).
    pub environment: String,

    /// Organization ID; every resource path is scoped to it.
    pub organization: String,

    /// API key used for the credential exchange.
    pub api_key: String,

    /// API secret used for the credential exchange.
    pub api_secret: String,

    /// Overrides the API host derived from `environment`.
    pub api_url: Option<String>,

    /// Overrides the ingest host derived from `environment`.
    pub ingest_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Page size requested from list endpoints; server default when unset.
    pub page_size: Option<u32>,

    /// Emit raw response bodies as `trace` events.
    pub trace_responses: bool,

    /// Retry policy for idempotent deletes.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a production configuration for an organization.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            environment: PRODUCTION.to_string(),
            organization: organization.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_url: None,
            ingest_url: None,
            timeout: Duration::from_secs(30),
            page_size: None,
            trace_responses: false,
            retry: RetryPolicy::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required: `ORGANIZATION`, `apiKey`, `apiSecret`. `ENVIRONMENT`
    /// defaults to `prod`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if a required variable is missing
    /// or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            required("ORGANIZATION")?,
            required("apiKey")?,
            required("apiSecret")?,
        );

        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }
        config.api_url = std::env::var("M3TER_API_URL").ok();
        config.ingest_url = std::env::var("M3TER_INGEST_URL").ok();

        if let Some(seconds) = parsed::<u64>("M3TER_TIMEOUT_SECONDS")? {
            config.timeout = Duration::from_secs(seconds);
        }
        config.page_size = parsed("M3TER_PAGE_SIZE")?;
        if let Some(attempts) = parsed::<u32>("M3TER_DELETE_ATTEMPTS")? {
            config.retry = RetryPolicy::with_max_attempts(attempts);
        }
        config.trace_responses = std::env::var("M3TER_TRACE_RESPONSES")
            .is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"));

        Ok(config)
    }

    /// Set the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Point API calls at a specific host (e.g. a mock server).
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Point measurement submission at a specific host.
    #[must_use]
    pub fn with_ingest_url(mut self, url: impl Into<String>) -> Self {
        self.ingest_url = Some(url.into());
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the list page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// API host, e.g. `https://api.m3ter.com`.
    #[must_use]
    pub fn api_host(&self) -> String {
        self.api_url
            .as_deref()
            .map_or_else(|| host_for("api", &self.environment), trim_slash)
    }

    /// Ingest host, e.g. `https://ingest.m3ter.com`.
    #[must_use]
    pub fn ingest_host(&self) -> String {
        self.ingest_url
            .as_deref()
            .map_or_else(|| host_for("ingest", &self.environment), trim_slash)
    }
}

fn host_for(service: &str, environment: &str) -> String {
    if environment == PRODUCTION {
        format!("https://{service}.m3ter.com")
    } else {
        format!("https://{service}.{environment}.m3ter.com")
    }
}

fn trim_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ClientError::Configuration(format!("{key} is not set")))
}

fn parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ClientError::Configuration(format!("{key} is not a valid number: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_hosts() {
        let config = ClientConfig::new("org-1", "key", "secret");
        assert_eq!(config.api_host(), "https://api.m3ter.com");
        assert_eq!(config.ingest_host(), "https://ingest.m3ter.com");
    }

    #[test]
    fn environment_hosts() {
        let config = ClientConfig::new("org-1", "key", "secret").with_environment("sandbox");
        assert_eq!(config.api_host(), "https://api.sandbox.m3ter.com");
        assert_eq!(config.ingest_host(), "https://ingest.sandbox.m3ter.com");
    }

    #[test]
    fn override_trims_trailing_slash() {
        let config =
            ClientConfig::new("org-1", "key", "secret").with_api_url("http://127.0.0.1:9000/");
        assert_eq!(config.api_host(), "http://127.0.0.1:9000");
        assert_eq!(config.ingest_host(), "https://ingest.m3ter.com");
    }
}
