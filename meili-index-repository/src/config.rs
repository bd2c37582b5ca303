//! Connection configuration for the Meilisearch client.

use std::time::Duration;

use url::Url;

use crate::errors::SetupError;

/// Address and credential of the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URL of the service, e.g. `http://localhost:7700`.
    pub host: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    /// How long to wait for an enqueued task to finish. `None` uses the
    /// client library default of five seconds.
    pub task_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a config without a request timeout.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            request_timeout: None,
            task_timeout: None,
        }
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set how long index creation and settings tasks may take.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Check the config and return the parsed host URL.
    pub fn validate(&self) -> Result<Url, SetupError> {
        if self.host.trim().is_empty() {
            return Err(SetupError::invalid_configuration("host must not be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(SetupError::invalid_configuration(
                "api key must not be empty",
            ));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(SetupError::invalid_configuration(
                "request timeout must be greater than zero",
            ));
        }

        if self.task_timeout == Some(Duration::ZERO) {
            return Err(SetupError::invalid_configuration(
                "task timeout must be greater than zero",
            ));
        }

        let url = Url::parse(self.host.trim()).map_err(|e| {
            SetupError::invalid_configuration(format!("invalid host {}: {}", self.host, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SetupError::invalid_configuration(format!(
                "unsupported scheme {} in host {}",
                url.scheme(),
                self.host
            )));
        }

        Ok(url)
    }
}
