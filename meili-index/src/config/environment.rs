//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use tracing::info;

use crate::config::ConnectionConfig;
use crate::ModuleError;

/// Default Meilisearch URL.
const DEFAULT_MEILI_HOST: &str = "http://localhost:7700";

/// Variable holding the Meilisearch URL.
pub const MEILI_HOST_VAR: &str = "MEILI_HOST";

/// Variable holding the Meilisearch API key.
pub const MEILI_API_KEY_VAR: &str = "MEILI_API_KEY";

/// Variable holding the request timeout in milliseconds.
pub const MEILI_TIMEOUT_MS_VAR: &str = "MEILI_TIMEOUT_MS";

/// Load the connection configuration from the process environment.
///
/// A `.env` file in the working directory is read first, if present.
///
/// # Environment Variables
///
/// - `MEILI_HOST`: Meilisearch URL (default: http://localhost:7700)
/// - `MEILI_API_KEY`: API key (required)
/// - `MEILI_TIMEOUT_MS`: Request timeout in milliseconds (optional)
pub fn load_config_from_env() -> Result<ConnectionConfig, ModuleError> {
    dotenv::dotenv().ok();
    config_from_lookup(|key| env::var(key).ok())
}

/// Build the connection configuration from an arbitrary variable lookup.
pub fn config_from_lookup<F>(lookup: F) -> Result<ConnectionConfig, ModuleError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup(MEILI_HOST_VAR)
        .filter(|host| !host.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MEILI_HOST.to_string());

    let api_key = lookup(MEILI_API_KEY_VAR)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ModuleError::config(format!("{} is not set", MEILI_API_KEY_VAR)))?;

    let mut config = ConnectionConfig::new(host, api_key);

    if let Some(raw) = lookup(MEILI_TIMEOUT_MS_VAR) {
        let millis: u64 = raw.trim().parse().map_err(|e| {
            ModuleError::config(format!("Invalid {} value {:?}: {}", MEILI_TIMEOUT_MS_VAR, raw, e))
        })?;
        config = config.with_request_timeout(Duration::from_millis(millis));
    }

    info!(
        meili_host = %config.host,
        request_timeout_ms = ?config.request_timeout.map(|t| t.as_millis()),
        "Loaded Meilisearch configuration"
    );

    Ok(config)
}
