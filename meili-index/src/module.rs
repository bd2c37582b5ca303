//! Module factory.
//!
//! Builds the shared Meilisearch client once at application start and
//! registers model indexes on top of it.

use std::fmt::Display;
use std::future::Future;

use tracing::{info, instrument};

use meili_index_repository::MeiliClient;
use meili_index_shared::{ModelDeclaration, ModelRegistry};

use crate::config::{load_config_from_env, ConnectionConfig};
use crate::index_registry::IndexRegistry;
use crate::registration::register_models;
use crate::ModuleError;

/// Container for the shared search client.
///
/// # Example
///
/// ```ignore
/// let module = MeiliModule::for_root(ConnectionConfig::new("http://localhost:7700", key))?;
///
/// let mut models = ModelRegistry::new();
/// models.register::<Article>()?.register::<Author>()?;
///
/// let indexes = module.for_feature(models.declarations()).await?;
/// let articles = indexes.require("article")?;
/// ```
#[derive(Debug, Clone)]
pub struct MeiliModule {
    client: MeiliClient,
}

impl MeiliModule {
    /// Build the module from a ready configuration.
    pub fn for_root(config: ConnectionConfig) -> Result<Self, ModuleError> {
        let client = MeiliClient::connect(config)?;
        info!("Meilisearch module initialized");
        Ok(Self { client })
    }

    /// Build the module from a configuration resolved asynchronously.
    ///
    /// The resolver is called once and awaited before the client is built.
    /// Dependencies it needs are captured by the closure.
    pub async fn for_root_async<F, Fut, E>(resolver: F) -> Result<Self, ModuleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ConnectionConfig, E>>,
        E: Display,
    {
        let config = resolver().await.map_err(|e| {
            ModuleError::config(format!("Failed to resolve Meilisearch options: {}", e))
        })?;
        Self::for_root(config)
    }

    /// Build the module from `MEILI_*` environment variables.
    pub fn from_env() -> Result<Self, ModuleError> {
        Self::for_root(load_config_from_env()?)
    }

    /// Wrap an existing client.
    pub fn with_client(client: MeiliClient) -> Self {
        Self { client }
    }

    /// The shared client.
    pub fn client(&self) -> &MeiliClient {
        &self.client
    }

    /// Reconcile the given models with their indexes and publish the handles.
    #[instrument(skip(self, models), fields(model_count = models.len()))]
    pub async fn for_feature(
        &self,
        models: &[ModelDeclaration],
    ) -> Result<IndexRegistry, ModuleError> {
        register_models(models, &self.client).await
    }

    /// Same as [`MeiliModule::for_feature`] for every model in a registry.
    pub async fn for_registry(&self, models: &ModelRegistry) -> Result<IndexRegistry, ModuleError> {
        self.for_feature(models.declarations()).await
    }
}
