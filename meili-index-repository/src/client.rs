//! Connection handle and index handles.
//!
//! `MeiliClient` owns the provider shared by every index operation in the
//! process. Application code asks it for `IndexHandle`s.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::ConnectionConfig;
use crate::errors::{SearchError, SetupError};
use crate::interfaces::SearchServiceProvider;
use crate::meilisearch::MeilisearchProvider;
use crate::settings::IndexSettings;
use crate::types::{IndexStats, SearchRequest, SearchResponse, TaskInfo};

const INDEX_ALREADY_EXISTS: &str = "index_already_exists";

/// Shared connection to the search service.
///
/// Cloning is cheap; clones share the same provider.
#[derive(Clone)]
pub struct MeiliClient {
    provider: Arc<dyn SearchServiceProvider>,
}

impl MeiliClient {
    /// Connect to a Meilisearch service.
    ///
    /// # Returns
    ///
    /// * `Ok(MeiliClient)` - A client backed by `MeilisearchProvider`
    /// * `Err(SetupError::InvalidConfiguration)` - If host or API key is invalid
    pub fn connect(config: ConnectionConfig) -> Result<Self, SetupError> {
        let provider = MeilisearchProvider::new(&config)?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Shorthand for [`MeiliClient::connect`] without a request timeout.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SetupError> {
        Self::connect(ConnectionConfig::new(host, api_key))
    }

    /// Create a client on top of any provider implementation.
    pub fn with_provider(provider: Arc<dyn SearchServiceProvider>) -> Self {
        Self { provider }
    }

    /// Handle for the named index. Performs no I/O and does not check
    /// that the index exists.
    pub fn index(&self, name: impl Into<String>) -> IndexHandle {
        IndexHandle {
            uid: name.into(),
            provider: Arc::clone(&self.provider),
        }
    }

    /// Return a handle for the index, creating the index if the service
    /// reports it missing.
    ///
    /// Creation is awaited until the service has processed it. An index
    /// created concurrently by another process counts as existing.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexHandle)` - The index exists or was created
    /// * `Err(SetupError::IndexInitialization)` - If the existence check fails
    ///   for any reason other than a missing index
    /// * `Err(SetupError::Search)` - If index creation fails
    #[instrument(skip(self))]
    pub async fn ensure_index(
        &self,
        name: &str,
        primary_key: Option<&str>,
    ) -> Result<IndexHandle, SetupError> {
        match self.provider.get_stats(name).await {
            Ok(stats) => {
                debug!(
                    index = %name,
                    documents = stats.number_of_documents,
                    "Index already exists"
                );
            }
            Err(SearchError::IndexNotFound(_)) => {
                let task = self.provider.create_index(name, primary_key).await?;
                match self.provider.wait_for_task(&task).await {
                    Ok(_) => info!(index = %name, primary_key = ?primary_key, "Created index"),
                    Err(e) if e.code() == Some(INDEX_ALREADY_EXISTS) => {
                        debug!(index = %name, "Index was created concurrently");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(SetupError::index_initialization(name, e)),
        }

        Ok(self.index(name))
    }

    /// Check if the search service is reachable and available.
    pub async fn health_check(&self) -> Result<bool, SearchError> {
        self.provider.health_check().await
    }
}

impl fmt::Debug for MeiliClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeiliClient").finish_non_exhaustive()
    }
}

/// Handle on one remote index.
#[derive(Clone)]
pub struct IndexHandle {
    uid: String,
    provider: Arc<dyn SearchServiceProvider>,
}

impl IndexHandle {
    /// Name of the remote index.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub async fn stats(&self) -> Result<IndexStats, SearchError> {
        self.provider.get_stats(&self.uid).await
    }

    /// Overwrite the settings listed in the document.
    pub async fn update_settings(&self, settings: &IndexSettings) -> Result<TaskInfo, SearchError> {
        self.provider.update_settings(&self.uid, settings).await
    }

    /// Wait until a task started through this handle is processed.
    pub async fn wait_for_task(&self, task: &TaskInfo) -> Result<TaskInfo, SearchError> {
        self.provider.wait_for_task(task).await
    }

    pub async fn get_settings(&self) -> Result<Value, SearchError> {
        self.provider.get_settings(&self.uid).await
    }

    /// Add or replace documents in the index.
    pub async fn add_documents(
        &self,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError> {
        self.provider
            .add_documents(&self.uid, documents, primary_key)
            .await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.provider.search(&self.uid, request).await
    }
}

impl fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexHandle")
            .field("uid", &self.uid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ProviderCall, RecordingProvider};

    #[test]
    fn test_new_rejects_empty_host() {
        let result = MeiliClient::new("", "master-key");
        assert!(matches!(result, Err(SetupError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_index_performs_no_io() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());

        let index = client.index("missing");

        assert_eq!(index.uid(), "missing");
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_existing_index_does_not_create() {
        let provider = Arc::new(RecordingProvider::new().with_existing_index("article"));
        let client = MeiliClient::with_provider(provider.clone());

        let index = client.ensure_index("article", Some("id")).await.unwrap();

        assert_eq!(index.uid(), "article");
        assert_eq!(
            provider.calls().await,
            vec![ProviderCall::GetStats("article".to_string())]
        );
    }

    #[tokio::test]
    async fn test_ensure_missing_index_creates_with_primary_key() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());

        client.ensure_index("article", Some("id")).await.unwrap();

        assert_eq!(
            provider.calls().await,
            vec![
                ProviderCall::GetStats("article".to_string()),
                ProviderCall::CreateIndex {
                    index: "article".to_string(),
                    primary_key: Some("id".to_string()),
                },
                ProviderCall::WaitForTask(0),
            ]
        );
        assert!(provider.has_index("article").await);
    }

    #[tokio::test]
    async fn test_ensure_index_surfaces_failed_creation_task() {
        let provider = Arc::new(RecordingProvider::new().with_task_failure(
            "article",
            "indexCreation",
            "invalid_index_primary_key",
        ));
        let client = MeiliClient::with_provider(provider);

        let result = client.ensure_index("article", Some("id")).await;

        assert!(matches!(
            result,
            Err(SetupError::Search(SearchError::TaskFailed { ref code, .. }))
                if code == "invalid_index_primary_key"
        ));
    }

    #[tokio::test]
    async fn test_ensure_index_tolerates_concurrent_creation() {
        let provider = Arc::new(RecordingProvider::new().with_task_failure(
            "article",
            "indexCreation",
            INDEX_ALREADY_EXISTS,
        ));
        let client = MeiliClient::with_provider(provider);

        let index = client.ensure_index("article", Some("id")).await.unwrap();

        assert_eq!(index.uid(), "article");
    }

    #[tokio::test]
    async fn test_ensure_index_wraps_stats_failure() {
        let provider = Arc::new(
            RecordingProvider::new()
                .with_stats_failure("article", SearchError::api("invalid_api_key", "denied")),
        );
        let client = MeiliClient::with_provider(provider.clone());

        let result = client.ensure_index("article", Some("id")).await;

        assert_eq!(
            result.unwrap_err(),
            SetupError::index_initialization(
                "article",
                SearchError::api("invalid_api_key", "denied")
            )
        );
        assert_eq!(provider.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_index_passes_creation_failure_through() {
        let provider = Arc::new(
            RecordingProvider::new()
                .with_create_failure("article", SearchError::connection("connection reset")),
        );
        let client = MeiliClient::with_provider(provider);

        let result = client.ensure_index("article", None).await;

        assert_eq!(
            result.unwrap_err(),
            SetupError::Search(SearchError::connection("connection reset"))
        );
    }

    #[tokio::test]
    async fn test_index_handle_forwards_to_provider() {
        let provider = Arc::new(RecordingProvider::new().with_existing_index("article"));
        let client = MeiliClient::with_provider(provider.clone());
        let index = client.index("article");

        index
            .add_documents(&[serde_json::json!({ "id": 1, "title": "Rust" })], Some("id"))
            .await
            .unwrap();
        let response = index.search(&SearchRequest::new("rust")).await.unwrap();

        assert_eq!(response.hits.len(), 1);
        assert_eq!(provider.documents("article").await.len(), 1);
    }
}
