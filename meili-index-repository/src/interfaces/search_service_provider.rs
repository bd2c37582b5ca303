//! Search service provider trait definition.
//!
//! This module defines the abstract interface for the remote search service,
//! allowing for different backend implementations (Meilisearch over HTTP,
//! in-memory doubles for tests, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::settings::IndexSettings;
use crate::types::{IndexStats, SearchRequest, SearchResponse, TaskInfo};

/// Abstracts the remote search service.
///
/// Implementations are injected into `MeiliClient`, which shares one
/// provider between every index handle.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchServiceProvider: Send + Sync {
    /// Fetch the statistics of an index.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexStats)` - If the index exists
    /// * `Err(SearchError::IndexNotFound)` - If the service has no such index
    /// * `Err(SearchError)` - For any other failure
    async fn get_stats(&self, index_uid: &str) -> Result<IndexStats, SearchError>;

    /// Create an index, optionally fixing its primary key.
    async fn create_index(
        &self,
        index_uid: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError>;

    /// Replace the listed settings of an index.
    ///
    /// Keys present in the document overwrite the remote values; absent
    /// keys are left untouched by the service.
    async fn update_settings(
        &self,
        index_uid: &str,
        settings: &IndexSettings,
    ) -> Result<TaskInfo, SearchError>;

    /// Wait until an enqueued task is processed.
    ///
    /// # Returns
    ///
    /// * `Ok(TaskInfo)` - The task, in its final successful state
    /// * `Err(SearchError::TaskFailed)` - If the service failed the task
    /// * `Err(SearchError)` - If waiting fails or times out
    async fn wait_for_task(&self, task: &TaskInfo) -> Result<TaskInfo, SearchError>;

    /// Fetch the current settings of an index.
    async fn get_settings(&self, index_uid: &str) -> Result<Value, SearchError>;

    /// Add or replace documents.
    async fn add_documents(
        &self,
        index_uid: &str,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError>;

    /// Run a search against an index.
    async fn search(
        &self,
        index_uid: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError>;

    /// Check if the search service is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the service reports itself available
    /// * `Ok(false)` - If the service answered but is not available
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
