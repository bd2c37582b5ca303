//! Meilisearch client implementation.
//!
//! This module provides the concrete implementation of `SearchServiceProvider`
//! on top of a shared `meilisearch_sdk::client::Client`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use meilisearch_sdk::client::Client;
use meilisearch_sdk::errors::Error;
use meilisearch_sdk::tasks::Task;
use meili_index_shared::is_valid_index_uid;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::ConnectionConfig;
use crate::errors::{SearchError, SetupError};
use crate::interfaces::SearchServiceProvider;
use crate::meilisearch::conversions;
use crate::settings::IndexSettings;
use crate::types::{IndexStats, SearchRequest, SearchResponse, TaskInfo, TaskStatus};

/// Meilisearch provider.
///
/// Holds one client session for the lifetime of the process.
///
/// # Example
///
/// ```ignore
/// let config = ConnectionConfig::new("http://localhost:7700", "master-key");
/// let provider = MeilisearchProvider::new(&config)?;
/// let stats = provider.get_stats("article").await?;
/// ```
pub struct MeilisearchProvider {
    client: Client,
    host: String,
    request_timeout: Option<Duration>,
    task_timeout: Option<Duration>,
}

/// Task uid in the form the client library waits on.
struct TaskUid(u32);

impl AsRef<u32> for TaskUid {
    fn as_ref(&self) -> &u32 {
        &self.0
    }
}

impl MeilisearchProvider {
    /// Create a provider for the configured service.
    ///
    /// # Returns
    ///
    /// * `Ok(MeilisearchProvider)` - A new provider instance
    /// * `Err(SetupError::InvalidConfiguration)` - If host or API key is invalid,
    ///   or the client cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SetupError> {
        let url = config.validate()?;
        let host = url.as_str().trim_end_matches('/').to_string();

        let client = Client::new(host.as_str(), Some(config.api_key.as_str())).map_err(|e| {
            SetupError::invalid_configuration(format!("failed to build Meilisearch client: {}", e))
        })?;

        info!(host = %host, "Created Meilisearch client");

        Ok(Self {
            client,
            host,
            request_timeout: config.request_timeout,
            task_timeout: config.task_timeout,
        })
    }

    /// Base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Run one client call under the request timeout and map its error.
    async fn run<T, F>(&self, call: F, index_uid: Option<&str>) -> Result<T, SearchError>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let result = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                SearchError::connection(format!("request timed out after {:?}", limit))
            })?,
            None => call.await,
        };

        result.map_err(|e| {
            let err = conversions::search_error(e, index_uid);
            if !err.is_index_not_found() {
                error!(index = ?index_uid, error = %err, "Meilisearch request failed");
            }
            err
        })
    }
}

/// Reject uids that would address something other than one index.
fn checked_uid(index_uid: &str) -> Result<&str, SearchError> {
    if is_valid_index_uid(index_uid) {
        Ok(index_uid)
    } else {
        Err(SearchError::invalid_request(format!(
            "invalid index uid {:?}",
            index_uid
        )))
    }
}

#[async_trait]
impl SearchServiceProvider for MeilisearchProvider {
    #[instrument(skip(self))]
    async fn get_stats(&self, index_uid: &str) -> Result<IndexStats, SearchError> {
        let index = self.client.index(checked_uid(index_uid)?);
        let stats = self.run(index.get_stats(), Some(index_uid)).await?;
        debug!(index = %index_uid, "Fetched index stats");
        Ok(conversions::index_stats(stats))
    }

    #[instrument(skip(self))]
    async fn create_index(
        &self,
        index_uid: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError> {
        let uid = checked_uid(index_uid)?;
        let task = self
            .run(self.client.create_index(uid, primary_key), Some(index_uid))
            .await?;
        info!(index = %index_uid, task_uid = task.task_uid, "Enqueued index creation");
        Ok(conversions::task_info(task))
    }

    #[instrument(skip(self, settings))]
    async fn update_settings(
        &self,
        index_uid: &str,
        settings: &IndexSettings,
    ) -> Result<TaskInfo, SearchError> {
        let index = self.client.index(checked_uid(index_uid)?);
        let settings = conversions::sdk_settings(settings)?;
        let task = self
            .run(index.set_settings(&settings), Some(index_uid))
            .await?;
        debug!(index = %index_uid, task_uid = task.task_uid, "Enqueued settings update");
        Ok(conversions::task_info(task))
    }

    #[instrument(skip(self, task), fields(task_uid = task.task_uid))]
    async fn wait_for_task(&self, task: &TaskInfo) -> Result<TaskInfo, SearchError> {
        let finished = self
            .client
            .wait_for_task(TaskUid(task.task_uid), None, self.task_timeout)
            .await
            .map_err(|e| conversions::search_error(e, task.index_uid.as_deref()))?;

        match finished {
            Task::Failed { content } => {
                let err = conversions::task_error(task.task_uid, content.error);
                error!(index = ?task.index_uid, error = %err, "Meilisearch task failed");
                Err(err)
            }
            _ => Ok(TaskInfo {
                status: TaskStatus::Succeeded,
                ..task.clone()
            }),
        }
    }

    #[instrument(skip(self))]
    async fn get_settings(&self, index_uid: &str) -> Result<Value, SearchError> {
        let index = self.client.index(checked_uid(index_uid)?);
        let settings = self.run(index.get_settings(), Some(index_uid)).await?;
        conversions::settings_value(&settings)
    }

    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    async fn add_documents(
        &self,
        index_uid: &str,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError> {
        let index = self.client.index(checked_uid(index_uid)?);
        let task = self
            .run(index.add_documents(documents, primary_key), Some(index_uid))
            .await?;
        Ok(conversions::task_info(task))
    }

    #[instrument(skip(self, request))]
    async fn search(
        &self,
        index_uid: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let index = self.client.index(checked_uid(index_uid)?);
        let sort: Vec<&str> = request.sort.iter().map(String::as_str).collect();

        let mut query = index.search();
        if let Some(q) = request.q.as_deref() {
            query.with_query(q);
        }
        if let Some(filter) = request.filter.as_deref() {
            query.with_filter(filter);
        }
        if !sort.is_empty() {
            query.with_sort(&sort);
        }
        if let Some(limit) = request.limit {
            query.with_limit(limit);
        }
        if let Some(offset) = request.offset {
            query.with_offset(offset);
        }

        let results = self
            .run(query.execute::<Value>(), Some(index_uid))
            .await?;
        Ok(conversions::search_response(results))
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        match self.run(self.client.health(), None).await {
            Ok(health) => Ok(health.status == "available"),
            Err(SearchError::ApiError { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
