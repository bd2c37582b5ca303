//! In-memory provider for tests.
//!
//! `RecordingProvider` keeps indexes, settings and documents in memory and
//! records every call it receives. Failures can be scripted per index,
//! either as rejected requests or as tasks that fail once processed.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::SearchError;
use crate::interfaces::SearchServiceProvider;
use crate::settings::IndexSettings;
use crate::types::{IndexStats, SearchRequest, SearchResponse, TaskInfo, TaskStatus};

/// A call received by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    GetStats(String),
    CreateIndex {
        index: String,
        primary_key: Option<String>,
    },
    UpdateSettings {
        index: String,
        settings: IndexSettings,
    },
    WaitForTask(u32),
    GetSettings(String),
    AddDocuments {
        index: String,
        count: usize,
    },
    Search(String),
    HealthCheck,
}

#[derive(Debug, Default)]
struct StoredIndex {
    primary_key: Option<String>,
    settings: Option<IndexSettings>,
    documents: Vec<Value>,
}

#[derive(Debug, Default)]
struct State {
    indexes: HashMap<String, StoredIndex>,
    calls: Vec<ProviderCall>,
    /// Tasks that fail when waited on, with their error code.
    failing_tasks: HashMap<u32, String>,
}

/// Mock provider for testing.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    state: Mutex<State>,
    stats_failures: HashMap<String, SearchError>,
    create_failures: HashMap<String, SearchError>,
    settings_failures: HashSet<String>,
    /// `(index, task kind)` to error code.
    task_failures: HashMap<(String, String), String>,
    next_task_uid: AtomicU32,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the index already exists remotely.
    pub fn with_existing_index(mut self, index: &str) -> Self {
        self.state
            .get_mut()
            .indexes
            .insert(index.to_string(), StoredIndex::default());
        self
    }

    /// Fail stats requests for the index with the given error.
    pub fn with_stats_failure(mut self, index: &str, error: SearchError) -> Self {
        self.stats_failures.insert(index.to_string(), error);
        self
    }

    /// Fail creation of the index with the given error.
    pub fn with_create_failure(mut self, index: &str, error: SearchError) -> Self {
        self.create_failures.insert(index.to_string(), error);
        self
    }

    /// Reject settings updates of the index.
    pub fn with_settings_failure(mut self, index: &str) -> Self {
        self.settings_failures.insert(index.to_string());
        self
    }

    /// Accept tasks of the given kind on the index, then fail them when
    /// they are waited on. Kinds are `indexCreation`, `settingsUpdate` and
    /// `documentAdditionOrUpdate`.
    pub fn with_task_failure(mut self, index: &str, kind: &str, code: &str) -> Self {
        self.task_failures
            .insert((index.to_string(), kind.to_string()), code.to_string());
        self
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn has_index(&self, index: &str) -> bool {
        self.state.lock().await.indexes.contains_key(index)
    }

    /// Primary key the index was created with.
    pub async fn primary_key(&self, index: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .indexes
            .get(index)
            .and_then(|stored| stored.primary_key.clone())
    }

    /// Last settings document applied to the index.
    pub async fn settings(&self, index: &str) -> Option<IndexSettings> {
        self.state
            .lock()
            .await
            .indexes
            .get(index)
            .and_then(|stored| stored.settings.clone())
    }

    pub async fn documents(&self, index: &str) -> Vec<Value> {
        self.state
            .lock()
            .await
            .indexes
            .get(index)
            .map(|stored| stored.documents.clone())
            .unwrap_or_default()
    }

    fn scripted_task_failure(&self, index: &str, kind: &str) -> Option<&String> {
        self.task_failures
            .get(&(index.to_string(), kind.to_string()))
    }

    fn task(&self, state: &mut State, index: &str, kind: &str) -> TaskInfo {
        let task_uid = self.next_task_uid.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.scripted_task_failure(index, kind) {
            state.failing_tasks.insert(task_uid, code.clone());
        }

        TaskInfo {
            task_uid,
            index_uid: Some(index.to_string()),
            status: TaskStatus::Enqueued,
            enqueued_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SearchServiceProvider for RecordingProvider {
    async fn get_stats(&self, index_uid: &str) -> Result<IndexStats, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::GetStats(index_uid.to_string()));

        if let Some(error) = self.stats_failures.get(index_uid) {
            return Err(error.clone());
        }

        state
            .indexes
            .get(index_uid)
            .map(|stored| IndexStats {
                number_of_documents: stored.documents.len() as u64,
                ..Default::default()
            })
            .ok_or_else(|| SearchError::index_not_found(index_uid))
    }

    async fn create_index(
        &self,
        index_uid: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::CreateIndex {
            index: index_uid.to_string(),
            primary_key: primary_key.map(str::to_string),
        });

        if let Some(error) = self.create_failures.get(index_uid) {
            return Err(error.clone());
        }

        state.indexes.insert(
            index_uid.to_string(),
            StoredIndex {
                primary_key: primary_key.map(str::to_string),
                ..Default::default()
            },
        );
        Ok(self.task(&mut state, index_uid, "indexCreation"))
    }

    async fn update_settings(
        &self,
        index_uid: &str,
        settings: &IndexSettings,
    ) -> Result<TaskInfo, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::UpdateSettings {
            index: index_uid.to_string(),
            settings: settings.clone(),
        });

        if self.settings_failures.contains(index_uid) {
            return Err(SearchError::api(
                "invalid_settings",
                format!("settings of {} rejected", index_uid),
            ));
        }

        if self
            .scripted_task_failure(index_uid, "settingsUpdate")
            .is_none()
        {
            state.indexes.entry(index_uid.to_string()).or_default().settings =
                Some(settings.clone());
        }
        Ok(self.task(&mut state, index_uid, "settingsUpdate"))
    }

    async fn wait_for_task(&self, task: &TaskInfo) -> Result<TaskInfo, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::WaitForTask(task.task_uid));

        match state.failing_tasks.get(&task.task_uid) {
            Some(code) => Err(SearchError::task_failed(
                task.task_uid,
                code.clone(),
                format!("task {} failed", task.task_uid),
            )),
            None => Ok(TaskInfo {
                status: TaskStatus::Succeeded,
                ..task.clone()
            }),
        }
    }

    async fn get_settings(&self, index_uid: &str) -> Result<Value, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::GetSettings(index_uid.to_string()));

        let stored = state
            .indexes
            .get(index_uid)
            .ok_or_else(|| SearchError::index_not_found(index_uid))?;
        serde_json::to_value(stored.settings.clone().unwrap_or_default())
            .map_err(|e| SearchError::serialization(e.to_string()))
    }

    async fn add_documents(
        &self,
        index_uid: &str,
        documents: &[Value],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::AddDocuments {
            index: index_uid.to_string(),
            count: documents.len(),
        });

        let stored = state.indexes.entry(index_uid.to_string()).or_default();
        if stored.primary_key.is_none() {
            stored.primary_key = primary_key.map(str::to_string);
        }
        stored.documents.extend_from_slice(documents);
        Ok(self.task(&mut state, index_uid, "documentAdditionOrUpdate"))
    }

    async fn search(
        &self,
        index_uid: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let mut state = self.state.lock().await;
        state.calls.push(ProviderCall::Search(index_uid.to_string()));

        let stored = state
            .indexes
            .get(index_uid)
            .ok_or_else(|| SearchError::index_not_found(index_uid))?;
        let offset = request.offset.unwrap_or(0);
        let limit = request.limit.unwrap_or(20);
        let hits: Vec<Value> = stored
            .documents
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(SearchResponse {
            estimated_total_hits: Some(stored.documents.len() as u64),
            hits,
            query: request.q.clone().unwrap_or_default(),
            processing_time_ms: 0,
            limit: Some(limit),
            offset: Some(offset),
        })
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        self.state.lock().await.calls.push(ProviderCall::HealthCheck);
        Ok(true)
    }
}
