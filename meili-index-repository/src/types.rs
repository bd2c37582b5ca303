//! Values exchanged with a `SearchServiceProvider`.
//!
//! These are backend-neutral; the Meilisearch provider converts the client
//! library's payloads into them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Statistics of one index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub number_of_documents: u64,
    pub is_indexing: bool,
    pub field_distribution: BTreeMap<String, u64>,
}

/// Lifecycle state of an asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Parse the status name used by the service. Unknown names count as
    /// still enqueued.
    pub fn from_name(name: &str) -> Self {
        match name {
            "processing" => Self::Processing,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            _ => Self::Enqueued,
        }
    }

    /// Whether the task reached a final state.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Summary of a task started by a write operation.
///
/// Index creation, settings updates and document additions are processed
/// asynchronously by the service; the task identifies the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub task_uid: u32,
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    pub enqueued_at: DateTime<Utc>,
}

/// Search parameters. Unset fields fall back to the service defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub sort: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SearchRequest {
    /// Create a request for the given query text.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    /// Set the filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Add a sort clause such as `price:asc`.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Search results. Hits are left untyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub hits: Vec<Value>,
    pub query: String,
    pub processing_time_ms: u64,
    pub estimated_total_hits: Option<u64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_builder() {
        let request = SearchRequest::new("rust")
            .with_filter("category = 'books'")
            .with_sort("price:asc")
            .with_sort("title:desc")
            .with_limit(10);

        assert_eq!(request.q.as_deref(), Some("rust"));
        assert_eq!(request.filter.as_deref(), Some("category = 'books'"));
        assert_eq!(request.sort, vec!["price:asc", "title:desc"]);
        assert_eq!(request.limit, Some(10));
        assert_eq!(request.offset, None);
    }

    #[test]
    fn test_task_status_names() {
        assert_eq!(TaskStatus::from_name("enqueued"), TaskStatus::Enqueued);
        assert_eq!(TaskStatus::from_name("succeeded"), TaskStatus::Succeeded);
        assert_eq!(TaskStatus::from_name("failed"), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_name("something-new"), TaskStatus::Enqueued);
        assert!(TaskStatus::Canceled.is_finished());
        assert!(!TaskStatus::Processing.is_finished());
    }
}
