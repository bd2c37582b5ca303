//! Conversions between `meilisearch-sdk` values and the provider types.

use chrono::{DateTime, Utc};
use meilisearch_sdk::errors::{Error, ErrorCode, MeilisearchError};
use meilisearch_sdk::indexes::IndexStats as SdkIndexStats;
use meilisearch_sdk::search::SearchResults;
use meilisearch_sdk::settings::Settings;
use meilisearch_sdk::task_info::TaskInfo as SdkTaskInfo;
use serde_json::Value;

use crate::errors::SearchError;
use crate::settings::IndexSettings;
use crate::types::{IndexStats, SearchResponse, TaskInfo, TaskStatus};

/// Map a client library error. `index_uid` names the index a not-found
/// error refers to.
pub(crate) fn search_error(error: Error, index_uid: Option<&str>) -> SearchError {
    match error {
        Error::Meilisearch(MeilisearchError {
            error_code: ErrorCode::IndexNotFound,
            ..
        }) => SearchError::index_not_found(index_uid.unwrap_or_default()),
        Error::Meilisearch(e) => SearchError::api(e.error_code.to_string(), e.error_message),
        Error::ParseError(e) => SearchError::parse(e.to_string()),
        other => SearchError::connection(other.to_string()),
    }
}

/// Error of a task the service failed while processing it.
pub(crate) fn task_error(task_uid: u32, error: MeilisearchError) -> SearchError {
    SearchError::task_failed(task_uid, error.error_code.to_string(), error.error_message)
}

/// Settings object for `Index::set_settings`.
///
/// `primaryKey` is not an index setting in Meilisearch and is dropped; the
/// key is fixed when the index is created.
pub(crate) fn sdk_settings(settings: &IndexSettings) -> Result<Settings, SearchError> {
    let mut body =
        serde_json::to_value(settings).map_err(|e| SearchError::serialization(e.to_string()))?;
    if let Some(fields) = body.as_object_mut() {
        fields.remove("primaryKey");
    }
    serde_json::from_value(body).map_err(|e| SearchError::serialization(e.to_string()))
}

pub(crate) fn settings_value(settings: &Settings) -> Result<Value, SearchError> {
    serde_json::to_value(settings).map_err(|e| SearchError::parse(e.to_string()))
}

pub(crate) fn task_info(task: SdkTaskInfo) -> TaskInfo {
    let enqueued_at = DateTime::<Utc>::from_timestamp(
        task.enqueued_at.unix_timestamp(),
        task.enqueued_at.nanosecond(),
    )
    .unwrap_or_else(Utc::now);

    TaskInfo {
        task_uid: task.task_uid,
        index_uid: task.index_uid,
        status: TaskStatus::from_name(&task.status),
        enqueued_at,
    }
}

pub(crate) fn index_stats(stats: SdkIndexStats) -> IndexStats {
    IndexStats {
        number_of_documents: stats.number_of_documents as u64,
        is_indexing: stats.is_indexing,
        field_distribution: stats
            .field_distribution
            .into_iter()
            .map(|(field, count)| (field, count as u64))
            .collect(),
    }
}

pub(crate) fn search_response(results: SearchResults<Value>) -> SearchResponse {
    SearchResponse {
        hits: results.hits.into_iter().map(|hit| hit.result).collect(),
        query: results.query,
        processing_time_ms: results.processing_time_ms as u64,
        estimated_total_hits: results.estimated_total_hits.map(|n| n as u64),
        limit: results.limit,
        offset: results.offset,
    }
}
