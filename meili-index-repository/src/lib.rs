//! # Meili Index Repository
//!
//! This crate provides the connection to the Meilisearch service and the
//! reconciliation of model declarations with remote index settings. It
//! includes definitions for errors, the provider interface, and a concrete
//! implementation over the Meilisearch HTTP API.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod meilisearch;
pub mod reconciler;
pub mod settings;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{IndexHandle, MeiliClient};
pub use config::ConnectionConfig;
pub use errors::{SearchError, SetupError};
pub use interfaces::SearchServiceProvider;
pub use meilisearch::MeilisearchProvider;
pub use reconciler::setup_index;
pub use settings::{FacetingSettings, IndexSettings, PaginationSettings};
pub use types::{IndexStats, SearchRequest, SearchResponse, TaskInfo, TaskStatus};
