//! Meilisearch implementation of the search service provider.
//!
//! This module provides a concrete implementation of `SearchServiceProvider`
//! on top of the official `meilisearch-sdk` client.

mod client;
mod conversions;

pub use client::MeilisearchProvider;
