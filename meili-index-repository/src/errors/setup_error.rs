//! Index setup error types.
//!
//! Errors raised while connecting to the search service and reconciling
//! model declarations with remote index settings.

use thiserror::Error;

use super::SearchError;

/// Errors that can occur while wiring a model to its remote index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Host or API key is missing or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The model creates its index eagerly but declares no primary key.
    #[error("Model {model} does not declare a primary key")]
    MissingPrimaryKey { model: String },

    /// Checking the remote index failed for a reason other than "not found".
    #[error("Failed to initialize index {index}: {source}")]
    IndexInitialization {
        index: String,
        #[source]
        source: SearchError,
    },

    /// The settings document was rejected or could not be sent.
    #[error("Failed to update settings of index {index}: {source}")]
    SettingsUpdate {
        index: String,
        #[source]
        source: SearchError,
    },

    /// Another model in the same registration already claimed an index
    /// whose name differs at most in case.
    #[error("Index {index} conflicts with index {existing} of model {owner}")]
    IndexConflict {
        index: String,
        existing: String,
        owner: String,
    },

    /// Any other search service failure.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

impl SetupError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a missing primary key error.
    pub fn missing_primary_key(model: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            model: model.into(),
        }
    }

    /// Create an index initialization error.
    pub fn index_initialization(index: impl Into<String>, source: SearchError) -> Self {
        Self::IndexInitialization {
            index: index.into(),
            source,
        }
    }

    /// Create an index conflict error.
    pub fn index_conflict(
        index: impl Into<String>,
        existing: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self::IndexConflict {
            index: index.into(),
            existing: existing.into(),
            owner: owner.into(),
        }
    }

    /// Create a settings update error.
    pub fn settings_update(index: impl Into<String>, source: SearchError) -> Self {
        Self::SettingsUpdate {
            index: index.into(),
            source,
        }
    }
}
