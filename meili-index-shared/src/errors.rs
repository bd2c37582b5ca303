//! Declaration error types.

use thiserror::Error;

/// Errors raised while finalising or registering model declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// An index name was declared explicitly but is blank.
    #[error("Model {model} declares an empty index name")]
    EmptyIndexName { model: String },

    /// No index name was declared and none could be derived from the type name.
    #[error("Model {model} has no index name")]
    MissingIndexName { model: String },

    /// The index name contains characters or a length the service rejects.
    #[error("Model {model} declares invalid index name {index:?}: only 1 to 400 ASCII alphanumerics, '-' or '_' are allowed")]
    InvalidIndexName { model: String, index: String },

    /// A field-level marking was given a blank field name.
    #[error("Model {model} marks an empty field name as {attribute}")]
    EmptyFieldName { model: String, attribute: String },

    /// Two different model types resolve to the same index, ignoring case.
    #[error("Index {index} is declared by both {first} and {second}")]
    DuplicateIndexName {
        index: String,
        first: String,
        second: String,
    },
}

impl DeclarationError {
    /// Create an empty index name error.
    pub fn empty_index_name(model: impl Into<String>) -> Self {
        Self::EmptyIndexName {
            model: model.into(),
        }
    }

    /// Create a missing index name error.
    pub fn missing_index_name(model: impl Into<String>) -> Self {
        Self::MissingIndexName {
            model: model.into(),
        }
    }

    /// Create an invalid index name error.
    pub fn invalid_index_name(model: impl Into<String>, index: impl Into<String>) -> Self {
        Self::InvalidIndexName {
            model: model.into(),
            index: index.into(),
        }
    }

    /// Create an empty field name error.
    pub fn empty_field_name(model: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::EmptyFieldName {
            model: model.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a duplicate index name error.
    pub fn duplicate_index_name(
        index: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateIndexName {
            index: index.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}
