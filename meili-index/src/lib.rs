//! # Meili Index
//!
//! Startup wiring between application models and Meilisearch.
//!
//! A [`MeiliModule`] is built once from a [`ConnectionConfig`] (directly,
//! from an async resolver, or from the environment). Its
//! [`MeiliModule::for_feature`] reconciles every declared model with its
//! remote index and returns an [`IndexRegistry`] from which the rest of
//! the application looks up index handles.

pub mod config;
pub mod index_registry;
pub mod module;
pub mod registration;
pub mod telemetry;

pub use config::{load_config_from_env, ConnectionConfig};
pub use index_registry::{index_token, IndexRegistry};
pub use module::MeiliModule;
pub use registration::{register_models, register_models_detailed, ModelSetupFailure, RegistrationSummary};
pub use telemetry::{init_tracing, LogFormat};

pub use meili_index_repository::{IndexHandle, MeiliClient, SearchError, SetupError};
pub use meili_index_shared::{
    DeclarationBuilder, DeclarationError, FieldAttribute, ModelDeclaration, ModelRegistry,
    SearchModel,
};

use thiserror::Error;

/// Errors that can occur while building the module or registering models.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Connection or index setup error.
    #[error("Setup error: {0}")]
    SetupError(#[from] SetupError),

    /// Invalid model declaration.
    #[error("Declaration error: {0}")]
    DeclarationError(#[from] DeclarationError),

    /// One or more models failed to register.
    #[error(
        "Failed to register {} model(s): {}",
        .0.len(),
        registration::describe_failures(.0)
    )]
    RegistrationError(Vec<ModelSetupFailure>),

    /// No handle is registered for the requested index.
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    /// Tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

impl ModuleError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an unknown index error.
    pub fn unknown_index(name: impl Into<String>) -> Self {
        Self::UnknownIndex(name.into())
    }

    /// Create a telemetry error.
    pub fn telemetry(msg: impl Into<String>) -> Self {
        Self::TelemetryError(msg.into())
    }
}
