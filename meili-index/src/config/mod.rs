//! Connection configuration sources for the module.

mod environment;

pub use environment::{
    config_from_lookup, load_config_from_env, MEILI_API_KEY_VAR, MEILI_HOST_VAR,
    MEILI_TIMEOUT_MS_VAR,
};
pub use meili_index_repository::ConnectionConfig;
