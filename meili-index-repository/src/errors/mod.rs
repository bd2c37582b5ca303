//! Error types for the Meilisearch repository.

mod search_error;
mod setup_error;

pub use search_error::SearchError;
pub use setup_error::SetupError;
