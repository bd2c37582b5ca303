//! Settings reconciliation.
//!
//! Pushes the settings derived from a model declaration to the model's
//! remote index. Every call sends the full document, so running it again
//! with the same declaration leaves the remote settings unchanged.

use tracing::{info, instrument};

use meili_index_shared::ModelDeclaration;

use crate::client::{IndexHandle, MeiliClient};
use crate::errors::SetupError;
use crate::settings::IndexSettings;

/// Reconcile one model's declaration with its remote index.
///
/// Indexes are created eagerly, so the model must declare a primary key.
/// That check happens before any request is sent. The settings task is
/// awaited, so a rejection raised while the service processes it is
/// reported like a rejected request.
///
/// # Returns
///
/// * `Ok(IndexHandle)` - The index exists and its settings were applied
/// * `Err(SetupError::MissingPrimaryKey)` - If the model declares no primary key
/// * `Err(SetupError::IndexInitialization)` - If probing the index fails
/// * `Err(SetupError::SettingsUpdate)` - If the service rejects the settings
#[instrument(
    skip(declaration, client),
    fields(model = %declaration.model_name(), index = %declaration.index_name())
)]
pub async fn setup_index(
    declaration: &ModelDeclaration,
    client: &MeiliClient,
) -> Result<IndexHandle, SetupError> {
    let primary_key = declaration
        .primary_key()
        .ok_or_else(|| SetupError::missing_primary_key(declaration.model_name()))?;

    let index = client
        .ensure_index(declaration.index_name(), Some(primary_key))
        .await?;

    let settings = IndexSettings::from_declaration(declaration);
    let enqueued = index
        .update_settings(&settings)
        .await
        .map_err(|e| SetupError::settings_update(declaration.index_name(), e))?;
    let task = index
        .wait_for_task(&enqueued)
        .await
        .map_err(|e| SetupError::settings_update(declaration.index_name(), e))?;

    info!(
        index = %declaration.index_name(),
        task_uid = task.task_uid,
        searchable = settings.searchable_attributes.len(),
        filterable = settings.filterable_attributes.len(),
        sortable = settings.sortable_attributes.len(),
        "Applied index settings"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use meili_index_shared::{DeclarationBuilder, FieldAttribute};

    use crate::errors::SearchError;
    use crate::testing::{ProviderCall, RecordingProvider};

    struct Article;
    struct Draft;

    fn article() -> ModelDeclaration {
        DeclarationBuilder::for_model::<Article>()
            .primary_key("id")
            .searchable("title")
            .searchable("body")
            .filterable("category")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_article_settings_are_sent_to_lowercased_index() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());

        let index = setup_index(&article(), &client).await.unwrap();

        assert_eq!(index.uid(), "article");
        assert_eq!(provider.primary_key("article").await, Some("id".to_string()));
        assert_eq!(
            provider.settings("article").await.unwrap(),
            IndexSettings {
                primary_key: Some("id".to_string()),
                searchable_attributes: vec!["title".to_string(), "body".to_string()],
                filterable_attributes: vec!["category".to_string()],
                sortable_attributes: vec![],
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_primary_key_makes_no_calls() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());
        let declaration = DeclarationBuilder::for_model::<Draft>()
            .field("title", &[FieldAttribute::Searchable])
            .build()
            .unwrap();

        let result = setup_index(&declaration, &client).await;

        assert_eq!(
            result.unwrap_err(),
            SetupError::MissingPrimaryKey {
                model: "Draft".to_string()
            }
        );
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_existing_index_only_gets_settings() {
        let provider = Arc::new(RecordingProvider::new().with_existing_index("article"));
        let client = MeiliClient::with_provider(provider.clone());

        setup_index(&article(), &client).await.unwrap();

        let calls = provider.calls().await;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ProviderCall::GetStats("article".to_string()));
        assert!(matches!(calls[1], ProviderCall::UpdateSettings { ref index, .. } if index == "article"));
        assert_eq!(calls[2], ProviderCall::WaitForTask(0));
    }

    #[tokio::test]
    async fn test_missing_index_is_created_before_settings() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());

        setup_index(&article(), &client).await.unwrap();

        let calls = provider.calls().await;
        assert_eq!(calls.len(), 5);
        assert_eq!(
            calls[1],
            ProviderCall::CreateIndex {
                index: "article".to_string(),
                primary_key: Some("id".to_string()),
            }
        );
        assert_eq!(calls[2], ProviderCall::WaitForTask(0));
        assert!(matches!(calls[3], ProviderCall::UpdateSettings { .. }));
        assert_eq!(calls[4], ProviderCall::WaitForTask(1));
    }

    #[tokio::test]
    async fn test_settings_failure_is_surfaced() {
        let provider = Arc::new(RecordingProvider::new().with_settings_failure("article"));
        let client = MeiliClient::with_provider(provider);

        let result = setup_index(&article(), &client).await;

        match result.unwrap_err() {
            SetupError::SettingsUpdate { index, source } => {
                assert_eq!(index, "article");
                assert!(matches!(source, SearchError::ApiError { ref code, .. } if code == "invalid_settings"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_settings_rejected_during_processing_is_surfaced() {
        let provider = Arc::new(
            RecordingProvider::new()
                .with_existing_index("article")
                .with_task_failure("article", "settingsUpdate", "invalid_settings_ranking_rules"),
        );
        let client = MeiliClient::with_provider(provider.clone());

        let result = setup_index(&article(), &client).await;

        match result.unwrap_err() {
            SetupError::SettingsUpdate { index, source } => {
                assert_eq!(index, "article");
                assert_eq!(source.code(), Some("invalid_settings_ranking_rules"));
                assert!(matches!(source, SearchError::TaskFailed { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(provider.settings("article").await.is_none());
    }

    #[tokio::test]
    async fn test_repeated_setup_sends_identical_documents() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());
        let declaration = article();

        setup_index(&declaration, &client).await.unwrap();
        setup_index(&declaration, &client).await.unwrap();

        let documents: Vec<IndexSettings> = provider
            .calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::UpdateSettings { settings, .. } => Some(settings),
                _ => None,
            })
            .collect();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0], documents[1]);
        assert_eq!(
            serde_json::to_string(&documents[0]).unwrap(),
            serde_json::to_string(&documents[1]).unwrap()
        );
    }
}
