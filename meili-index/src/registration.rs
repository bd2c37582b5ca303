//! Model registration.
//!
//! Reconciles every declared model with its remote index and publishes the
//! resulting handles. Each model touches only its own index, so all
//! reconciliations run concurrently and one failure never cancels the
//! others. Models whose index shares a token with an earlier model's are
//! rejected before any request is sent.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{error, info, instrument};

use meili_index_repository::{setup_index, MeiliClient, SetupError};
use meili_index_shared::ModelDeclaration;

use crate::index_registry::{index_token, IndexRegistry};
use crate::ModuleError;

/// A model whose index could not be set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSetupFailure {
    /// Short type name of the model.
    pub model: String,
    /// Index the model is declared for.
    pub index: String,
    pub error: SetupError,
}

/// Outcome of registering a batch of models.
#[derive(Debug, Default)]
pub struct RegistrationSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Handles of every model that was set up.
    pub registry: IndexRegistry,
    pub failures: Vec<ModelSetupFailure>,
}

impl RegistrationSummary {
    /// Whether every model was set up.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, declaration: &ModelDeclaration, error: SetupError) {
        error!(
            model = %declaration.model_name(),
            index = %declaration.index_name(),
            error = %error,
            "Failed to set up index"
        );
        self.failed += 1;
        self.failures.push(ModelSetupFailure {
            model: declaration.model_name().to_string(),
            index: declaration.index_name().to_string(),
            error,
        });
    }

    /// Turn the summary into the registry, failing if any model failed.
    pub fn into_result(self) -> Result<IndexRegistry, ModuleError> {
        if self.failures.is_empty() {
            Ok(self.registry)
        } else {
            Err(ModuleError::RegistrationError(self.failures))
        }
    }
}

/// Register models and fail if any of them could not be set up.
///
/// Every model is attempted before the error is returned.
pub async fn register_models(
    models: &[ModelDeclaration],
    client: &MeiliClient,
) -> Result<IndexRegistry, ModuleError> {
    register_models_detailed(models, client).await.into_result()
}

/// Register models and report successes and failures separately.
#[instrument(skip(models, client), fields(model_count = models.len()))]
pub async fn register_models_detailed(
    models: &[ModelDeclaration],
    client: &MeiliClient,
) -> RegistrationSummary {
    let mut summary = RegistrationSummary {
        total: models.len(),
        ..Default::default()
    };

    let mut owners: HashMap<String, &ModelDeclaration> = HashMap::new();
    let mut accepted = Vec::with_capacity(models.len());
    for declaration in models {
        match owners.get(&index_token(declaration.index_name())) {
            Some(owner) => {
                let error = SetupError::index_conflict(
                    declaration.index_name(),
                    owner.index_name(),
                    owner.model_name(),
                );
                summary.record_failure(declaration, error);
            }
            None => {
                owners.insert(index_token(declaration.index_name()), declaration);
                accepted.push(declaration);
            }
        }
    }

    let outcomes = join_all(accepted.into_iter().map(|declaration| async move {
        (declaration, setup_index(declaration, client).await)
    }))
    .await;

    for (declaration, outcome) in outcomes {
        match outcome {
            Ok(handle) => {
                summary.succeeded += 1;
                summary.registry.insert(handle);
            }
            Err(e) => summary.record_failure(declaration, e),
        }
    }

    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Registered models"
    );

    summary
}

/// One line per failure, used in error messages.
pub(crate) fn describe_failures(failures: &[ModelSetupFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({}): {}", f.model, f.index, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use meili_index_repository::testing::{ProviderCall, RecordingProvider};
    use meili_index_shared::{DeclarationBuilder, SearchModel};

    struct Article;
    struct Author;
    struct Comment;

    impl SearchModel for Article {
        fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
            builder
                .primary_key("id")
                .searchable("title")
                .searchable("body")
                .filterable("category")
        }
    }

    impl SearchModel for Author {
        fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
            builder
                .index_name("people")
                .primary_key("author_id")
                .sortable("name")
        }
    }

    impl SearchModel for Comment {
        fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
            builder.searchable("text")
        }
    }

    fn declarations() -> Vec<ModelDeclaration> {
        vec![
            Article::declaration().unwrap(),
            Author::declaration().unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_register_publishes_handles() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());

        let registry = register_models(&declarations(), &client).await.unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("MEILI_INDEX_ARTICLE").unwrap().uid(), "article");
        assert_eq!(registry.get("MEILI_INDEX_PEOPLE").unwrap().uid(), "people");
        assert!(provider.settings("article").await.is_some());
        assert!(provider.settings("people").await.is_some());
    }

    #[tokio::test]
    async fn test_settings_failure_does_not_block_other_models() {
        let provider = Arc::new(RecordingProvider::new().with_settings_failure("article"));
        let client = MeiliClient::with_provider(provider.clone());

        let summary = register_models_detailed(&declarations(), &client).await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].model, "Article");
        assert!(matches!(
            summary.failures[0].error,
            SetupError::SettingsUpdate { .. }
        ));
        assert!(summary.registry.index("people").is_some());
        assert!(summary.registry.index("article").is_none());
        assert_eq!(
            provider.settings("people").await.unwrap().sortable_attributes,
            vec!["name".to_string()]
        );
    }

    #[tokio::test]
    async fn test_register_fails_loud_after_attempting_all() {
        let provider = Arc::new(RecordingProvider::new().with_settings_failure("article"));
        let client = MeiliClient::with_provider(provider.clone());

        let result = register_models(&declarations(), &client).await;

        match result {
            Err(ModuleError::RegistrationError(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, "article");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(provider.settings("people").await.is_some());
    }

    #[tokio::test]
    async fn test_missing_primary_key_skips_network_for_that_model() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());
        let models = vec![
            Comment::declaration().unwrap(),
            Article::declaration().unwrap(),
        ];

        let summary = register_models_detailed(&models, &client).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.failures[0].error,
            SetupError::MissingPrimaryKey {
                model: "Comment".to_string()
            }
        );
        let touched_comment = provider.calls().await.iter().any(|call| match call {
            ProviderCall::GetStats(index) => index == "comment",
            ProviderCall::CreateIndex { index, .. } => index == "comment",
            ProviderCall::UpdateSettings { index, .. } => index == "comment",
            _ => false,
        });
        assert!(!touched_comment);
        assert!(summary.registry.index("article").is_some());
    }

    #[tokio::test]
    async fn test_indexes_differing_only_in_case_conflict() {
        let provider = Arc::new(RecordingProvider::new());
        let client = MeiliClient::with_provider(provider.clone());
        let upper = DeclarationBuilder::for_model::<Article>()
            .index_name("Article")
            .primary_key("id")
            .build()
            .unwrap();
        let lower = DeclarationBuilder::for_model::<Author>()
            .index_name("article")
            .primary_key("id")
            .build()
            .unwrap();

        let summary = register_models_detailed(&[upper, lower], &client).await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.failures[0].error,
            SetupError::index_conflict("article", "Article", "Article")
        );
        assert_eq!(summary.failures[0].model, "Author");
        assert_eq!(summary.registry.index("Article").unwrap().uid(), "Article");
        assert!(summary.registry.index("article").is_none());
        assert!(!provider.has_index("article").await);
    }

    #[tokio::test]
    async fn test_register_empty_model_list() {
        let client = MeiliClient::with_provider(Arc::new(RecordingProvider::new()));

        let registry = register_models(&[], &client).await.unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_describe_failures() {
        let failures = vec![ModelSetupFailure {
            model: "Comment".to_string(),
            index: "comment".to_string(),
            error: SetupError::missing_primary_key("Comment"),
        }];

        assert_eq!(
            describe_failures(&failures),
            "Comment (comment): Model Comment does not declare a primary key"
        );
    }
}
