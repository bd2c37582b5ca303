//! Per-type declaration registry.

use std::collections::HashMap;

use tracing::debug;

use crate::declaration::{DeclarationBuilder, ModelDeclaration, ModelId};
use crate::errors::DeclarationError;

/// A model type that describes its own search index.
///
/// # Example
///
/// ```
/// use meili_index_shared::{DeclarationBuilder, SearchModel};
///
/// struct Product;
///
/// impl SearchModel for Product {
///     fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
///         builder
///             .primary_key("sku")
///             .searchable("name")
///             .filterable("brand")
///             .sortable("price")
///     }
/// }
///
/// let declaration = Product::declaration().unwrap();
/// assert_eq!(declaration.index_name(), "product");
/// ```
pub trait SearchModel: 'static {
    /// Record the model's index configuration on the builder.
    fn declare(builder: DeclarationBuilder) -> DeclarationBuilder;

    /// Build the finalised declaration for this model.
    fn declaration() -> Result<ModelDeclaration, DeclarationError> {
        Self::declare(DeclarationBuilder::for_model::<Self>()).build()
    }
}

/// Collection of model declarations, one per model type.
///
/// Declarations are kept in registration order. Registering the same type
/// again replaces its previous declaration.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    declarations: Vec<ModelDeclaration>,
    positions: HashMap<ModelId, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type implementing [`SearchModel`].
    pub fn register<T: SearchModel>(&mut self) -> Result<&mut Self, DeclarationError> {
        let declaration = T::declaration()?;
        self.insert(declaration)
    }

    /// Register a type through an ad-hoc declaration closure.
    pub fn declare<T, F>(&mut self, declare: F) -> Result<&mut Self, DeclarationError>
    where
        T: ?Sized + 'static,
        F: FnOnce(DeclarationBuilder) -> DeclarationBuilder,
    {
        let declaration = declare(DeclarationBuilder::for_model::<T>()).build()?;
        self.insert(declaration)
    }

    /// Register an already finalised declaration.
    pub fn insert(&mut self, declaration: ModelDeclaration) -> Result<&mut Self, DeclarationError> {
        let model = declaration.model();

        if let Some(other) = self
            .declarations
            .iter()
            .find(|d| {
                d.model() != model
                    && d.index_name()
                        .eq_ignore_ascii_case(declaration.index_name())
            })
        {
            return Err(DeclarationError::duplicate_index_name(
                declaration.index_name(),
                other.model_name(),
                declaration.model_name(),
            ));
        }

        debug!(
            model = %model,
            index = %declaration.index_name(),
            "Registered model declaration"
        );

        match self.positions.get(&model) {
            Some(&position) => self.declarations[position] = declaration,
            None => {
                self.positions.insert(model, self.declarations.len());
                self.declarations.push(declaration);
            }
        }

        Ok(self)
    }

    /// Declaration registered for `T`, if any.
    pub fn get<T: ?Sized + 'static>(&self) -> Option<&ModelDeclaration> {
        self.positions
            .get(&ModelId::of::<T>())
            .map(|&position| &self.declarations[position])
    }

    /// All declarations in registration order.
    pub fn declarations(&self) -> &[ModelDeclaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::FieldAttribute;

    struct Article;
    struct Author;
    struct LegacyArticle;

    impl SearchModel for Article {
        fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
            builder
                .primary_key("id")
                .field("title", &[FieldAttribute::Searchable])
                .searchable("body")
                .filterable("category")
        }
    }

    impl SearchModel for Author {
        fn declare(builder: DeclarationBuilder) -> DeclarationBuilder {
            builder.index_name("people").primary_key("author_id")
        }
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = ModelRegistry::new();
        registry
            .register::<Author>()
            .unwrap()
            .register::<Article>()
            .unwrap();

        let names: Vec<&str> = registry
            .declarations()
            .iter()
            .map(|d| d.index_name())
            .collect();
        assert_eq!(names, vec!["people", "article"]);
    }

    #[test]
    fn test_reregistering_replaces_declaration() {
        let mut registry = ModelRegistry::new();
        registry.register::<Article>().unwrap();
        registry
            .declare::<Article, _>(|b| b.primary_key("id").sortable("published_at"))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let declaration = registry.get::<Article>().unwrap();
        assert!(declaration.searchable_fields().is_empty());
        assert_eq!(declaration.sortable_fields(), &["published_at"]);
    }

    #[test]
    fn test_duplicate_index_name_across_types_is_rejected() {
        let mut registry = ModelRegistry::new();
        registry.register::<Article>().unwrap();

        let result = registry.declare::<LegacyArticle, _>(|b| b.index_name("article"));
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::DuplicateIndexName {
                index: "article".to_string(),
                first: "Article".to_string(),
                second: "LegacyArticle".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_index_names_differing_only_in_case_collide() {
        let mut registry = ModelRegistry::new();
        registry.register::<Article>().unwrap();

        let result = registry.declare::<LegacyArticle, _>(|b| b.index_name("Article"));
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::DuplicateIndexName {
                index: "Article".to_string(),
                first: "Article".to_string(),
                second: "LegacyArticle".to_string(),
            }
        );
    }

    #[test]
    fn test_get_unknown_model() {
        let registry = ModelRegistry::new();
        assert!(registry.get::<Article>().is_none());
        assert!(registry.is_empty());
    }
}
