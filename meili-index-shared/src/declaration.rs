//! Model declarations.
//!
//! A declaration records how one application type maps onto one search
//! index: the index name, the primary key, per-field markings and the
//! index-level settings. Declarations are built with a
//! [`DeclarationBuilder`] and finalised once into a [`ModelDeclaration`].
//!
//! # Example
//!
//! ```
//! use meili_index_shared::{DeclarationBuilder, FieldAttribute};
//!
//! struct Article;
//!
//! let declaration = DeclarationBuilder::for_model::<Article>()
//!     .primary_key("id")
//!     .field("title", &[FieldAttribute::Searchable, FieldAttribute::Sortable])
//!     .searchable("body")
//!     .filterable("category")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(declaration.index_name(), "article");
//! assert_eq!(declaration.searchable_fields(), &["title", "body"]);
//! ```

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::DeclarationError;
use crate::field_set::FieldSet;

/// Longest index uid the search service accepts, in bytes.
pub const MAX_INDEX_UID_LEN: usize = 400;

/// Whether `uid` can name a remote index: 1 to [`MAX_INDEX_UID_LEN`]
/// ASCII alphanumerics, `-` or `_`.
pub fn is_valid_index_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= MAX_INDEX_UID_LEN
        && uid
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Identity of a declared model type.
#[derive(Debug, Clone, Copy)]
pub struct ModelId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ModelId {
    /// Identity of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name, e.g. `my_app::models::Article`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name with generic arguments removed.
    pub fn short_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ModelId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelId {}

impl Hash for ModelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Field-level markings a model can put on one of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAttribute {
    Searchable,
    Filterable,
    Sortable,
    Displayed,
    /// At most one field per model; a later marking replaces an earlier one.
    Distinct,
}

impl FieldAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searchable => "searchable",
            Self::Filterable => "filterable",
            Self::Sortable => "sortable",
            Self::Displayed => "displayed",
            Self::Distinct => "distinct",
        }
    }
}

impl fmt::Display for FieldAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-type builder for a [`ModelDeclaration`].
///
/// Every method records one declared attribute and returns the builder.
/// Field markings accumulate in declaration order without duplicates.
/// Validation is deferred to [`DeclarationBuilder::build`].
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    model: ModelId,
    index_name: Option<String>,
    primary_key: Option<String>,
    searchable: FieldSet,
    filterable: FieldSet,
    sortable: FieldSet,
    displayed: FieldSet,
    distinct: Option<String>,
    ranking_rules: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
    synonyms: Option<BTreeMap<String, Vec<String>>>,
    pagination_max_total_hits: Option<usize>,
    faceting_max_values_per_facet: Option<usize>,
    blank_field: Option<FieldAttribute>,
}

impl DeclarationBuilder {
    /// Start a declaration for the model type `T`.
    pub fn for_model<T: ?Sized + 'static>() -> Self {
        Self::new(ModelId::of::<T>())
    }

    /// Start a declaration for an already resolved model identity.
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            index_name: None,
            primary_key: None,
            searchable: FieldSet::new(),
            filterable: FieldSet::new(),
            sortable: FieldSet::new(),
            displayed: FieldSet::new(),
            distinct: None,
            ranking_rules: None,
            stop_words: None,
            synonyms: None,
            pagination_max_total_hits: None,
            faceting_max_values_per_facet: None,
            blank_field: None,
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Name of the remote index. Defaults to the lower-cased type name.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Primary key of documents stored in the index.
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    pub fn searchable(self, field: impl Into<String>) -> Self {
        self.mark(field.into(), FieldAttribute::Searchable)
    }

    pub fn filterable(self, field: impl Into<String>) -> Self {
        self.mark(field.into(), FieldAttribute::Filterable)
    }

    pub fn sortable(self, field: impl Into<String>) -> Self {
        self.mark(field.into(), FieldAttribute::Sortable)
    }

    pub fn displayed(self, field: impl Into<String>) -> Self {
        self.mark(field.into(), FieldAttribute::Displayed)
    }

    pub fn distinct(self, field: impl Into<String>) -> Self {
        self.mark(field.into(), FieldAttribute::Distinct)
    }

    /// Mark one field with several attributes at once.
    pub fn field(mut self, field: impl Into<String>, attributes: &[FieldAttribute]) -> Self {
        let field = field.into();
        for attribute in attributes {
            self = self.mark(field.clone(), *attribute);
        }
        self
    }

    pub fn ranking_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranking_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: FieldSet = words.into_iter().collect();
        self.stop_words = Some(words.to_vec());
        self
    }

    /// Replace the whole synonym table.
    pub fn synonyms<I, K, V, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = Some(
            synonyms
                .into_iter()
                .map(|(word, alternatives)| {
                    (word.into(), alternatives.into_iter().map(Into::into).collect())
                })
                .collect(),
        );
        self
    }

    /// Add or replace the synonyms of a single word.
    pub fn synonym<K, V, S>(mut self, word: K, alternatives: V) -> Self
    where
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms
            .get_or_insert_with(BTreeMap::new)
            .insert(word.into(), alternatives.into_iter().map(Into::into).collect());
        self
    }

    /// Maximum number of hits a search can page through.
    pub fn pagination(mut self, max_total_hits: usize) -> Self {
        self.pagination_max_total_hits = Some(max_total_hits);
        self
    }

    /// Maximum number of values returned per facet.
    pub fn faceting(mut self, max_values_per_facet: usize) -> Self {
        self.faceting_max_values_per_facet = Some(max_values_per_facet);
        self
    }

    fn mark(mut self, field: String, attribute: FieldAttribute) -> Self {
        if field.trim().is_empty() {
            self.blank_field.get_or_insert(attribute);
            return self;
        }

        match attribute {
            FieldAttribute::Searchable => {
                self.searchable.insert(field);
            }
            FieldAttribute::Filterable => {
                self.filterable.insert(field);
            }
            FieldAttribute::Sortable => {
                self.sortable.insert(field);
            }
            FieldAttribute::Displayed => {
                self.displayed.insert(field);
            }
            FieldAttribute::Distinct => self.distinct = Some(field),
        }
        self
    }

    /// Validate and freeze the declaration.
    pub fn build(self) -> Result<ModelDeclaration, DeclarationError> {
        let model_name = self.model.short_name();

        if let Some(attribute) = self.blank_field {
            return Err(DeclarationError::empty_field_name(
                model_name,
                attribute.as_str(),
            ));
        }

        let index_name = match self.index_name {
            Some(name) if name.trim().is_empty() => {
                return Err(DeclarationError::empty_index_name(model_name));
            }
            Some(name) => name,
            None if model_name.is_empty() => {
                return Err(DeclarationError::missing_index_name(self.model.type_name()));
            }
            None => model_name.to_lowercase(),
        };

        if !is_valid_index_uid(&index_name) {
            return Err(DeclarationError::invalid_index_name(model_name, index_name));
        }

        Ok(ModelDeclaration {
            model: self.model,
            index_name,
            primary_key: self.primary_key,
            searchable: self.searchable,
            filterable: self.filterable,
            sortable: self.sortable,
            displayed: self.displayed,
            distinct: self.distinct,
            ranking_rules: self.ranking_rules,
            stop_words: self.stop_words,
            synonyms: self.synonyms,
            pagination_max_total_hits: self.pagination_max_total_hits,
            faceting_max_values_per_facet: self.faceting_max_values_per_facet,
        })
    }
}

/// Immutable description of one model's search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDeclaration {
    model: ModelId,
    index_name: String,
    primary_key: Option<String>,
    searchable: FieldSet,
    filterable: FieldSet,
    sortable: FieldSet,
    displayed: FieldSet,
    distinct: Option<String>,
    ranking_rules: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
    synonyms: Option<BTreeMap<String, Vec<String>>>,
    pagination_max_total_hits: Option<usize>,
    faceting_max_values_per_facet: Option<usize>,
}

impl ModelDeclaration {
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Short type name of the declaring model, used in errors and logs.
    pub fn model_name(&self) -> &'static str {
        self.model.short_name()
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn searchable_fields(&self) -> &[String] {
        self.searchable.as_slice()
    }

    pub fn filterable_fields(&self) -> &[String] {
        self.filterable.as_slice()
    }

    pub fn sortable_fields(&self) -> &[String] {
        self.sortable.as_slice()
    }

    pub fn displayed_fields(&self) -> &[String] {
        self.displayed.as_slice()
    }

    pub fn distinct_field(&self) -> Option<&str> {
        self.distinct.as_deref()
    }

    pub fn ranking_rules(&self) -> Option<&[String]> {
        self.ranking_rules.as_deref()
    }

    pub fn stop_words(&self) -> Option<&[String]> {
        self.stop_words.as_deref()
    }

    pub fn synonyms(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.synonyms.as_ref()
    }

    pub fn pagination_max_total_hits(&self) -> Option<usize> {
        self.pagination_max_total_hits
    }

    pub fn faceting_max_values_per_facet(&self) -> Option<usize> {
        self.faceting_max_values_per_facet
    }
}
