//! Index settings document.
//!
//! The document sent to the search service to configure one index. It is
//! derived from a [`ModelDeclaration`] on every reconciliation and never
//! stored locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use meili_index_shared::ModelDeclaration;

/// `pagination` settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSettings {
    pub max_total_hits: usize,
}

/// `faceting` settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetingSettings {
    pub max_values_per_facet: usize,
}

/// Settings document for one index.
///
/// The three attribute lists are always present. Every other setting is
/// only serialized when the model declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub searchable_attributes: Vec<String>,
    #[serde(default)]
    pub filterable_attributes: Vec<String>,
    #[serde(default)]
    pub sortable_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faceting: Option<FacetingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed_attributes: Option<Vec<String>>,
}

impl IndexSettings {
    /// Build the settings document for a declared model.
    ///
    /// An empty set of displayed fields counts as undeclared, so the
    /// service keeps displaying every field.
    pub fn from_declaration(declaration: &ModelDeclaration) -> Self {
        let displayed = declaration.displayed_fields();

        Self {
            primary_key: declaration.primary_key().map(str::to_string),
            searchable_attributes: declaration.searchable_fields().to_vec(),
            filterable_attributes: declaration.filterable_fields().to_vec(),
            sortable_attributes: declaration.sortable_fields().to_vec(),
            ranking_rules: declaration.ranking_rules().map(<[String]>::to_vec),
            stop_words: declaration.stop_words().map(<[String]>::to_vec),
            synonyms: declaration.synonyms().cloned(),
            distinct_attribute: declaration.distinct_field().map(str::to_string),
            pagination: declaration
                .pagination_max_total_hits()
                .map(|max_total_hits| PaginationSettings { max_total_hits }),
            faceting: declaration
                .faceting_max_values_per_facet()
                .map(|max_values_per_facet| FacetingSettings {
                    max_values_per_facet,
                }),
            displayed_attributes: (!displayed.is_empty()).then(|| displayed.to_vec()),
        }
    }
}
