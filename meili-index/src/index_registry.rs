//! Published index handles.
//!
//! Handles are stored under a token derived from the index name so that
//! components which only know the name can look them up.

use std::collections::HashMap;

use meili_index_repository::IndexHandle;

use crate::ModuleError;

/// Prefix of every index token.
pub const INDEX_TOKEN_PREFIX: &str = "MEILI_INDEX_";

/// Lookup token for an index name, e.g. `article` → `MEILI_INDEX_ARTICLE`.
pub fn index_token(index_name: &str) -> String {
    format!("{}{}", INDEX_TOKEN_PREFIX, index_name.to_uppercase())
}

/// Index handles keyed by [`index_token`].
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    handles: HashMap<String, IndexHandle>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a handle under the token of its index name.
    ///
    /// Index names differing only in case share a token. Returns the handle
    /// previously published under the same token.
    pub fn insert(&mut self, handle: IndexHandle) -> Option<IndexHandle> {
        self.handles.insert(index_token(handle.uid()), handle)
    }

    /// Look up a handle by token.
    pub fn get(&self, token: &str) -> Option<&IndexHandle> {
        self.handles.get(token)
    }

    /// Look up a handle by its exact index name.
    pub fn index(&self, index_name: &str) -> Option<&IndexHandle> {
        self.get(&index_token(index_name))
            .filter(|handle| handle.uid() == index_name)
    }

    /// Like [`IndexRegistry::index`], but a missing handle is an error.
    pub fn require(&self, index_name: &str) -> Result<IndexHandle, ModuleError> {
        self.index(index_name)
            .cloned()
            .ok_or_else(|| ModuleError::unknown_index(index_name))
    }

    /// Published tokens, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.handles.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexHandle)> {
        self.handles.iter().map(|(token, handle)| (token.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use meili_index_repository::testing::RecordingProvider;
    use meili_index_repository::MeiliClient;

    fn client() -> MeiliClient {
        MeiliClient::with_provider(Arc::new(RecordingProvider::new()))
    }

    #[test]
    fn test_index_token() {
        assert_eq!(index_token("article"), "MEILI_INDEX_ARTICLE");
        assert_eq!(index_token("blog-posts"), "MEILI_INDEX_BLOG-POSTS");
    }

    #[test]
    fn test_lookup_by_token_and_name() {
        let client = client();
        let mut registry = IndexRegistry::new();
        registry.insert(client.index("article"));
        registry.insert(client.index("people"));

        assert_eq!(registry.get("MEILI_INDEX_ARTICLE").unwrap().uid(), "article");
        assert_eq!(registry.index("people").unwrap().uid(), "people");
        assert_eq!(registry.tokens(), vec!["MEILI_INDEX_ARTICLE", "MEILI_INDEX_PEOPLE"]);
    }

    #[test]
    fn test_require_unknown_index() {
        let registry = IndexRegistry::new();
        assert!(matches!(
            registry.require("article"),
            Err(ModuleError::UnknownIndex(ref name)) if name == "article"
        ));
    }

    #[test]
    fn test_lookup_by_name_is_case_sensitive() {
        let client = client();
        let mut registry = IndexRegistry::new();
        registry.insert(client.index("article"));

        assert!(registry.index("Article").is_none());
        assert!(registry.require("Article").is_err());
        assert_eq!(registry.get("MEILI_INDEX_ARTICLE").unwrap().uid(), "article");
    }

    #[test]
    fn test_insert_replaces_same_index() {
        let client = client();
        let mut registry = IndexRegistry::new();

        assert!(registry.insert(client.index("article")).is_none());
        assert!(registry.insert(client.index("article")).is_some());
        assert_eq!(registry.len(), 1);
    }
}
