//! Fragment catalogs
//!
//! A catalog is a flat keyed lookup of pre-rendered UI fragments. The
//! in-memory implementation keeps keys in a radix trie so suggestions for
//! a missing key can be narrowed to those sharing its longest prefix.

use crate::error::FragmentError;
use crate::suggest;
use radix_trie::{Trie, TrieCommon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One pre-rendered UI fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Catalog key
    pub key: String,
    /// Rendered markup
    pub markup: String,
}

/// Keyed fragment lookup
#[cfg_attr(test, mockall::automock)]
pub trait FragmentCatalog: Send + Sync {
    /// Fragment by exact key
    fn get(&self, key: &str) -> Option<Fragment>;

    /// Whether `key` exists
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys, sorted
    fn keys(&self) -> Vec<String>;

    /// Up to `limit` existing keys closest to `key`
    fn nearest(&self, key: &str, limit: usize) -> Vec<String> {
        suggest::rank(key, self.keys(), limit)
    }
}

/// Catalog held in a radix trie
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    trie: Trie<String, Fragment>,
}

impl InMemoryCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a fragment
    pub fn insert(&mut self, key: impl Into<String>, markup: impl Into<String>) {
        let key = key.into();
        let fragment = Fragment {
            key: key.clone(),
            markup: markup.into(),
        };
        self.trie.insert(key, fragment);
    }

    /// Load from a JSON object of `key: markup`
    ///
    /// # Errors
    /// Returns [`FragmentError::Parse`] if the input is not such an object
    pub fn from_json(input: &str) -> Result<Self, FragmentError> {
        let entries: BTreeMap<String, String> =
            serde_json::from_str(input).map_err(|e| FragmentError::Parse(e.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    /// Load from a YAML mapping of `key: markup`
    ///
    /// # Errors
    /// Returns [`FragmentError::Parse`] if the input is not such a mapping
    pub fn from_yaml(input: &str) -> Result<Self, FragmentError> {
        let entries: BTreeMap<String, String> =
            serde_yaml::from_str(input).map_err(|e| FragmentError::Parse(e.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: BTreeMap<String, String>) -> Self {
        let mut catalog = Self::new();
        for (key, markup) in entries {
            catalog.insert(key, markup);
        }
        tracing::debug!(fragments = catalog.len(), "catalog loaded");
        catalog
    }

    /// Number of fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Keys sharing a prefix with `key`, shortening the prefix until at
    /// least `limit` are found or a single char is left
    fn prefix_candidates(&self, key: &str, limit: usize) -> Vec<String> {
        let mut cuts: Vec<usize> = key.char_indices().map(|(i, _)| i).skip(1).collect();
        cuts.push(key.len());

        let mut found = Vec::new();
        for end in cuts.into_iter().rev() {
            if let Some(subtrie) = self.trie.get_raw_descendant(&key[..end]) {
                found = subtrie.keys().cloned().collect();
                if found.len() >= limit {
                    break;
                }
            }
        }
        found
    }
}

impl<K, M> FromIterator<(K, M)> for InMemoryCatalog
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (key, markup) in iter {
            catalog.insert(key, markup);
        }
        catalog
    }
}

impl FragmentCatalog for InMemoryCatalog {
    fn get(&self, key: &str) -> Option<Fragment> {
        self.trie.get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.trie.get(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.trie.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn nearest(&self, key: &str, limit: usize) -> Vec<String> {
        let candidates = self.prefix_candidates(key, limit);
        if candidates.is_empty() {
            suggest::rank(key, self.keys(), limit)
        } else {
            suggest::rank(key, candidates, limit)
        }
    }
}
