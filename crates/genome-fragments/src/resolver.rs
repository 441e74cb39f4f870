//! Elite and contextual fragment resolution

use crate::catalog::{Fragment, FragmentCatalog};
use crate::error::FragmentError;
use genome_model::{ScopeView, UI_HINT_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Placeholder substituted with the `ui_hint` value
pub const HINT_PLACEHOLDER: &str = "{hint}";

/// Resolver tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Contextual key template; must contain `{hint}`
    pub key_template: String,

    /// Suggestions returned with a missing key
    pub max_alternatives: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            key_template: HINT_PLACEHOLDER.to_string(),
            max_alternatives: 3,
        }
    }
}

impl ResolverConfig {
    /// Check the template
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidTemplate`] without a `{hint}` placeholder
    pub fn validate(&self) -> Result<(), FragmentError> {
        if self.key_template.contains(HINT_PLACEHOLDER) {
            Ok(())
        } else {
            Err(FragmentError::InvalidTemplate {
                template: self.key_template.clone(),
            })
        }
    }

    fn key_for(&self, hint: &str) -> String {
        self.key_template.replace(HINT_PLACEHOLDER, hint)
    }
}

/// Two disjoint fragment tiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFragments {
    /// Curated keys, independent of scope
    pub elite: Vec<String>,
    /// Keys derived from the scope's `ui_hint`s, first-seen order
    pub contextual: Vec<String>,
}

/// Picks fragment keys for a scope
pub struct ComponentResolver {
    elite: Vec<String>,
    catalog: Arc<dyn FragmentCatalog>,
    config: ResolverConfig,
}

impl std::fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("elite", &self.elite)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ComponentResolver {
    /// Create resolver over a catalog
    ///
    /// Duplicate elite keys are dropped, keeping the first.
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidTemplate`] for a bad key template
    pub fn new(
        elite: Vec<String>,
        catalog: Arc<dyn FragmentCatalog>,
        config: ResolverConfig,
    ) -> Result<Self, FragmentError> {
        config.validate()?;
        let mut seen = HashSet::new();
        let elite = elite.into_iter().filter(|k| seen.insert(k.clone())).collect();
        Ok(Self {
            elite,
            catalog,
            config,
        })
    }

    /// Curated keys
    #[inline]
    #[must_use]
    pub fn elite(&self) -> &[String] {
        &self.elite
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn not_found(&self, key: &str) -> FragmentError {
        let alternatives = self.catalog.nearest(key, self.config.max_alternatives);
        tracing::warn!(key, ?alternatives, "fragment not found");
        FragmentError::FragmentNotFound {
            key: key.to_string(),
            alternatives,
        }
    }

    fn require(&self, key: &str) -> Result<(), FragmentError> {
        if self.catalog.contains(key) {
            Ok(())
        } else {
            Err(self.not_found(key))
        }
    }

    /// Elite and contextual keys for `scope`
    ///
    /// # Errors
    /// Returns [`FragmentError::FragmentNotFound`] for the first key the
    /// catalog lacks, elite keys checked first
    pub fn resolve(&self, scope: &ScopeView) -> Result<ResolvedFragments, FragmentError> {
        for key in &self.elite {
            self.require(key)?;
        }

        let elite: HashSet<&str> = self.elite.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut contextual = Vec::new();
        for node in scope.nodes() {
            let Some(hint) = node.attributes.get(UI_HINT_KEY).and_then(|v| v.as_str()) else {
                continue;
            };
            let key = self.config.key_for(hint);
            if elite.contains(key.as_str()) || !seen.insert(key.clone()) {
                continue;
            }
            self.require(&key)?;
            contextual.push(key);
        }

        tracing::debug!(
            scope = ?scope.scope_id(),
            elite = self.elite.len(),
            contextual = contextual.len(),
            "fragments resolved"
        );
        Ok(ResolvedFragments {
            elite: self.elite.clone(),
            contextual,
        })
    }

    /// One fragment by key
    ///
    /// # Errors
    /// Returns [`FragmentError::FragmentNotFound`] with nearest alternatives
    pub fn fragment(&self, key: &str) -> Result<Fragment, FragmentError> {
        self.catalog.get(key).ok_or_else(|| self.not_found(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, MockFragmentCatalog};
    use genome_model::{Level, Node};
    use genome_test_utils::sample_genome;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn catalog() -> Arc<dyn FragmentCatalog> {
        Arc::new(
            ["hero", "nav", "form", "table", "chart", "timeline"]
                .into_iter()
                .map(|k| (k, format!("<{k}/>")))
                .collect::<InMemoryCatalog>(),
        )
    }

    fn resolver(elite: &[&str]) -> ComponentResolver {
        ComponentResolver::new(
            elite.iter().map(ToString::to_string).collect(),
            catalog(),
            ResolverConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn root_scope_collects_hints_in_first_seen_order() {
        let r = resolver(&["hero", "nav"]);
        let got = r
            .resolve(&ScopeView::Root(Arc::new(sample_genome())))
            .unwrap();
        assert_eq!(got.elite, vec!["hero", "nav"]);
        assert_eq!(got.contextual, vec!["form", "table", "chart", "timeline"]);
    }

    #[test]
    fn narrower_scope_narrows_contextual_only() {
        let r = resolver(&["hero"]);
        let genome = sample_genome();
        let surveys = genome.find("surveys").unwrap().clone();
        let got = r.resolve(&ScopeView::Node(surveys)).unwrap();
        assert_eq!(got.elite, vec!["hero"]);
        assert_eq!(got.contextual, vec!["form", "chart"]);
    }

    #[test]
    fn tiers_are_disjoint() {
        let r = resolver(&["form", "hero"]);
        let got = r
            .resolve(&ScopeView::Root(Arc::new(sample_genome())))
            .unwrap();
        assert_eq!(got.contextual, vec!["table", "chart", "timeline"]);
        assert!(got.contextual.iter().all(|k| !got.elite.contains(k)));
    }

    #[test]
    fn missing_contextual_key_names_alternatives() {
        let r = resolver(&[]);
        let scope = ScopeView::Node(
            Node::new("f", Level::Feature, "F")
                .with_child(Node::new("c", Level::Component, "C").with_attribute("ui_hint", "tabel")),
        );
        assert_eq!(
            r.resolve(&scope).unwrap_err(),
            FragmentError::FragmentNotFound {
                key: "tabel".to_string(),
                alternatives: vec!["table".to_string(), "timeline".to_string()],
            }
        );
    }

    #[test]
    fn non_string_hints_ignored() {
        let r = resolver(&[]);
        let scope = ScopeView::Node(
            Node::new("f", Level::Feature, "F")
                .with_child(Node::new("c1", Level::Component, "C1").with_attribute("ui_hint", 7))
                .with_child(
                    Node::new("c2", Level::Component, "C2")
                        .with_attribute("ui_hint", serde_json::Value::Null),
                ),
        );
        assert!(r.resolve(&scope).unwrap().contextual.is_empty());
    }

    #[test]
    fn template_maps_hints() {
        let catalog: Arc<dyn FragmentCatalog> = Arc::new(
            [("ui/form", "<form/>")]
                .into_iter()
                .collect::<InMemoryCatalog>(),
        );
        let config = ResolverConfig {
            key_template: "ui/{hint}".to_string(),
            ..ResolverConfig::default()
        };
        let r = ComponentResolver::new(Vec::new(), catalog, config).unwrap();
        let scope = ScopeView::Node(
            Node::new("c", Level::Component, "C").with_attribute("ui_hint", "form"),
        );
        assert_eq!(r.resolve(&scope).unwrap().contextual, vec!["ui/form"]);
    }

    #[test]
    fn template_without_placeholder_rejected() {
        let config = ResolverConfig {
            key_template: "static".to_string(),
            ..ResolverConfig::default()
        };
        assert!(matches!(
            ComponentResolver::new(Vec::new(), catalog(), config),
            Err(FragmentError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn missing_elite_key_fails_regardless_of_scope() {
        let mut mock = MockFragmentCatalog::new();
        mock.expect_contains()
            .with(eq("ghost"))
            .return_const(false);
        mock.expect_nearest()
            .with(eq("ghost"), eq(3))
            .times(1)
            .returning(|_, _| vec!["host".to_string()]);

        let r = ComponentResolver::new(
            vec!["ghost".to_string()],
            Arc::new(mock),
            ResolverConfig::default(),
        )
        .unwrap();
        let scope = ScopeView::Node(Node::new("c", Level::Component, "C"));
        assert_eq!(
            r.resolve(&scope).unwrap_err(),
            FragmentError::FragmentNotFound {
                key: "ghost".to_string(),
                alternatives: vec!["host".to_string()],
            }
        );
    }

    #[test]
    fn catalog_is_consulted_once_per_distinct_key() {
        let mut mock = MockFragmentCatalog::new();
        mock.expect_contains()
            .with(eq("form"))
            .times(1)
            .return_const(true);
        mock.expect_contains()
            .with(eq("table"))
            .times(1)
            .return_const(true);
        mock.expect_contains()
            .with(eq("chart"))
            .times(1)
            .return_const(true);
        mock.expect_contains()
            .with(eq("timeline"))
            .times(1)
            .return_const(true);

        let r = ComponentResolver::new(Vec::new(), Arc::new(mock), ResolverConfig::default())
            .unwrap();
        let got = r
            .resolve(&ScopeView::Root(Arc::new(sample_genome())))
            .unwrap();
        assert_eq!(got.contextual.len(), 4);
    }

    #[test]
    fn fragment_lookup() {
        let r = resolver(&[]);
        assert_eq!(r.fragment("chart").unwrap().markup, "<chart/>");
        assert_eq!(r.fragment("chrt").unwrap_err().key(), Some("chrt"));
    }
}
