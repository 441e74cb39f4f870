use genome_fragments::{ComponentResolver, FragmentCatalog, FragmentError, InMemoryCatalog, ResolverConfig};
use genome_model::ScopeView;
use genome_test_utils::sample_genome;
use std::sync::Arc;

const CATALOG_YAML: &str = r#"
hero: "<section class='hero'/>"
form: "<form/>"
table: "<table/>"
chart: "<svg/>"
"#;

#[test]
fn yaml_catalog_missing_hint_reports_alternatives() {
    let catalog = InMemoryCatalog::from_yaml(CATALOG_YAML).unwrap();
    assert_eq!(catalog.len(), 4);

    let resolver = ComponentResolver::new(
        vec!["hero".to_string()],
        Arc::new(catalog),
        ResolverConfig::default(),
    )
    .unwrap();

    // sample genome also hints "timeline", which this catalog lacks
    let err = resolver
        .resolve(&ScopeView::Root(Arc::new(sample_genome())))
        .unwrap_err();
    match err {
        FragmentError::FragmentNotFound { key, alternatives } => {
            assert_eq!(key, "timeline");
            assert!(!alternatives.is_empty());
            assert!(alternatives.len() <= 3);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn json_catalog_resolves_scoped_subtree() {
    let catalog = InMemoryCatalog::from_json(
        r#"{"hero": "<h1/>", "form": "<form/>", "table": "<table/>"}"#,
    )
    .unwrap();
    assert!(catalog.contains("hero"));

    let resolver =
        ComponentResolver::new(vec!["hero".to_string()], Arc::new(catalog), ResolverConfig::default())
            .unwrap();
    let genome = sample_genome();
    let interviews = genome.find("interviews").unwrap().clone();
    let resolved = resolver.resolve(&ScopeView::Node(interviews)).unwrap();
    assert_eq!(resolved.elite, vec!["hero"]);
    assert_eq!(resolved.contextual, vec!["form", "table"]);

    let json = serde_json::to_value(&resolved).unwrap();
    assert_eq!(json["contextual"][1], "table");
}
