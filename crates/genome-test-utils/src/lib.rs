//! Testing utilities for the genome workspace
//!
//! Shared fixtures, state builders and proptest strategies.

#![allow(missing_docs)]

use genome_log::StateManager;
use genome_model::{Genome, GenomeMeta, Level, LevelSchema, Node, NodeId};
use proptest::prelude::*;
use std::sync::Arc;

/// `n0_test` ⊃ `n1_test` ⊃ `n2_test`, valid under the default schema
pub fn scenario_genome() -> Genome {
    let feature = Node::new("n2_test", Level::Feature, "Feature Test")
        .with_attribute("endpoint", "/api/test")
        .with_attribute("method", "GET");
    let section = Node::new("n1_test", Level::Section, "Section Test").with_child(feature);
    let phase = Node::new("n0_test", Level::Phase, "Phase Test").with_child(section);
    Genome::from_phases(GenomeMeta::default(), vec![phase], &LevelSchema::default()).unwrap()
}

/// Two phases with components carrying `ui_hint`s
///
/// ```text
/// discovery
///   research
///     interviews [GET /interviews]
///       c_form  (ui_hint: form)
///       c_table (ui_hint: table)
///     surveys [POST /surveys]
///       c_form2 (ui_hint: form)
///       c_chart (ui_hint: chart)
/// delivery
///   launch
///     rollout [PUT /rollout]
///       c_timeline (ui_hint: timeline)
///       c_plain    (no hint)
/// ```
pub fn sample_genome() -> Genome {
    let component = |id: &str, hint: Option<&str>| {
        let node = Node::new(id, Level::Component, id.trim_start_matches("c_"));
        match hint {
            Some(hint) => node.with_attribute("ui_hint", hint),
            None => node.with_attribute("ui_hint", serde_json::Value::Null),
        }
    };
    let feature = |id: &str, endpoint: &str, method: &str| {
        Node::new(id, Level::Feature, id)
            .with_attribute("endpoint", endpoint)
            .with_attribute("method", method)
    };

    let discovery = Node::new("discovery", Level::Phase, "Discovery").with_child(
        Node::new("research", Level::Section, "Research")
            .with_child(
                feature("interviews", "/interviews", "GET")
                    .with_child(component("c_form", Some("form")))
                    .with_child(component("c_table", Some("table"))),
            )
            .with_child(
                feature("surveys", "/surveys", "POST")
                    .with_child(component("c_form2", Some("form")))
                    .with_child(component("c_chart", Some("chart"))),
            ),
    );
    let delivery = Node::new("delivery", Level::Phase, "Delivery").with_child(
        Node::new("launch", Level::Section, "Launch").with_child(
            feature("rollout", "/rollout", "PUT")
                .with_child(component("c_timeline", Some("timeline")))
                .with_child(component("c_plain", None)),
        ),
    );

    let meta = GenomeMeta {
        title: Some("Sample".to_string()),
        ..GenomeMeta::default()
    };
    Genome::from_phases(meta, vec![discovery, delivery], &sample_schema()).unwrap()
}

/// Default schema minus the component `ui_hint` requirement
pub fn sample_schema() -> LevelSchema {
    LevelSchema::default().with_required(Level::Component, Vec::<String>::new())
}

pub fn scenario_state() -> Arc<StateManager> {
    Arc::new(StateManager::new(scenario_genome(), LevelSchema::default()))
}

pub fn sample_state() -> Arc<StateManager> {
    Arc::new(StateManager::new(sample_genome(), sample_schema()))
}

pub fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

/// Genome JSON document for loader tests
pub fn scenario_json() -> String {
    serde_json::to_string_pretty(&scenario_genome().into_document()).unwrap()
}

fn arb_subtree(level: Level, prefix: String, width: usize) -> BoxedStrategy<Node> {
    let label = prefix.clone();
    match level.child() {
        None => Just(Node::new(prefix, level, label)).boxed(),
        Some(child_level) => (0..=width)
            .prop_flat_map(move |n| {
                let prefix = prefix.clone();
                let children: Vec<_> = (0..n)
                    .map(|i| arb_subtree(child_level, format!("{prefix}.{i}"), width))
                    .collect();
                let label = label.clone();
                children.prop_map(move |children| Node {
                    children,
                    ..Node::new(prefix.clone(), level, label.clone())
                })
            })
            .boxed(),
    }
}

/// Genomes of up to `width` children per node, ids unique by path
pub fn arb_genome(width: usize) -> impl Strategy<Value = Genome> {
    (1..=width.max(1))
        .prop_flat_map(move |n| {
            (0..n)
                .map(|i| arb_subtree(Level::Phase, format!("g{i}"), width))
                .collect::<Vec<_>>()
        })
        .prop_map(|phases| {
            Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::permissive()).unwrap()
        })
}
