use genome_log::StateManager;
use genome_model::{is_strict_descendant, LevelSchema, NodeId};
use genome_nav::{DrillDown, NavError, NavState};
use genome_test_utils::arb_genome;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Step {
    Enter(usize),
    Exit,
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec(
        prop_oneof![
            3 => any::<usize>().prop_map(Step::Enter),
            1 => Just(Step::Exit),
        ],
        0..32,
    )
}

proptest! {
    #[test]
    fn prop_breadcrumb_tracks_successful_moves(genome in arb_genome(3), steps in steps()) {
        let ids: Vec<NodeId> = genome.ids().cloned().collect();
        let tree = genome.clone();
        let state = Arc::new(StateManager::new(genome, LevelSchema::permissive()));
        let mut nav = DrillDown::new(state);

        let mut enters = 0usize;
        let mut exits = 0usize;
        for step in steps {
            match step {
                Step::Enter(i) => {
                    let id = &ids[i % ids.len()];
                    let scope = nav.stack().last().cloned();
                    match nav.enter(id) {
                        Ok(node) => {
                            enters += 1;
                            prop_assert_eq!(&node.id, id);
                            prop_assert!(tree.contains(id.as_str()));
                            if let Some(scope) = scope {
                                let scope = tree.find(scope.as_str()).unwrap();
                                prop_assert!(is_strict_descendant(scope, id.as_str()));
                            }
                        }
                        Err(NavError::OutOfScope { .. }) => prop_assert!(scope.is_some()),
                        Err(other) => prop_assert!(false, "unexpected error {other}"),
                    }
                }
                Step::Exit => match nav.exit() {
                    Ok(_) => exits += 1,
                    Err(NavError::AtRoot) => prop_assert_eq!(enters, exits),
                    Err(other) => prop_assert!(false, "unexpected error {other}"),
                },
            }

            let crumbs = nav.breadcrumb().unwrap();
            prop_assert_eq!(crumbs.len(), enters - exits);
            prop_assert_eq!(nav.state() == NavState::Root, crumbs.is_empty());
        }
    }

    #[test]
    fn prop_enter_then_exit_restores_scope(genome in arb_genome(3), path in proptest::collection::vec(any::<usize>(), 0..4), pick in any::<usize>()) {
        let state = Arc::new(StateManager::new(genome, LevelSchema::permissive()));
        let mut nav = DrillDown::new(state);

        for p in path {
            let children: Vec<NodeId> = match nav.current_scope().unwrap() {
                genome_nav::ScopeView::Root(tree) => tree.phases().iter().map(|n| n.id.clone()).collect(),
                genome_nav::ScopeView::Node(node) => node.children.iter().map(|n| n.id.clone()).collect(),
            };
            if children.is_empty() {
                break;
            }
            nav.enter(&children[p % children.len()]).unwrap();
        }

        let before_scope = nav.current_scope().unwrap();
        let before_crumbs = nav.breadcrumb().unwrap();

        let candidates: Vec<NodeId> = match &before_scope {
            genome_nav::ScopeView::Root(tree) => tree.ids().cloned().collect(),
            genome_nav::ScopeView::Node(node) => node.descendants().skip(1).map(|n| n.id.clone()).collect(),
        };
        prop_assume!(!candidates.is_empty());

        nav.enter(&candidates[pick % candidates.len()]).unwrap();
        let restored = nav.exit().unwrap();

        prop_assert_eq!(restored, before_scope);
        prop_assert_eq!(nav.breadcrumb().unwrap(), before_crumbs);
    }
}
