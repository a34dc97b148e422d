//! Property-based tests for the points-to solver
//!
//! Invariants that should hold for ALL generated programs:
//! - Monotonicity: points-to sets and the call graph only grow across steps
//! - Soundness: every copy `a = b` ends with pt(b) ⊆ pt(a)
//! - Determinism: two runs produce identical results
//! - Idempotence: re-inserting a PFG edge changes nothing

mod common;

use codegraph_pta::config::{ContextStrategy, PTAConfig};
use codegraph_pta::features::points_to::domain::{CsObjId, PointerId};
use codegraph_pta::features::points_to::infrastructure::{selector_for, PointerFlowGraph, Solver};
use codegraph_pta::PointerAnalysis;
use common::*;
use proptest::prelude::*;

fn op_strategy() -> impl Strategy<Value = Op> {
    let idx = 0..GEN_VARS;
    prop_oneof![
        (idx.clone(), 0..3usize).prop_map(|(i, k)| Op::New(i, k)),
        (idx.clone(), idx.clone()).prop_map(|(i, j)| Op::Copy(i, j)),
        (idx.clone(), idx.clone()).prop_map(|(i, j)| Op::Store(i, j)),
        (idx.clone(), idx.clone()).prop_map(|(i, j)| Op::Load(i, j)),
        (idx.clone(), idx.clone(), idx).prop_map(|(i, j, k)| Op::Call(i, j, k)),
    ]
}

fn config_strategy() -> impl Strategy<Value = PTAConfig> {
    prop_oneof![
        Just(PTAConfig::default().context(ContextStrategy::Insensitive)),
        (1..3usize).prop_map(|k| PTAConfig::default().context(ContextStrategy::CallSite(k))),
        (1..3usize).prop_map(|k| PTAConfig::default().context(ContextStrategy::Object(k))),
        (1..3usize).prop_map(|k| PTAConfig::default().context(ContextStrategy::Type(k))),
    ]
}

type Snapshot = Vec<Vec<CsObjId>>;

fn snapshot(solver: &Solver<'_>) -> Snapshot {
    solver
        .cs_manager()
        .pointers()
        .map(|(_, _, pts)| pts.iter().collect())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_points_to_sets_grow_monotonically(
        ops in prop::collection::vec(op_strategy(), 1..30),
        config in config_strategy(),
    ) {
        let generated = generated_program(&ops);
        let mut solver = Solver::new(&generated.program, selector_for(&config));

        let mut previous: Snapshot = Vec::new();
        let mut reachable = 0;
        let mut edges = 0;
        while solver.step() {
            let current = snapshot(&solver);
            prop_assert!(current.len() >= previous.len());
            for (before, after) in previous.iter().zip(current.iter()) {
                prop_assert!(before.iter().all(|o| after.contains(o)));
            }
            previous = current;

            let stats = solver.stats();
            prop_assert!(stats.reachable_methods >= reachable);
            prop_assert!(stats.call_edges >= edges);
            reachable = stats.reachable_methods;
            edges = stats.call_edges;
        }
        prop_assert_eq!(solver.pending_entries(), 0);
    }

    #[test]
    fn prop_copies_are_sound(
        ops in prop::collection::vec(op_strategy(), 1..30),
        config in config_strategy(),
    ) {
        let generated = generated_program(&ops);
        let result = PointerAnalysis::run(&generated.program, &config).unwrap();

        for op in &ops {
            if let Op::Copy(i, j) = *op {
                let dst = result.points_to_of_var(generated.vars[i % GEN_VARS]);
                let src = result.points_to_of_var(generated.vars[j % GEN_VARS]);
                prop_assert!(src.iter().all(|o| dst.contains(o)));
            }
        }
    }

    #[test]
    fn prop_runs_are_deterministic(
        ops in prop::collection::vec(op_strategy(), 1..30),
        config in config_strategy(),
    ) {
        let generated = generated_program(&ops);
        let a = PointerAnalysis::run(&generated.program, &config).unwrap();
        let b = PointerAnalysis::run(&generated.program, &config).unwrap();

        for &var in &generated.vars {
            prop_assert_eq!(a.points_to_of_var(var), b.points_to_of_var(var));
        }
        prop_assert_eq!(a.stats().pfg_edges, b.stats().pfg_edges);
        prop_assert_eq!(a.call_graph().num_edges(), b.call_graph().num_edges());
    }

    #[test]
    fn prop_pfg_edge_insertion_idempotent(
        pairs in prop::collection::vec((0..20u32, 0..20u32), 0..60),
    ) {
        let mut pfg = PointerFlowGraph::new();
        let mut distinct = std::collections::BTreeSet::new();
        for &(a, b) in &pairs {
            let inserted = pfg.add_edge(PointerId(a), PointerId(b));
            prop_assert_eq!(inserted, distinct.insert((a, b)));
        }
        for &(a, b) in &pairs {
            prop_assert!(!pfg.add_edge(PointerId(a), PointerId(b)));
        }
        prop_assert_eq!(pfg.num_edges(), distinct.len());
    }
}
