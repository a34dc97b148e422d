//! Intraprocedural worklist solver
//!
//! Forward analyses meet the OUT facts of predecessors into IN and transfer
//! IN → OUT; backward analyses meet the IN facts of successors into OUT and
//! transfer OUT → IN. Facts only grow in the lattice, so the worklist drains.

use crate::features::data_flow::domain::DataflowResult;
use crate::shared::models::{Cfg, Node};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::trace;

/// Monotone intraprocedural dataflow analysis
pub trait DataflowAnalysis {
    type Fact: Clone + PartialEq;

    fn is_forward(&self) -> bool;

    /// Fact at method entry (forward) or exit (backward)
    fn new_boundary_fact(&self, cfg: &Cfg) -> Self::Fact;

    fn new_initial_fact(&self) -> Self::Fact;

    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact);

    /// Compute `output` from `input` at a statement node, true on change
    fn transfer_node(&self, node: Node, input: &Self::Fact, output: &mut Self::Fact) -> bool;
}

pub struct WorklistSolver;

impl WorklistSolver {
    pub fn solve<A: DataflowAnalysis>(analysis: &A, cfg: &Cfg) -> DataflowResult<Node, A::Fact> {
        let forward = analysis.is_forward();
        let boundary = if forward { cfg.entry() } else { cfg.exit() };

        // "input" is IN for forward analyses and OUT for backward ones
        let mut input: FxHashMap<Node, A::Fact> = FxHashMap::default();
        let mut output: FxHashMap<Node, A::Fact> = FxHashMap::default();
        for node in cfg.nodes() {
            input.insert(node, analysis.new_initial_fact());
            output.insert(node, analysis.new_initial_fact());
        }
        let boundary_fact = analysis.new_boundary_fact(cfg);
        input.insert(boundary, boundary_fact.clone());
        output.insert(boundary, boundary_fact);

        let mut nodes: Vec<Node> = cfg.nodes().filter(|n| *n != boundary).collect();
        if !forward {
            nodes.reverse();
        }
        let mut queued: FxHashSet<Node> = nodes.iter().copied().collect();
        let mut worklist: VecDeque<Node> = nodes.into();

        let mut iterations = 0usize;
        while let Some(node) = worklist.pop_front() {
            queued.remove(&node);
            iterations += 1;

            let (sources, targets) = if forward {
                (cfg.preds_of(node), cfg.succs_of(node))
            } else {
                (cfg.succs_of(node), cfg.preds_of(node))
            };

            let mut in_fact = input
                .remove(&node)
                .unwrap_or_else(|| analysis.new_initial_fact());
            for source in sources {
                if let Some(fact) = output.get(&source) {
                    analysis.meet_into(fact, &mut in_fact);
                }
            }

            let mut out_fact = output
                .remove(&node)
                .unwrap_or_else(|| analysis.new_initial_fact());
            let changed = transfer(analysis, node, &in_fact, &mut out_fact);
            input.insert(node, in_fact);
            output.insert(node, out_fact);

            if changed {
                for target in targets {
                    if target != boundary && queued.insert(target) {
                        worklist.push_back(target);
                    }
                }
            }
        }
        trace!(
            "Intraprocedural fixpoint for {}: {} node visits",
            cfg.method(),
            iterations
        );

        if forward {
            DataflowResult::from_facts(input, output)
        } else {
            DataflowResult::from_facts(output, input)
        }
    }
}

/// Entry and exit carry no statement and pass facts through
fn transfer<A: DataflowAnalysis>(
    analysis: &A,
    node: Node,
    input: &A::Fact,
    output: &mut A::Fact,
) -> bool {
    if node.stmt_index().is_some() {
        analysis.transfer_node(node, input, output)
    } else if output != input {
        *output = input.clone();
        true
    } else {
        false
    }
}
