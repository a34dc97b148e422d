//! Interprocedural worklist solver over the ICFG
//!
//! Forward only. Every node starts with the initial fact, entry nodes of
//! entry methods with the boundary fact. A popped node meets the
//! edge-transferred OUT facts of its predecessors into IN, transfers, and
//! queues its successors when OUT changed. Transfer functions may read other
//! nodes' facts and requeue nodes through [`InterSolverContext`].

use super::icfg::{Icfg, IcfgEdge, IcfgEdgeKind};
use crate::features::data_flow::domain::DataflowResult;
use crate::shared::models::Node;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// Read access to the current facts plus a requeue channel
pub struct InterSolverContext<'a, F> {
    result: &'a DataflowResult<Node, F>,
    requeued: Vec<Node>,
}

impl<'a, F> InterSolverContext<'a, F> {
    /// IN fact of another node; `None` for the node being transferred
    pub fn in_fact(&self, node: Node) -> Option<&F> {
        self.result.get_in_fact(node)
    }

    /// OUT fact of another node; `None` for the node being transferred
    pub fn out_fact(&self, node: Node) -> Option<&F> {
        self.result.get_out_fact(node)
    }

    /// Schedule `node` for another visit
    pub fn requeue(&mut self, node: Node) {
        self.requeued.push(node);
    }
}

/// Monotone forward interprocedural analysis
pub trait InterDataflowAnalysis {
    type Fact: Clone + PartialEq;

    /// Fact at the entry node of an entry method
    fn new_boundary_fact(&self, entry: Node) -> Self::Fact;

    fn new_initial_fact(&self) -> Self::Fact;

    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact);

    fn transfer_call_node(
        &self,
        node: Node,
        input: &Self::Fact,
        output: &mut Self::Fact,
        ctx: &mut InterSolverContext<'_, Self::Fact>,
    ) -> bool;

    fn transfer_non_call_node(
        &self,
        node: Node,
        input: &Self::Fact,
        output: &mut Self::Fact,
        ctx: &mut InterSolverContext<'_, Self::Fact>,
    ) -> bool;

    fn transfer_normal_edge(&self, edge: &IcfgEdge, out: &Self::Fact) -> Self::Fact;

    fn transfer_call_to_return_edge(&self, edge: &IcfgEdge, out: &Self::Fact) -> Self::Fact;

    fn transfer_call_edge(&self, edge: &IcfgEdge, call_site_out: &Self::Fact) -> Self::Fact;

    fn transfer_return_edge(&self, edge: &IcfgEdge, return_out: &Self::Fact) -> Self::Fact;

    fn transfer_edge(&self, edge: &IcfgEdge, out: &Self::Fact) -> Self::Fact {
        match edge.kind {
            IcfgEdgeKind::Normal => self.transfer_normal_edge(edge, out),
            IcfgEdgeKind::CallToReturn => self.transfer_call_to_return_edge(edge, out),
            IcfgEdgeKind::Call { .. } => self.transfer_call_edge(edge, out),
            IcfgEdgeKind::Return { .. } => self.transfer_return_edge(edge, out),
        }
    }
}

/// Solver statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct InterSolverStats {
    pub node_visits: usize,
    pub requeues: usize,
}

pub struct InterSolver<'a, A: InterDataflowAnalysis> {
    analysis: &'a A,
    icfg: &'a Icfg,
    result: DataflowResult<Node, A::Fact>,
    worklist: VecDeque<Node>,
    queued: FxHashSet<Node>,
    stats: InterSolverStats,
}

impl<'a, A: InterDataflowAnalysis> InterSolver<'a, A> {
    pub fn new(analysis: &'a A, icfg: &'a Icfg) -> Self {
        Self {
            analysis,
            icfg,
            result: DataflowResult::new(),
            worklist: VecDeque::new(),
            queued: FxHashSet::default(),
            stats: InterSolverStats::default(),
        }
    }

    pub fn solve(mut self) -> (DataflowResult<Node, A::Fact>, InterSolverStats) {
        self.initialize();
        self.do_solve();
        debug!(
            "Interprocedural fixpoint: {} node visits, {} requeues",
            self.stats.node_visits, self.stats.requeues
        );
        (self.result, self.stats)
    }

    fn initialize(&mut self) {
        for node in self.icfg.nodes() {
            self.result
                .set_in_fact(node, self.analysis.new_initial_fact());
            self.result
                .set_out_fact(node, self.analysis.new_initial_fact());
        }
        for &method in self.icfg.entry_methods() {
            let entry = self.icfg.entry_of(method);
            if !self.icfg.contains(entry) {
                continue;
            }
            let boundary = self.analysis.new_boundary_fact(entry);
            self.result.set_in_fact(entry, boundary.clone());
            self.result.set_out_fact(entry, boundary);
        }
        let nodes: Vec<Node> = self.icfg.nodes().collect();
        for node in nodes {
            self.enqueue(node);
        }
    }

    fn enqueue(&mut self, node: Node) {
        if self.icfg.contains(node) && self.queued.insert(node) {
            self.worklist.push_back(node);
        }
    }

    fn do_solve(&mut self) {
        while let Some(node) = self.worklist.pop_front() {
            self.queued.remove(&node);
            self.stats.node_visits += 1;

            let mut in_fact = self
                .result
                .take_in_fact(node)
                .unwrap_or_else(|| self.analysis.new_initial_fact());
            for edge in self.icfg.in_edges_of(node) {
                if let Some(pred_out) = self.result.get_out_fact(edge.source) {
                    let transferred = self.analysis.transfer_edge(&edge, pred_out);
                    self.analysis.meet_into(&transferred, &mut in_fact);
                }
            }

            let mut out_fact = self
                .result
                .take_out_fact(node)
                .unwrap_or_else(|| self.analysis.new_initial_fact());
            let mut ctx = InterSolverContext {
                result: &self.result,
                requeued: Vec::new(),
            };
            let changed = if self.icfg.is_call_node(node) {
                self.analysis
                    .transfer_call_node(node, &in_fact, &mut out_fact, &mut ctx)
            } else {
                self.analysis
                    .transfer_non_call_node(node, &in_fact, &mut out_fact, &mut ctx)
            };
            let requeued = ctx.requeued;

            self.result.set_in_fact(node, in_fact);
            self.result.set_out_fact(node, out_fact);

            self.stats.requeues += requeued.len();
            for other in requeued {
                self.enqueue(other);
            }
            if changed {
                for succ in self.icfg.succs_of(node) {
                    self.enqueue(succ);
                }
            }
        }
    }
}
