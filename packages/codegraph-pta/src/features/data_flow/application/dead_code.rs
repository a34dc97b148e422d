//! Dead code detection
//!
//! Two kinds of dead statements:
//! - **unreachable**: not reached from the method entry when `if` and
//!   `switch` branches are pruned using constant propagation
//! - **dead assignment**: side-effect-free assignment whose target is not
//!   live afterwards
//!
//! Side-effect-free means a copy or an `int` expression other than `/` and
//! `%`. Allocations, field and array accesses and calls are always kept.

use super::constant_propagation::{evaluate, ConstantPropagation};
use super::live_variables::LiveVariableAnalysis;
use crate::features::data_flow::domain::{CPFact, DataflowResult, SetFact, Value};
use crate::shared::models::{Cfg, CfgEdgeKind, Exp, MethodId, Node, Program, Stmt, VarId};
use rustc_hash::FxHashSet;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

pub struct DeadCodeDetection<'p> {
    program: &'p Program,
}

impl<'p> DeadCodeDetection<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    /// Indices of dead statements of `method`, sorted
    pub fn analyze(&self, method: MethodId) -> BTreeSet<usize> {
        let cfg = Cfg::build(self.program, method);
        let constants = ConstantPropagation::new(self.program).analyze(method);
        let live_vars = LiveVariableAnalysis::new(self.program).analyze(method);
        self.analyze_with(&cfg, &constants, &live_vars)
    }

    pub fn analyze_with(
        &self,
        cfg: &Cfg,
        constants: &DataflowResult<Node, CPFact>,
        live_vars: &DataflowResult<Node, SetFact<VarId>>,
    ) -> BTreeSet<usize> {
        let empty = CPFact::new();
        let mut reached: FxHashSet<Node> = FxHashSet::default();
        let mut kept: FxHashSet<Node> = FxHashSet::default();
        let mut queue: VecDeque<Node> = VecDeque::from([cfg.entry()]);

        while let Some(node) = queue.pop_front() {
            if !reached.insert(node) {
                continue;
            }
            let Some(stmt_ref) = node.stmt_ref() else {
                queue.extend(cfg.succs_of(node));
                continue;
            };
            let stmt = self.program.stmt(stmt_ref);
            let facts = constants.get_in_fact(node).unwrap_or(&empty);

            match stmt {
                Stmt::If { condition, .. } => {
                    kept.insert(node);
                    queue.extend(taken_if_targets(cfg, node, condition, facts));
                }
                Stmt::Switch { var, cases, .. } => {
                    kept.insert(node);
                    queue.extend(taken_switch_targets(cfg, node, cases, facts.get(*var)));
                }
                _ => {
                    if !self.is_dead_assignment(stmt, live_vars.get_out_fact(node)) {
                        kept.insert(node);
                    }
                    queue.extend(cfg.succs_of(node));
                }
            }
        }

        let dead: BTreeSet<usize> = cfg
            .nodes()
            .filter(|n| !kept.contains(n))
            .filter_map(|n| n.stmt_index())
            .collect();
        debug!("Dead code in {}: {} statements", cfg.method(), dead.len());
        dead
    }

    fn is_dead_assignment(&self, stmt: &Stmt, live_out: Option<&SetFact<VarId>>) -> bool {
        let lhs = match stmt {
            Stmt::Copy { lhs, .. } => *lhs,
            Stmt::Assign { lhs, rhs } => {
                if let Exp::Binary { op, .. } = rhs {
                    if op.may_throw() {
                        return false;
                    }
                }
                *lhs
            }
            _ => return false,
        };
        !live_out.is_some_and(|live| live.contains(&lhs))
    }
}

fn taken_if_targets(cfg: &Cfg, node: Node, condition: &Exp, facts: &CPFact) -> Vec<Node> {
    let edges = cfg.out_edges_of(node);
    match evaluate(condition, facts) {
        Value::Constant(c) => {
            let wanted = if c != 0 {
                CfgEdgeKind::IfTrue
            } else {
                CfgEdgeKind::IfFalse
            };
            edges
                .into_iter()
                .filter(|(kind, _)| *kind == wanted)
                .map(|(_, target)| target)
                .collect()
        }
        _ => edges.into_iter().map(|(_, target)| target).collect(),
    }
}

fn taken_switch_targets(cfg: &Cfg, node: Node, cases: &[(i32, usize)], value: Value) -> Vec<Node> {
    let edges = cfg.out_edges_of(node);
    let Value::Constant(c) = value else {
        return edges.into_iter().map(|(_, target)| target).collect();
    };
    let matched = cases.iter().any(|(case, _)| *case == c);
    edges
        .into_iter()
        .filter(|(kind, _)| match kind {
            CfgEdgeKind::SwitchCase(case) => *case == c,
            CfgEdgeKind::SwitchDefault => !matched,
            _ => false,
        })
        .map(|(_, target)| target)
        .take(1)
        .collect()
}
