//! CHA call graph construction
//!
//! Worklist over methods starting from the entry methods. Each method is
//! processed once; every CHA target of every call site becomes an edge and is
//! queued.

use super::call_resolver::CallResolver;
use crate::features::call_graph::domain::{CallGraph, Edge};
use crate::shared::models::{MethodId, Program, StmtRef};
use std::collections::VecDeque;
use tracing::{debug, info};

pub struct ChaCallGraphBuilder<'p> {
    program: &'p Program,
}

impl<'p> ChaCallGraphBuilder<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    pub fn build(&self) -> CallGraph<StmtRef, MethodId> {
        let resolver = CallResolver::new(self.program);
        let mut call_graph = CallGraph::new();
        let mut queue: VecDeque<MethodId> = VecDeque::new();

        for &entry in self.program.entry_methods() {
            call_graph.add_entry_method(entry);
            queue.push_back(entry);
        }

        while let Some(method) = queue.pop_front() {
            if !call_graph.add_reachable_method(method) {
                continue;
            }
            for (call_site, invoke) in self.program.call_sites_in(method) {
                let targets = resolver.resolve_cha(invoke);
                if targets.is_empty() {
                    debug!(%call_site, "CHA: unresolved call");
                }
                for callee in targets {
                    call_graph.add_edge(Edge::new(invoke.kind, call_site, callee));
                    queue.push_back(callee);
                }
            }
        }

        info!(
            reachable = call_graph.num_reachable_methods(),
            edges = call_graph.num_edges(),
            "CHA call graph built"
        );
        call_graph
    }
}
