//! Call graph
//!
//! Generic over the call-site and method representation so the same structure
//! serves the context-insensitive CHA graph (`StmtRef` → `MethodId`) and the
//! context-sensitive on-the-fly graph (`CsCallSite` → `CsMethod`).
//!
//! Monotonic: methods and edges are only ever added.

use crate::shared::models::CallKind;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Call edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<CS, M> {
    pub kind: CallKind,
    pub call_site: CS,
    pub callee: M,
}

impl<CS, M> Edge<CS, M> {
    pub fn new(kind: CallKind, call_site: CS, callee: M) -> Self {
        Self {
            kind,
            call_site,
            callee,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallGraph<CS, M> {
    entry_methods: Vec<M>,
    /// Reachable methods in discovery order
    reachable: Vec<M>,
    reachable_set: FxHashSet<M>,
    edges: Vec<Edge<CS, M>>,
    edge_set: FxHashSet<(CS, M)>,
    callees: FxHashMap<CS, Vec<M>>,
    callers: FxHashMap<M, Vec<CS>>,
}

impl<CS, M> Default for CallGraph<CS, M> {
    fn default() -> Self {
        Self {
            entry_methods: Vec::new(),
            reachable: Vec::new(),
            reachable_set: FxHashSet::default(),
            edges: Vec::new(),
            edge_set: FxHashSet::default(),
            callees: FxHashMap::default(),
            callers: FxHashMap::default(),
        }
    }
}

impl<CS, M> CallGraph<CS, M>
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry method. Reachability is recorded separately.
    pub fn add_entry_method(&mut self, method: M) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    pub fn entry_methods(&self) -> &[M] {
        &self.entry_methods
    }

    /// Returns true if the method was not reachable before
    pub fn add_reachable_method(&mut self, method: M) -> bool {
        if self.reachable_set.insert(method) {
            self.reachable.push(method);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, method: &M) -> bool {
        self.reachable_set.contains(method)
    }

    /// Reachable methods in discovery order
    pub fn reachable_methods(&self) -> &[M] {
        &self.reachable
    }

    /// Returns true if the (call site, callee) pair is new
    pub fn add_edge(&mut self, edge: Edge<CS, M>) -> bool {
        if !self.edge_set.insert((edge.call_site, edge.callee)) {
            return false;
        }
        self.callees
            .entry(edge.call_site)
            .or_default()
            .push(edge.callee);
        self.callers
            .entry(edge.callee)
            .or_default()
            .push(edge.call_site);
        self.edges.push(edge);
        true
    }

    pub fn has_edge(&self, call_site: CS, callee: M) -> bool {
        self.edge_set.contains(&(call_site, callee))
    }

    pub fn edges(&self) -> &[Edge<CS, M>] {
        &self.edges
    }

    pub fn callees_of(&self, call_site: &CS) -> &[M] {
        self.callees.get(call_site).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn callers_of(&self, callee: &M) -> &[CS] {
        self.callers.get(callee).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_reachable_methods(&self) -> usize {
        self.reachable.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_idempotent() {
        let mut cg: CallGraph<u32, u32> = CallGraph::new();
        assert!(cg.add_edge(Edge::new(CallKind::Static, 1, 10)));
        assert!(!cg.add_edge(Edge::new(CallKind::Static, 1, 10)));
        assert!(cg.add_edge(Edge::new(CallKind::Virtual, 1, 11)));

        assert_eq!(cg.num_edges(), 2);
        assert_eq!(cg.callees_of(&1), &[10, 11]);
        assert_eq!(cg.callers_of(&10), &[1]);
    }

    #[test]
    fn test_reachable_in_discovery_order() {
        let mut cg: CallGraph<u32, u32> = CallGraph::new();
        cg.add_entry_method(0);
        assert!(cg.add_reachable_method(0));
        assert!(cg.add_reachable_method(5));
        assert!(!cg.add_reachable_method(0));

        assert_eq!(cg.reachable_methods(), &[0, 5]);
        assert_eq!(cg.entry_methods(), &[0]);
        assert!(cg.contains(&5));
    }

    #[test]
    fn test_unknown_queries_are_empty() {
        let cg: CallGraph<u32, u32> = CallGraph::new();
        assert!(cg.callees_of(&3).is_empty());
        assert!(cg.callers_of(&3).is_empty());
        assert!(!cg.has_edge(1, 2));
    }
}
