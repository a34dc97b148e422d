//! Pointer Flow Graph
//!
//! Edge a → b means pt(a) ⊆ pt(b). Edges are inserted idempotently and never
//! removed. Scheduling pt(src) along a new edge is the solver's job.

use crate::features::points_to::domain::PointerId;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

#[derive(Debug, Clone, Default)]
pub struct PointerFlowGraph {
    graph: DiGraphMap<PointerId, ()>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the edge already exists
    pub fn add_edge(&mut self, src: PointerId, dst: PointerId) -> bool {
        if self.graph.contains_edge(src, dst) {
            return false;
        }
        self.graph.add_edge(src, dst, ());
        true
    }

    pub fn has_edge(&self, src: PointerId, dst: PointerId) -> bool {
        self.graph.contains_edge(src, dst)
    }

    /// Successors in insertion order
    pub fn successors_of(&self, pointer: PointerId) -> impl Iterator<Item = PointerId> + '_ {
        self.graph.neighbors_directed(pointer, Direction::Outgoing)
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_idempotent() {
        let mut pfg = PointerFlowGraph::new();
        assert!(pfg.add_edge(PointerId(0), PointerId(1)));
        assert!(!pfg.add_edge(PointerId(0), PointerId(1)));
        assert!(pfg.add_edge(PointerId(0), PointerId(2)));
        assert_eq!(pfg.num_edges(), 2);
        assert_eq!(
            pfg.successors_of(PointerId(0)).collect::<Vec<_>>(),
            vec![PointerId(1), PointerId(2)]
        );
    }

    #[test]
    fn test_successors_of_unknown_pointer() {
        let pfg = PointerFlowGraph::new();
        assert_eq!(pfg.successors_of(PointerId(7)).count(), 0);
    }

    #[test]
    fn test_self_loop() {
        let mut pfg = PointerFlowGraph::new();
        assert!(pfg.add_edge(PointerId(3), PointerId(3)));
        assert!(pfg.has_edge(PointerId(3), PointerId(3)));
        assert!(!pfg.has_edge(PointerId(3), PointerId(4)));
    }
}
