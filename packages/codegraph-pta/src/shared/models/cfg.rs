//! Statement-level control flow graph
//!
//! One node per statement plus synthetic entry and exit nodes. Every
//! statement stays in the graph, reachable or not; dead code detection
//! relies on that.
//!
//! Edge rules:
//! - Entry → first statement (or exit when the body is empty)
//! - `goto` → target
//! - `if` → target (IfTrue) and next statement (IfFalse)
//! - `switch` → one SwitchCase edge per case plus SwitchDefault
//! - `return` → exit
//! - anything else falls through to the next statement, the last one to exit

use super::ir::{MethodId, Program, Stmt, StmtRef};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position inside a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Point {
    Entry,
    Stmt(u32),
    Exit,
}

/// CFG/ICFG node: a point in a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub method: MethodId,
    pub point: Point,
}

impl Node {
    #[inline]
    pub fn entry(method: MethodId) -> Self {
        Self {
            method,
            point: Point::Entry,
        }
    }

    #[inline]
    pub fn exit(method: MethodId) -> Self {
        Self {
            method,
            point: Point::Exit,
        }
    }

    #[inline]
    pub fn stmt(method: MethodId, index: usize) -> Self {
        Self {
            method,
            point: Point::Stmt(index as u32),
        }
    }

    /// Statement index, `None` for entry/exit
    #[inline]
    pub fn stmt_index(&self) -> Option<usize> {
        match self.point {
            Point::Stmt(index) => Some(index as usize),
            _ => None,
        }
    }

    #[inline]
    pub fn stmt_ref(&self) -> Option<StmtRef> {
        self.stmt_index().map(|index| StmtRef::new(self.method, index))
    }
}

impl From<StmtRef> for Node {
    fn from(stmt: StmtRef) -> Self {
        Node::stmt(stmt.method, stmt.index as usize)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.point {
            Point::Entry => write!(f, "{}:entry", self.method),
            Point::Stmt(index) => write!(f, "{}:{}", self.method, index),
            Point::Exit => write!(f, "{}:exit", self.method),
        }
    }
}

/// CFG edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CfgEdgeKind {
    /// Entry node to first statement
    Entry,
    FallThrough,
    Goto,
    IfTrue,
    IfFalse,
    SwitchCase(i32),
    SwitchDefault,
    /// `return` to exit
    Return,
}

impl CfgEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfgEdgeKind::Entry => "ENTRY",
            CfgEdgeKind::FallThrough => "FALL_THROUGH",
            CfgEdgeKind::Goto => "GOTO",
            CfgEdgeKind::IfTrue => "IF_TRUE",
            CfgEdgeKind::IfFalse => "IF_FALSE",
            CfgEdgeKind::SwitchCase(_) => "SWITCH_CASE",
            CfgEdgeKind::SwitchDefault => "SWITCH_DEFAULT",
            CfgEdgeKind::Return => "RETURN",
        }
    }
}

/// Control flow graph of one method
#[derive(Debug, Clone)]
pub struct Cfg {
    method: MethodId,
    /// petgraph directed graph
    graph: DiGraph<Node, CfgEdgeKind>,
    /// Node to petgraph NodeIndex mapping
    node_map: FxHashMap<Node, NodeIndex>,
}

impl Cfg {
    /// Build the CFG of `method`
    pub fn build(program: &Program, method: MethodId) -> Self {
        let stmts = &program.method(method).stmts;
        let mut cfg = Cfg {
            method,
            graph: DiGraph::with_capacity(stmts.len() + 2, stmts.len() + 2),
            node_map: FxHashMap::default(),
        };

        let entry = Node::entry(method);
        let exit = Node::exit(method);
        cfg.add_node(entry);
        for index in 0..stmts.len() {
            cfg.add_node(Node::stmt(method, index));
        }
        cfg.add_node(exit);

        // Past-the-end targets fall into exit
        let at = |index: usize| {
            if index < stmts.len() {
                Node::stmt(method, index)
            } else {
                exit
            }
        };

        cfg.add_edge(entry, at(0), CfgEdgeKind::Entry);
        for (index, stmt) in stmts.iter().enumerate() {
            let node = Node::stmt(method, index);
            match stmt {
                Stmt::Goto { target } => cfg.add_edge(node, at(*target), CfgEdgeKind::Goto),
                Stmt::If { target, .. } => {
                    cfg.add_edge(node, at(*target), CfgEdgeKind::IfTrue);
                    cfg.add_edge(node, at(index + 1), CfgEdgeKind::IfFalse);
                }
                Stmt::Switch { cases, default, .. } => {
                    for (value, target) in cases {
                        cfg.add_edge(node, at(*target), CfgEdgeKind::SwitchCase(*value));
                    }
                    cfg.add_edge(node, at(*default), CfgEdgeKind::SwitchDefault);
                }
                Stmt::Return { .. } => cfg.add_edge(node, exit, CfgEdgeKind::Return),
                _ => cfg.add_edge(node, at(index + 1), CfgEdgeKind::FallThrough),
            }
        }

        cfg
    }

    fn add_node(&mut self, node: Node) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.node_map.insert(node, idx);
        idx
    }

    fn add_edge(&mut self, from: Node, to: Node, kind: CfgEdgeKind) {
        if let (Some(&a), Some(&b)) = (self.node_map.get(&from), self.node_map.get(&to)) {
            self.graph.add_edge(a, b, kind);
        }
    }

    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn entry(&self) -> Node {
        Node::entry(self.method)
    }

    pub fn exit(&self) -> Node {
        Node::exit(self.method)
    }

    /// All nodes: entry, statements in order, exit
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.node_map.contains_key(&node)
    }

    /// Outgoing edges as `(kind, target)`, in insertion order
    pub fn out_edges_of(&self, node: Node) -> Vec<(CfgEdgeKind, Node)> {
        self.edges_of(node, Direction::Outgoing)
    }

    /// Incoming edges as `(kind, source)`
    pub fn in_edges_of(&self, node: Node) -> Vec<(CfgEdgeKind, Node)> {
        self.edges_of(node, Direction::Incoming)
    }

    fn edges_of(&self, node: Node, dir: Direction) -> Vec<(CfgEdgeKind, Node)> {
        let Some(&idx) = self.node_map.get(&node) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (*e.weight(), self.graph[other])
            })
            .collect();
        // petgraph yields newest first
        edges.reverse();
        edges
    }

    /// Distinct successors
    pub fn succs_of(&self, node: Node) -> Vec<Node> {
        dedup(self.out_edges_of(node).into_iter().map(|(_, n)| n))
    }

    /// Distinct predecessors
    pub fn preds_of(&self, node: Node) -> Vec<Node> {
        dedup(self.in_edges_of(node).into_iter().map(|(_, n)| n))
    }
}

fn dedup(nodes: impl Iterator<Item = Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    for node in nodes {
        if !out.contains(&node) {
            out.push(node);
        }
    }
    out
}
