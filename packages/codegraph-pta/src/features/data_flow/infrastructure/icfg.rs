//! Interprocedural control flow graph
//!
//! Union of the CFGs of all reachable methods, stitched at call sites:
//! - call node → callee entry (Call)
//! - callee exit → each return site of the call node (Return)
//! - CFG edges leaving a call node become CallToReturn edges
//! - all other CFG edges stay Normal

use crate::features::call_graph::domain::CallGraph;
use crate::shared::models::{Cfg, MethodId, Node, Program, StmtRef};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IcfgEdgeKind {
    Normal,
    CallToReturn,
    Call { call_site: StmtRef, callee: MethodId },
    Return { call_site: StmtRef, callee: MethodId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IcfgEdge {
    pub source: Node,
    pub target: Node,
    pub kind: IcfgEdgeKind,
}

#[derive(Debug, Clone)]
pub struct Icfg {
    entry_methods: Vec<MethodId>,
    methods: Vec<MethodId>,
    cfgs: FxHashMap<MethodId, Cfg>,
    call_nodes: FxHashSet<Node>,
    graph: DiGraph<Node, IcfgEdgeKind>,
    node_map: FxHashMap<Node, NodeIndex>,
}

impl Icfg {
    /// Build over the methods reachable in `call_graph`
    pub fn build(program: &Program, call_graph: &CallGraph<StmtRef, MethodId>) -> Self {
        let mut icfg = Icfg {
            entry_methods: call_graph.entry_methods().to_vec(),
            methods: call_graph.reachable_methods().to_vec(),
            cfgs: FxHashMap::default(),
            call_nodes: FxHashSet::default(),
            graph: DiGraph::new(),
            node_map: FxHashMap::default(),
        };

        for &method in &icfg.methods {
            let cfg = Cfg::build(program, method);
            for node in cfg.nodes() {
                let idx = icfg.graph.add_node(node);
                icfg.node_map.insert(node, idx);
            }
            for (stmt_ref, _) in program.call_sites_in(method) {
                icfg.call_nodes.insert(Node::from(stmt_ref));
            }
            icfg.cfgs.insert(method, cfg);
        }

        // Intraprocedural edges
        let methods = icfg.methods.clone();
        for &method in &methods {
            let Some(cfg) = icfg.cfgs.get(&method) else {
                continue;
            };
            let mut edges = Vec::new();
            for node in cfg.nodes() {
                let kind = if icfg.call_nodes.contains(&node) {
                    IcfgEdgeKind::CallToReturn
                } else {
                    IcfgEdgeKind::Normal
                };
                for succ in cfg.succs_of(node) {
                    edges.push((node, succ, kind));
                }
            }
            for (src, dst, kind) in edges {
                icfg.add_edge(src, dst, kind);
            }
        }

        // Call and return edges
        for &method in &methods {
            let Some(cfg) = icfg.cfgs.get(&method) else {
                continue;
            };
            let mut edges = Vec::new();
            for (call_site, _) in program.call_sites_in(method) {
                let call_node = Node::from(call_site);
                let return_sites = cfg.succs_of(call_node);
                for &callee in call_graph.callees_of(&call_site) {
                    edges.push((
                        call_node,
                        Node::entry(callee),
                        IcfgEdgeKind::Call { call_site, callee },
                    ));
                    for &ret in &return_sites {
                        edges.push((
                            Node::exit(callee),
                            ret,
                            IcfgEdgeKind::Return { call_site, callee },
                        ));
                    }
                }
            }
            for (src, dst, kind) in edges {
                icfg.add_edge(src, dst, kind);
            }
        }

        debug!(
            "ICFG built: {} methods, {} nodes, {} edges",
            icfg.methods.len(),
            icfg.graph.node_count(),
            icfg.graph.edge_count()
        );
        icfg
    }

    fn add_edge(&mut self, from: Node, to: Node, kind: IcfgEdgeKind) {
        if let (Some(&a), Some(&b)) = (self.node_map.get(&from), self.node_map.get(&to)) {
            self.graph.add_edge(a, b, kind);
        }
    }

    pub fn entry_methods(&self) -> &[MethodId] {
        &self.entry_methods
    }

    /// Methods in the ICFG, in call graph discovery order
    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }

    pub fn cfg(&self, method: MethodId) -> Option<&Cfg> {
        self.cfgs.get(&method)
    }

    pub fn entry_of(&self, method: MethodId) -> Node {
        Node::entry(method)
    }

    pub fn exit_of(&self, method: MethodId) -> Node {
        Node::exit(method)
    }

    /// All nodes, method by method
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.node_map.contains_key(&node)
    }

    pub fn is_call_node(&self, node: Node) -> bool {
        self.call_nodes.contains(&node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn in_edges_of(&self, node: Node) -> Vec<IcfgEdge> {
        self.edges_of(node, Direction::Incoming)
    }

    pub fn out_edges_of(&self, node: Node) -> Vec<IcfgEdge> {
        self.edges_of(node, Direction::Outgoing)
    }

    /// Distinct successors
    pub fn succs_of(&self, node: Node) -> Vec<Node> {
        let mut succs: Vec<Node> = Vec::new();
        for edge in self.out_edges_of(node) {
            if !succs.contains(&edge.target) {
                succs.push(edge.target);
            }
        }
        succs
    }

    fn edges_of(&self, node: Node, dir: Direction) -> Vec<IcfgEdge> {
        let Some(&idx) = self.node_map.get(&node) else {
            return Vec::new();
        };
        let mut edges: Vec<IcfgEdge> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| IcfgEdge {
                source: self.graph[e.source()],
                target: self.graph[e.target()],
                kind: *e.weight(),
            })
            .collect();
        edges.reverse();
        edges
    }
}
