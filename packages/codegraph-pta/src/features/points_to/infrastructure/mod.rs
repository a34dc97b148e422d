//! Infrastructure layer for Points-to Analysis
//!
//! - **SparseBitmap**: sorted-vector object sets
//! - **CsManager**: pointer / cs-object interning and points-to storage
//! - **PointerFlowGraph**: subset edges between pointers
//! - **ContextSelector**: insensitive, k-call-site, k-object, k-type
//! - **Solver**: on-the-fly worklist fixpoint

pub mod context_selector;
pub mod cs_manager;
pub mod pointer_flow_graph;
pub mod solver;
pub mod sparse_bitmap;
pub mod worklist;

pub use context_selector::{
    selector_for, ContextInsensitiveSelector, ContextSelector, KCallSiteSelector, KObjectSelector,
    KTypeSelector, ReceiverInfo,
};
pub use cs_manager::CsManager;
pub use pointer_flow_graph::PointerFlowGraph;
pub use solver::{Solver, SolverOutput, SolverState, SolverStats};
pub use sparse_bitmap::SparseBitmap;
pub use worklist::WorkList;
