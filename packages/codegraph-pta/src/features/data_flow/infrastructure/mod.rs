//! Dataflow infrastructure
//!
//! - **WorklistSolver**: intraprocedural forward/backward solver
//! - **Icfg**: interprocedural CFG over the reachable methods
//! - **InterSolver**: interprocedural worklist solver with external requeue

pub mod icfg;
pub mod inter_solver;
pub mod intra_solver;

pub use icfg::{Icfg, IcfgEdge, IcfgEdgeKind};
pub use inter_solver::{InterDataflowAnalysis, InterSolver, InterSolverContext, InterSolverStats};
pub use intra_solver::{DataflowAnalysis, WorklistSolver};
