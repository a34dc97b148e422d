//! # Dataflow Module
//!
//! Monotone dataflow framework and the analyses built on it:
//! - **Intraprocedural**: constant propagation, live variables, dead code
//! - **Interprocedural**: ICFG worklist solver and heap-aware constant
//!   propagation that reads a finished points-to result as an alias oracle
//!
//! ## Usage
//! ```text
//! use codegraph_pta::{DataflowConfig, InterConstantPropagation, PointerAnalysis};
//!
//! let pta = PointerAnalysis::run(&program, &config)?;
//! let constants = InterConstantPropagation::new(&program, &pta, DataflowConfig::default()).analyze();
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    ConstantPropagation, DeadCodeDetection, InterConstantPropagation, LiveVariableAnalysis,
};
pub use domain::{CPFact, DataflowResult, SetFact, Value};
pub use infrastructure::{
    DataflowAnalysis, Icfg, IcfgEdgeKind, InterDataflowAnalysis, InterSolver, WorklistSolver,
};
