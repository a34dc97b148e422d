//! # Points-to Analysis Module
//!
//! Whole-program, inclusion-based pointer analysis that builds the call graph
//! on the fly:
//! - **Pointer flow graph**: subset edges between variables, fields and array slots
//! - **On-the-fly call graph**: virtual calls dispatched on discovered receiver objects
//! - **Context sensitivity**: pluggable selectors (call-site, object, type)
//! - **Allocation-site heap abstraction** with optional heap contexts
//!
//! ## Usage
//! ```text
//! use codegraph_pta::{PointerAnalysis, PTAConfig};
//!
//! let result = PointerAnalysis::run(&program, &PTAConfig::default())?;
//! let objs = result.points_to_of_var(x);
//! assert!(result.may_alias(x, y));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for public API
pub use application::{PointerAnalysis, PointerAnalysisResult};
pub use domain::{
    ContextElem, ContextId, CsCallSite, CsMethod, CsObj, CsObjId, HeapModel, Obj, ObjId, Pointer,
    PointerId, PointsToSet,
};
pub use infrastructure::{ContextSelector, Solver, SolverState, SolverStats};
