//! Application layer for Points-to Analysis
//!
//! - **PointerAnalysis**: configure and run the solver
//! - **PointerAnalysisResult**: read-only queries over the fixpoint

pub mod analyzer;
pub mod result;

pub use analyzer::PointerAnalysis;
pub use result::PointerAnalysisResult;
