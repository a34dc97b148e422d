//! # Call Graph Module
//!
//! Call graph structure and call-site resolution shared by the points-to
//! solver (on-the-fly, context-sensitive) and the CHA builder
//! (context-insensitive, hierarchy only).
//!
//! ## Usage
//! ```text
//! use codegraph_pta::features::call_graph::ChaCallGraphBuilder;
//!
//! let cg = ChaCallGraphBuilder::new(&program).build();
//! for edge in cg.edges() {
//!     println!("{} -> {}", edge.call_site, edge.callee);
//! }
//! ```

pub mod domain;
pub mod infrastructure;

// Re-exports for public API
pub use crate::shared::models::CallKind;
pub use domain::{CallGraph, Edge};
pub use infrastructure::{CallResolver, ChaCallGraphBuilder};
