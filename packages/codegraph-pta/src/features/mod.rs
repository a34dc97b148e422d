//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure analysis data (no solver logic)
//! - infrastructure/ - Solvers, graphs, resolvers
//! - application/ - Entry points and result views
//!
//! Dependency order: call_graph → points_to → data_flow

pub mod call_graph;

pub mod points_to;

pub mod data_flow;
