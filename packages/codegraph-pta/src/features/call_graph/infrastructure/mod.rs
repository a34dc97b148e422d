//! Call graph infrastructure
//!
//! - `call_resolver`: dispatch and CHA target resolution
//! - `cha_builder`: whole-program CHA call graph

pub mod call_resolver;
pub mod cha_builder;

pub use call_resolver::CallResolver;
pub use cha_builder::ChaCallGraphBuilder;
