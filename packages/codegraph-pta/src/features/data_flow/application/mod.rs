//! Dataflow analyses

pub mod constant_propagation;
pub mod dead_code;
pub mod inter_constant_propagation;
pub mod live_variables;

pub use constant_propagation::{evaluate, ConstantPropagation};
pub use dead_code::DeadCodeDetection;
pub use inter_constant_propagation::{index_may_alias, InterConstantPropagation};
pub use live_variables::LiveVariableAnalysis;
