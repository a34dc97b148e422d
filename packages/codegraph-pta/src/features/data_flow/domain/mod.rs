//! Dataflow domain: facts, results, constant lattice

pub mod fact;
pub mod value;

pub use fact::{DataflowResult, SetFact};
pub use value::{CPFact, Value};
