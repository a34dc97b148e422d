//! High-Level Points-to Analyzer
//!
//! Entry point of the pointer analysis: validates the configuration, picks
//! the context selector, runs the solver to fixpoint and wraps the solver
//! state into a queryable [`PointerAnalysisResult`].
//!
//! # Usage
//! ```text
//! use codegraph_pta::{PointerAnalysis, PTAConfig, Preset};
//!
//! let config = PTAConfig::from_preset(Preset::Thorough);
//! let result = PointerAnalysis::run(&program, &config)?;
//! for method in result.reachable_methods() { ... }
//! ```

use super::result::PointerAnalysisResult;
use crate::config::PTAConfig;
use crate::errors::Result;
use crate::features::points_to::infrastructure::{selector_for, Solver};
use crate::shared::models::Program;
use tracing::info;

/// Whole-program pointer analysis
pub struct PointerAnalysis;

impl PointerAnalysis {
    /// Run to fixpoint with `config`
    pub fn run(program: &Program, config: &PTAConfig) -> Result<PointerAnalysisResult> {
        config.validate()?;
        info!(
            "Starting pointer analysis: context={} k={} heap_k={}",
            config.context.as_str(),
            config.context.k(),
            config.effective_heap_depth()
        );

        let mut solver = Solver::new(program, selector_for(config));
        solver.solve();
        Ok(PointerAnalysisResult::new(program, solver.into_output()))
    }
}
