/*
 * Codegraph PTA - Whole-program points-to and interprocedural dataflow engine
 *
 * Feature-First Architecture:
 * - shared/      : IR model, CFG, class hierarchy port
 * - features/    : call_graph → points_to → data_flow
 * - config/      : Presets, stage configs, YAML io
 *
 * Pipeline:
 * - CHA or on-the-fly call graph construction
 * - Context-sensitive points-to fixpoint over a pointer flow graph
 * - Worklist dataflow (intra- and interprocedural), heap-aware via points-to facts
 */

#![allow(clippy::type_complexity)] // Interned tuple keys are spelled out
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::upper_case_acronyms)] // CFG, ICFG, PFG naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models, ports and macros
#[macro_use]
pub mod shared;

/// Feature modules (call graph, points-to, dataflow)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalysisConfig, DataflowConfig, PTAConfig, Preset};
pub use errors::{PtaError, Result};
pub use features::call_graph::{CallGraph, CallKind, ChaCallGraphBuilder};
pub use features::data_flow::{
    CPFact, ConstantPropagation, DataflowResult, DeadCodeDetection, InterConstantPropagation,
    LiveVariableAnalysis, Value,
};
pub use features::points_to::{PointerAnalysis, PointerAnalysisResult};
pub use shared::models::{Program, ProgramBuilder};
