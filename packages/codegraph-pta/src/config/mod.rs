//! Configuration System
//!
//! Tiered configuration:
//! - Level 1: Preset - Simple one-liner
//! - Level 2: Stage Override - Partial adjustment
//! - Level 3: YAML - Complete control
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_pta::config::{AnalysisConfig, ContextStrategy, Preset};
//!
//! // Level 1: Simple preset
//! let config = AnalysisConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2: Override specific stage
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .pta(|c| c.context(ContextStrategy::CallSite(2)))
//!     .build()?;
//!
//! // Level 3: YAML
//! let config = AnalysisConfig::from_yaml("analysis.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod stage_configs;

// Re-exports
pub use analysis_config::AnalysisConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use stage_configs::{ContextStrategy, DataflowConfig, PTAConfig, MAX_CONTEXT_DEPTH};
