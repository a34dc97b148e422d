//! Stage-specific configuration types
//!
//! Each analysis stage has its own configuration struct with validation.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};

/// Largest accepted context depth
pub const MAX_CONTEXT_DEPTH: usize = 8;

// ============================================================================
// Points-to Analysis Configuration
// ============================================================================

/// Context-sensitivity flavour and call-context depth `k`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "k", rename_all = "snake_case")]
pub enum ContextStrategy {
    /// Every method and object under the empty context
    Insensitive,
    /// k most recent call sites
    CallSite(usize),
    /// k most recent receiver objects
    Object(usize),
    /// k most recent classes containing the receivers' allocation sites
    Type(usize),
}

impl ContextStrategy {
    /// Call-context depth, 0 when insensitive
    pub fn k(&self) -> usize {
        match self {
            Self::Insensitive => 0,
            Self::CallSite(k) | Self::Object(k) | Self::Type(k) => *k,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insensitive => "insensitive",
            Self::CallSite(_) => "call_site",
            Self::Object(_) => "object",
            Self::Type(_) => "type",
        }
    }
}

/// Points-to analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PTAConfig {
    /// Context-sensitivity policy
    pub context: ContextStrategy,

    /// Heap context depth (None = k-1)
    pub heap_context_depth: Option<usize>,
}

impl PTAConfig {
    /// Create config from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                context: ContextStrategy::Insensitive,
                heap_context_depth: None,
            },
            Preset::Balanced => Self {
                context: ContextStrategy::Object(1),
                heap_context_depth: None,
            },
            Preset::Thorough => Self {
                context: ContextStrategy::Object(2),
                heap_context_depth: Some(1),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let k = self.context.k();
        if self.context != ContextStrategy::Insensitive && !(1..=MAX_CONTEXT_DEPTH).contains(&k) {
            return Err(ConfigError::range_with_hint(
                "context.k",
                k,
                1,
                MAX_CONTEXT_DEPTH,
                "Context depth must be at least 1; use 'insensitive' for k = 0",
            ));
        }

        if let Some(hk) = self.heap_context_depth {
            if hk > k {
                return Err(ConfigError::Conflict {
                    issue: format!("heap_context_depth {} exceeds context depth k={}", hk, k),
                    fix: format!("set heap_context_depth to at most {}", k),
                });
            }
        }

        Ok(())
    }

    /// Heap context depth actually used
    pub fn effective_heap_depth(&self) -> usize {
        let k = self.context.k();
        self.heap_context_depth.unwrap_or_else(|| k.saturating_sub(1))
    }

    /// Builder: Set context strategy
    pub fn context(mut self, v: ContextStrategy) -> Self {
        self.context = v;
        self
    }

    /// Builder: Set heap context depth
    pub fn heap_context_depth(mut self, v: Option<usize>) -> Self {
        self.heap_context_depth = v;
        self
    }
}

impl Default for PTAConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

// ============================================================================
// Dataflow Configuration
// ============================================================================

/// Interprocedural dataflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataflowConfig {
    /// Use points-to facts for field/array loads and stores.
    /// When off, heap loads are NAC and stores do not requeue loads.
    pub alias_aware: bool,
}

impl DataflowConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self { alias_aware: true }
    }

    /// Builder: Set alias_aware
    pub fn alias_aware(mut self, v: bool) -> Self {
        self.alias_aware = v;
        self
    }
}

impl Default for DataflowConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
