//! Pointers and context-qualified program elements
//!
//! | Pointer          | Key                  |
//! |------------------|----------------------|
//! | `Var`            | (context, variable)  |
//! | `StaticField`    | field                |
//! | `InstanceField`  | (cs-object, field)   |
//! | `ArrayIndex`     | cs-object            |
//!
//! All array elements of one object collapse into a single pointer.

use super::context::ContextId;
use super::heap_model::ObjId;
use crate::shared::models::{FieldId, MethodId, StmtRef, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id!(
    /// Interned pointer (PFG node) handle
    PointerId,
    "ptr#"
);
crate::define_id!(
    /// Interned context-qualified object handle
    CsObjId,
    "csobj#"
);

/// Abstract object under a heap context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CsObj {
    pub context: ContextId,
    pub obj: ObjId,
}

/// Method under a calling context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CsMethod {
    pub context: ContextId,
    pub method: MethodId,
}

impl CsMethod {
    pub fn new(context: ContextId, method: MethodId) -> Self {
        Self { context, method }
    }
}

impl fmt::Display for CsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context, self.method)
    }
}

/// Call site under the caller's context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CsCallSite {
    pub context: ContextId,
    pub call_site: StmtRef,
}

impl CsCallSite {
    pub fn new(context: ContextId, call_site: StmtRef) -> Self {
        Self { context, call_site }
    }
}

impl fmt::Display for CsCallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context, self.call_site)
    }
}

/// Node of the pointer flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pointer {
    Var { context: ContextId, var: VarId },
    StaticField { field: FieldId },
    InstanceField { base: CsObjId, field: FieldId },
    ArrayIndex { array: CsObjId },
}

impl Pointer {
    #[inline]
    pub fn is_var(&self) -> bool {
        matches!(self, Pointer::Var { .. })
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointer::Var { context, var } => write!(f, "{}:{}", context, var),
            Pointer::StaticField { field } => write!(f, "{}", field),
            Pointer::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            Pointer::ArrayIndex { array } => write!(f, "{}[*]", array),
        }
    }
}
