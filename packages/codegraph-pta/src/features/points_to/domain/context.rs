//! Calling / heap contexts
//!
//! A context is a bounded sequence of elements (call sites, receiver objects
//! or receiver types), interned so that equal sequences share one
//! [`ContextId`]. Id 0 is always the empty context.

use super::heap_model::ObjId;
use crate::shared::models::{ClassId, StmtRef};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

crate::define_id!(
    /// Interned context handle
    ContextId,
    "ctx#"
);

impl ContextId {
    /// The empty context
    pub const EMPTY: ContextId = ContextId(0);
}

/// One context element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextElem {
    CallSite(StmtRef),
    Object(ObjId),
    Type(ClassId),
}

/// Context interner
#[derive(Debug, Clone)]
pub struct ContextTable {
    contexts: Vec<Vec<ContextElem>>,
    ids: FxHashMap<Vec<ContextElem>, ContextId>,
}

impl Default for ContextTable {
    fn default() -> Self {
        let mut table = Self {
            contexts: Vec::new(),
            ids: FxHashMap::default(),
        };
        table.intern(Vec::new());
        table
    }
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, elems: Vec<ContextElem>) -> ContextId {
        if let Some(&id) = self.ids.get(&elems) {
            return id;
        }
        let id = ContextId::from_index(self.contexts.len());
        self.contexts.push(elems.clone());
        self.ids.insert(elems, id);
        id
    }

    /// Elements of a context, oldest first
    pub fn elements(&self, id: ContextId) -> &[ContextElem] {
        &self.contexts[id.index()]
    }

    /// `ctx ++ [elem]`, keeping only the last `limit` elements
    pub fn append(&mut self, ctx: ContextId, elem: ContextElem, limit: usize) -> ContextId {
        if limit == 0 {
            return ContextId::EMPTY;
        }
        let mut elems = self.elements(ctx).to_vec();
        elems.push(elem);
        let skip = elems.len().saturating_sub(limit);
        self.intern(elems.split_off(skip))
    }

    /// Last `limit` elements of `ctx`
    pub fn truncate(&mut self, ctx: ContextId, limit: usize) -> ContextId {
        let elems = self.elements(ctx);
        if elems.len() <= limit {
            return ctx;
        }
        let suffix = elems[elems.len() - limit..].to_vec();
        self.intern(suffix)
    }

    /// Number of distinct contexts, the empty one included
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
