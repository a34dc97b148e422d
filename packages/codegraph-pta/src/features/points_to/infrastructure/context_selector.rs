//! Context selection policies
//!
//! - Insensitive: empty context everywhere
//! - k-call-site: callee context = last k of (caller context + call site)
//! - k-object: callee context = last k of (receiver heap context + receiver object)
//! - k-type: as k-object, with the class declaring the method that allocated
//!   the receiver
//!
//! Heap contexts keep the last `hk` elements of the allocating method's
//! context. Object/type policies let static callees inherit the caller context.

use crate::config::{ContextStrategy, PTAConfig};
use crate::features::points_to::domain::{ContextElem, ContextId, ContextTable, ObjId};
use crate::shared::models::{ClassId, MethodId, StmtRef};

/// Receiver of an instance call
#[derive(Debug, Clone, Copy)]
pub struct ReceiverInfo {
    /// Heap context of the receiver
    pub heap_context: ContextId,
    pub obj: ObjId,
    /// Class declaring the method that contains the allocation site
    pub alloc_class: ClassId,
}

pub trait ContextSelector {
    fn empty_context(&self) -> ContextId {
        ContextId::EMPTY
    }

    /// Heap context for an object allocated in a method running under `method_ctx`
    fn select_heap_context(
        &self,
        contexts: &mut ContextTable,
        method_ctx: ContextId,
        obj: ObjId,
    ) -> ContextId;

    fn select_static_context(
        &self,
        contexts: &mut ContextTable,
        caller_ctx: ContextId,
        call_site: StmtRef,
        callee: MethodId,
    ) -> ContextId;

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        caller_ctx: ContextId,
        call_site: StmtRef,
        receiver: &ReceiverInfo,
        callee: MethodId,
    ) -> ContextId;
}

/// Build the selector configured by `config`
pub fn selector_for(config: &PTAConfig) -> Box<dyn ContextSelector> {
    let hk = config.effective_heap_depth();
    match config.context {
        ContextStrategy::Insensitive => Box::new(ContextInsensitiveSelector),
        ContextStrategy::CallSite(k) => Box::new(KCallSiteSelector::new(k, hk)),
        ContextStrategy::Object(k) => Box::new(KObjectSelector::new(k, hk)),
        ContextStrategy::Type(k) => Box::new(KTypeSelector::new(k, hk)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextInsensitiveSelector;

impl ContextSelector for ContextInsensitiveSelector {
    fn select_heap_context(&self, _: &mut ContextTable, _: ContextId, _: ObjId) -> ContextId {
        ContextId::EMPTY
    }

    fn select_static_context(
        &self,
        _: &mut ContextTable,
        _: ContextId,
        _: StmtRef,
        _: MethodId,
    ) -> ContextId {
        ContextId::EMPTY
    }

    fn select_instance_context(
        &self,
        _: &mut ContextTable,
        _: ContextId,
        _: StmtRef,
        _: &ReceiverInfo,
        _: MethodId,
    ) -> ContextId {
        ContextId::EMPTY
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KCallSiteSelector {
    k: usize,
    hk: usize,
}

impl KCallSiteSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for KCallSiteSelector {
    fn select_heap_context(
        &self,
        contexts: &mut ContextTable,
        method_ctx: ContextId,
        _: ObjId,
    ) -> ContextId {
        contexts.truncate(method_ctx, self.hk)
    }

    fn select_static_context(
        &self,
        contexts: &mut ContextTable,
        caller_ctx: ContextId,
        call_site: StmtRef,
        _: MethodId,
    ) -> ContextId {
        contexts.append(caller_ctx, ContextElem::CallSite(call_site), self.k)
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        caller_ctx: ContextId,
        call_site: StmtRef,
        _: &ReceiverInfo,
        _: MethodId,
    ) -> ContextId {
        contexts.append(caller_ctx, ContextElem::CallSite(call_site), self.k)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KObjectSelector {
    k: usize,
    hk: usize,
}

impl KObjectSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for KObjectSelector {
    fn select_heap_context(
        &self,
        contexts: &mut ContextTable,
        method_ctx: ContextId,
        _: ObjId,
    ) -> ContextId {
        contexts.truncate(method_ctx, self.hk)
    }

    fn select_static_context(
        &self,
        _: &mut ContextTable,
        caller_ctx: ContextId,
        _: StmtRef,
        _: MethodId,
    ) -> ContextId {
        caller_ctx
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        _: ContextId,
        _: StmtRef,
        receiver: &ReceiverInfo,
        _: MethodId,
    ) -> ContextId {
        contexts.append(receiver.heap_context, ContextElem::Object(receiver.obj), self.k)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KTypeSelector {
    k: usize,
    hk: usize,
}

impl KTypeSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for KTypeSelector {
    fn select_heap_context(
        &self,
        contexts: &mut ContextTable,
        method_ctx: ContextId,
        _: ObjId,
    ) -> ContextId {
        contexts.truncate(method_ctx, self.hk)
    }

    fn select_static_context(
        &self,
        _: &mut ContextTable,
        caller_ctx: ContextId,
        _: StmtRef,
        _: MethodId,
    ) -> ContextId {
        caller_ctx
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        _: ContextId,
        _: StmtRef,
        receiver: &ReceiverInfo,
        _: MethodId,
    ) -> ContextId {
        contexts.append(
            receiver.heap_context,
            ContextElem::Type(receiver.alloc_class),
            self.k,
        )
    }
}
