//! Points-to domain: objects, contexts, pointers and points-to sets

pub mod context;
pub mod heap_model;
pub mod pointer;
pub mod points_to_set;

pub use context::{ContextElem, ContextId, ContextTable};
pub use heap_model::{AllocationSiteHeapModel, HeapModel, Obj, ObjId};
pub use pointer::{CsCallSite, CsMethod, CsObj, CsObjId, Pointer, PointerId};
pub use points_to_set::PointsToSet;
