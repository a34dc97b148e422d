//! Heap abstraction
//!
//! An abstract object stands for every runtime object created at one
//! allocation site.

use crate::shared::models::{MethodId, StmtRef, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

crate::define_id!(
    /// Abstract object handle
    ObjId,
    "obj#"
);

/// Abstract object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obj {
    pub id: ObjId,
    /// Allocation statement
    pub alloc: StmtRef,
    /// Allocated type, used for dispatch
    pub ty: Type,
}

impl Obj {
    /// Method containing the allocation site
    #[inline]
    pub fn container_method(&self) -> MethodId {
        self.alloc.method
    }
}

/// Maps allocation statements to abstract objects
pub trait HeapModel {
    /// Object for an allocation site, created on first request
    fn obj_for(&mut self, alloc: StmtRef, ty: &Type) -> ObjId;

    fn obj(&self, id: ObjId) -> &Obj;

    fn objects(&self) -> &[Obj];
}

/// One object per allocation site
#[derive(Debug, Clone, Default)]
pub struct AllocationSiteHeapModel {
    objs: Vec<Obj>,
    by_site: FxHashMap<StmtRef, ObjId>,
}

impl AllocationSiteHeapModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeapModel for AllocationSiteHeapModel {
    fn obj_for(&mut self, alloc: StmtRef, ty: &Type) -> ObjId {
        if let Some(&id) = self.by_site.get(&alloc) {
            return id;
        }
        let id = ObjId::from_index(self.objs.len());
        self.objs.push(Obj {
            id,
            alloc,
            ty: ty.clone(),
        });
        self.by_site.insert(alloc, id);
        id
    }

    fn obj(&self, id: ObjId) -> &Obj {
        &self.objs[id.index()]
    }

    fn objects(&self) -> &[Obj] {
        &self.objs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::ClassId;

    #[test]
    fn test_one_object_per_site() {
        let mut heap = AllocationSiteHeapModel::new();
        let site = StmtRef::new(MethodId(0), 3);
        let ty = Type::Class(ClassId(1));

        let a = heap.obj_for(site, &ty);
        let b = heap.obj_for(site, &ty);
        let c = heap.obj_for(StmtRef::new(MethodId(0), 4), &ty);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(heap.objects().len(), 2);
        assert_eq!(heap.obj(c).container_method(), MethodId(0));
    }
}
