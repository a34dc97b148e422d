//! Interning of pointers and context-qualified objects
//!
//! Every logical pointer maps to exactly one [`PointerId`]; its points-to set
//! is stored alongside. Pointers are created lazily on first request and never
//! removed.

use crate::features::points_to::domain::{
    ContextId, CsObj, CsObjId, ObjId, Pointer, PointerId, PointsToSet,
};
use crate::shared::models::{FieldId, VarId};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct CsManager {
    pointers: Vec<Pointer>,
    pointer_ids: FxHashMap<Pointer, PointerId>,
    pts: Vec<PointsToSet>,
    cs_objs: Vec<CsObj>,
    cs_obj_ids: FxHashMap<CsObj, CsObjId>,
}

impl CsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interned id of `pointer`, created on first request
    pub fn get_or_create(&mut self, pointer: Pointer) -> PointerId {
        if let Some(&id) = self.pointer_ids.get(&pointer) {
            return id;
        }
        let id = PointerId::from_index(self.pointers.len());
        self.pointers.push(pointer);
        self.pts.push(PointsToSet::new());
        self.pointer_ids.insert(pointer, id);
        id
    }

    pub fn var_ptr(&mut self, context: ContextId, var: VarId) -> PointerId {
        self.get_or_create(Pointer::Var { context, var })
    }

    pub fn static_field_ptr(&mut self, field: FieldId) -> PointerId {
        self.get_or_create(Pointer::StaticField { field })
    }

    pub fn instance_field_ptr(&mut self, base: CsObjId, field: FieldId) -> PointerId {
        self.get_or_create(Pointer::InstanceField { base, field })
    }

    pub fn array_index_ptr(&mut self, array: CsObjId) -> PointerId {
        self.get_or_create(Pointer::ArrayIndex { array })
    }

    /// Existing pointer lookup, never creates
    pub fn lookup(&self, pointer: &Pointer) -> Option<PointerId> {
        self.pointer_ids.get(pointer).copied()
    }

    #[inline]
    pub fn pointer(&self, id: PointerId) -> &Pointer {
        &self.pointers[id.index()]
    }

    #[inline]
    pub fn pts(&self, id: PointerId) -> &PointsToSet {
        &self.pts[id.index()]
    }

    #[inline]
    pub fn pts_mut(&mut self, id: PointerId) -> &mut PointsToSet {
        &mut self.pts[id.index()]
    }

    /// All pointers with their points-to sets, in creation order
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, &Pointer, &PointsToSet)> + '_ {
        self.pointers
            .iter()
            .zip(self.pts.iter())
            .enumerate()
            .map(|(i, (p, pts))| (PointerId::from_index(i), p, pts))
    }

    pub fn get_cs_obj(&mut self, context: ContextId, obj: ObjId) -> CsObjId {
        let cs_obj = CsObj { context, obj };
        if let Some(&id) = self.cs_obj_ids.get(&cs_obj) {
            return id;
        }
        let id = CsObjId::from_index(self.cs_objs.len());
        self.cs_objs.push(cs_obj);
        self.cs_obj_ids.insert(cs_obj, id);
        id
    }

    #[inline]
    pub fn cs_obj(&self, id: CsObjId) -> &CsObj {
        &self.cs_objs[id.index()]
    }

    pub fn num_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn num_cs_objs(&self) -> usize {
        self.cs_objs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_interning() {
        let mut cs = CsManager::new();
        let a = cs.var_ptr(ContextId::EMPTY, VarId(3));
        let b = cs.var_ptr(ContextId::EMPTY, VarId(3));
        let c = cs.var_ptr(ContextId(1), VarId(3));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(cs.num_pointers(), 2);
        assert!(cs.pts(a).is_empty());
    }

    #[test]
    fn test_cs_obj_interning() {
        let mut cs = CsManager::new();
        let o1 = cs.get_cs_obj(ContextId::EMPTY, ObjId(0));
        let o2 = cs.get_cs_obj(ContextId::EMPTY, ObjId(0));
        let o3 = cs.get_cs_obj(ContextId(2), ObjId(0));
        assert_eq!(o1, o2);
        assert_ne!(o1, o3);
        assert_eq!(cs.cs_obj(o3).context, ContextId(2));
    }

    #[test]
    fn test_field_and_array_pointers_distinct() {
        let mut cs = CsManager::new();
        let o = cs.get_cs_obj(ContextId::EMPTY, ObjId(0));
        let f = cs.instance_field_ptr(o, FieldId(0));
        let g = cs.instance_field_ptr(o, FieldId(1));
        let arr = cs.array_index_ptr(o);
        let s = cs.static_field_ptr(FieldId(0));
        assert_eq!(cs.num_pointers(), 4);
        assert_ne!(f, g);
        assert_ne!(arr, s);
        assert_eq!(cs.lookup(&Pointer::StaticField { field: FieldId(0) }), Some(s));
        assert_eq!(cs.lookup(&Pointer::StaticField { field: FieldId(9) }), None);
    }
}
