//! Points-to analysis result
//!
//! Read-only view over a finished solver run. Context-sensitive facts are
//! available directly; the context-insensitive projections (per variable,
//! per call site) merge all contexts.

use crate::features::call_graph::domain::{CallGraph, Edge};
use crate::features::points_to::domain::{
    AllocationSiteHeapModel, ContextElem, ContextId, ContextTable, CsCallSite, CsMethod, CsObj,
    CsObjId, HeapModel, Obj, ObjId, Pointer, PointerId, PointsToSet,
};
use crate::features::points_to::infrastructure::{CsManager, SolverOutput, SolverStats};
use crate::shared::models::{FieldId, MethodId, Program, StmtRef, VarId};
use rustc_hash::{FxHashMap, FxHashSet};

pub struct PointerAnalysisResult {
    heap_model: AllocationSiteHeapModel,
    contexts: ContextTable,
    cs_manager: CsManager,
    call_graph: CallGraph<CsCallSite, CsMethod>,
    stats: SolverStats,
    entry_methods: Vec<MethodId>,
    /// Variable pointers of each variable, one per context
    var_pointers: FxHashMap<VarId, Vec<PointerId>>,
}

impl PointerAnalysisResult {
    pub(crate) fn new(program: &Program, output: SolverOutput) -> Self {
        let mut var_pointers: FxHashMap<VarId, Vec<PointerId>> = FxHashMap::default();
        for (id, pointer, _) in output.cs_manager.pointers() {
            if let Pointer::Var { var, .. } = pointer {
                var_pointers.entry(*var).or_default().push(id);
            }
        }

        Self {
            heap_model: output.heap_model,
            contexts: output.contexts,
            cs_manager: output.cs_manager,
            call_graph: output.call_graph,
            stats: output.stats,
            entry_methods: program.entry_methods().to_vec(),
            var_pointers,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Objects and contexts
    // ═══════════════════════════════════════════════════════════════════════

    pub fn obj(&self, id: ObjId) -> &Obj {
        self.heap_model.obj(id)
    }

    /// All abstract objects, in allocation order
    pub fn objects(&self) -> &[Obj] {
        self.heap_model.objects()
    }

    pub fn cs_obj(&self, id: CsObjId) -> &CsObj {
        self.cs_manager.cs_obj(id)
    }

    pub fn context_elements(&self, context: ContextId) -> &[ContextElem] {
        self.contexts.elements(context)
    }

    pub fn contexts(&self) -> &ContextTable {
        &self.contexts
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Points-to queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Objects `var` may point to under any context (sorted, no duplicates)
    pub fn points_to_of_var(&self, var: VarId) -> Vec<ObjId> {
        let Some(pointers) = self.var_pointers.get(&var) else {
            return Vec::new();
        };
        let mut objs: Vec<ObjId> = pointers
            .iter()
            .flat_map(|&p| self.cs_manager.pts(p).iter())
            .map(|o| self.cs_manager.cs_obj(o).obj)
            .collect();
        objs.sort_unstable();
        objs.dedup();
        objs
    }

    /// Context-qualified objects of `var` under `context`
    pub fn cs_points_to(&self, context: ContextId, var: VarId) -> Vec<CsObjId> {
        self.pts_of(&Pointer::Var { context, var })
    }

    /// Contexts under which `var` has a pointer
    pub fn contexts_of(&self, var: VarId) -> Vec<ContextId> {
        self.var_pointers
            .get(&var)
            .map(|pointers| {
                pointers
                    .iter()
                    .filter_map(|&p| match self.cs_manager.pointer(p) {
                        Pointer::Var { context, .. } => Some(*context),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn points_to_of_static_field(&self, field: FieldId) -> Vec<CsObjId> {
        self.pts_of(&Pointer::StaticField { field })
    }

    pub fn points_to_of_instance_field(&self, base: CsObjId, field: FieldId) -> Vec<CsObjId> {
        self.pts_of(&Pointer::InstanceField { base, field })
    }

    /// Objects stored in any slot of `array`
    pub fn points_to_of_array(&self, array: CsObjId) -> Vec<CsObjId> {
        self.pts_of(&Pointer::ArrayIndex { array })
    }

    /// Context-qualified points-to set of `var` merged over all contexts
    pub fn merged_pts(&self, var: VarId) -> PointsToSet {
        let mut merged = PointsToSet::new();
        if let Some(pointers) = self.var_pointers.get(&var) {
            for &p in pointers {
                merged.add_all(self.cs_manager.pts(p));
            }
        }
        merged
    }

    /// True when the two variables may reference a common object
    pub fn may_alias(&self, a: VarId, b: VarId) -> bool {
        self.merged_pts(a).intersects(&self.merged_pts(b))
    }

    /// All pointers with their final points-to sets
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, &Pointer, &PointsToSet)> + '_ {
        self.cs_manager.pointers()
    }

    fn pts_of(&self, pointer: &Pointer) -> Vec<CsObjId> {
        self.cs_manager
            .lookup(pointer)
            .map(|p| self.cs_manager.pts(p).iter().collect())
            .unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call graph
    // ═══════════════════════════════════════════════════════════════════════

    /// Context-sensitive call graph
    pub fn call_graph(&self) -> &CallGraph<CsCallSite, CsMethod> {
        &self.call_graph
    }

    /// Call graph with contexts erased
    pub fn ci_call_graph(&self) -> CallGraph<StmtRef, MethodId> {
        let mut graph = CallGraph::new();
        for &entry in &self.entry_methods {
            graph.add_entry_method(entry);
            graph.add_reachable_method(entry);
        }
        for m in self.call_graph.reachable_methods() {
            graph.add_reachable_method(m.method);
        }
        for edge in self.call_graph.edges() {
            graph.add_edge(Edge::new(
                edge.kind,
                edge.call_site.call_site,
                edge.callee.method,
            ));
        }
        graph
    }

    /// Methods reachable under at least one context (sorted)
    pub fn reachable_methods(&self) -> Vec<MethodId> {
        let set: FxHashSet<MethodId> = self
            .call_graph
            .reachable_methods()
            .iter()
            .map(|m| m.method)
            .collect();
        let mut methods: Vec<MethodId> = set.into_iter().collect();
        methods.sort_unstable();
        methods
    }

    /// Callees of `call_site` under any context (sorted)
    pub fn callees_of(&self, call_site: StmtRef) -> Vec<MethodId> {
        let mut callees: Vec<MethodId> = self
            .call_graph
            .edges()
            .iter()
            .filter(|e| e.call_site.call_site == call_site)
            .map(|e| e.callee.method)
            .collect();
        callees.sort_unstable();
        callees.dedup();
        callees
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}
