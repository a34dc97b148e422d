//! On-the-fly points-to / call graph solver
//!
//! Worklist algorithm that discovers reachable methods while propagating
//! points-to sets through a growing pointer flow graph.
//!
//! ```text
//! Initializing ──► Fixpoint ──(worklist empty)──► Done
//! ```
//!
//! Per worklist entry `(p, pts)`:
//! 1. delta = pts \ pt(p); stop if empty
//! 2. pt(p) ∪= delta; send delta to every PFG successor of p
//! 3. if p is a variable pointer, for each object in delta: wire field/array
//!    loads and stores on that object, and dispatch calls on it
//!
//! Statements that do not depend on a receiver object (allocations, copies,
//! static field access, static calls) are handled once, when their method
//! becomes reachable under a context.

use super::context_selector::{ContextSelector, ReceiverInfo};
use super::cs_manager::CsManager;
use super::pointer_flow_graph::PointerFlowGraph;
use super::worklist::WorkList;
use crate::features::call_graph::domain::{CallGraph, Edge};
use crate::features::call_graph::infrastructure::CallResolver;
use crate::features::points_to::domain::{
    AllocationSiteHeapModel, ContextId, ContextTable, CsCallSite, CsMethod, CsObjId, HeapModel,
    Pointer, PointerId, PointsToSet,
};
use crate::shared::models::{Program, Stmt, VarId};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Solver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverState {
    Initializing,
    Fixpoint,
    Done,
}

/// Solver statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Worklist entries popped
    pub processed_entries: usize,
    pub pfg_edges: usize,
    pub reachable_methods: usize,
    pub call_edges: usize,
    pub pointers: usize,
    /// Context-qualified objects
    pub objects: usize,
    pub contexts: usize,
    pub duration_ms: f64,
}

/// Everything the solver owns once it reaches Done
pub struct SolverOutput {
    pub heap_model: AllocationSiteHeapModel,
    pub contexts: ContextTable,
    pub cs_manager: CsManager,
    pub pfg: PointerFlowGraph,
    pub call_graph: CallGraph<CsCallSite, CsMethod>,
    pub stats: SolverStats,
}

pub struct Solver<'p> {
    program: &'p Program,
    resolver: CallResolver<'p, Program>,
    selector: Box<dyn ContextSelector>,
    heap_model: AllocationSiteHeapModel,
    contexts: ContextTable,
    cs_manager: CsManager,
    pfg: PointerFlowGraph,
    worklist: WorkList,
    call_graph: CallGraph<CsCallSite, CsMethod>,
    state: SolverState,
    processed: usize,
    elapsed_ms: f64,
}

impl<'p> Solver<'p> {
    pub fn new(program: &'p Program, selector: Box<dyn ContextSelector>) -> Self {
        Self {
            program,
            resolver: CallResolver::new(program),
            selector,
            heap_model: AllocationSiteHeapModel::new(),
            contexts: ContextTable::new(),
            cs_manager: CsManager::new(),
            pfg: PointerFlowGraph::new(),
            worklist: WorkList::new(),
            call_graph: CallGraph::new(),
            state: SolverState::Initializing,
            processed: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Advance by one unit of work: initialization, or one worklist entry.
    /// Returns false once Done.
    pub fn step(&mut self) -> bool {
        let start = Instant::now();
        let progressed = match self.state {
            SolverState::Initializing => {
                self.initialize();
                true
            }
            SolverState::Fixpoint => match self.worklist.pop() {
                Some((pointer, pts)) => {
                    self.process_entry(pointer, pts);
                    self.processed += 1;
                    true
                }
                None => {
                    self.state = SolverState::Done;
                    false
                }
            },
            SolverState::Done => false,
        };
        self.elapsed_ms += start.elapsed().as_secs_f64() * 1000.0;
        progressed
    }

    /// Run to Done
    pub fn solve(&mut self) {
        while self.step() {}
        let stats = self.stats();
        info!(
            "Points-to fixpoint: {} entries, {} reachable methods, {} call edges, {} PFG edges, {} pointers, {} objects ({:.2}ms)",
            stats.processed_entries,
            stats.reachable_methods,
            stats.call_edges,
            stats.pfg_edges,
            stats.pointers,
            stats.objects,
            stats.duration_ms
        );
    }

    pub fn stats(&self) -> SolverStats {
        SolverStats {
            processed_entries: self.processed,
            pfg_edges: self.pfg.num_edges(),
            reachable_methods: self.call_graph.num_reachable_methods(),
            call_edges: self.call_graph.num_edges(),
            pointers: self.cs_manager.num_pointers(),
            objects: self.cs_manager.num_cs_objs(),
            contexts: self.contexts.len(),
            duration_ms: self.elapsed_ms,
        }
    }

    pub fn cs_manager(&self) -> &CsManager {
        &self.cs_manager
    }

    pub fn call_graph(&self) -> &CallGraph<CsCallSite, CsMethod> {
        &self.call_graph
    }

    pub fn pfg(&self) -> &PointerFlowGraph {
        &self.pfg
    }

    pub fn pending_entries(&self) -> usize {
        self.worklist.len()
    }

    pub fn into_output(self) -> SolverOutput {
        let stats = self.stats();
        SolverOutput {
            heap_model: self.heap_model,
            contexts: self.contexts,
            cs_manager: self.cs_manager,
            pfg: self.pfg,
            call_graph: self.call_graph,
            stats,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Initialization
    // ═══════════════════════════════════════════════════════════════════════

    fn initialize(&mut self) {
        let program = self.program;
        let empty = self.selector.empty_context();
        for &entry in program.entry_methods() {
            let cs_entry = CsMethod::new(empty, entry);
            self.call_graph.add_entry_method(cs_entry);
            self.add_reachable(cs_entry);
        }
        self.state = SolverState::Fixpoint;
        debug!(
            "Points-to initialized: {} entry methods, {} pending entries",
            program.entry_methods().len(),
            self.worklist.len()
        );
    }

    /// Mark a method reachable and handle its receiver-independent statements
    fn add_reachable(&mut self, cs_method: CsMethod) {
        if !self.call_graph.add_reachable_method(cs_method) {
            return;
        }
        debug!("Reachable: {}", cs_method);

        let program = self.program;
        let ctx = cs_method.context;
        for (stmt_ref, stmt) in program.method(cs_method.method).stmt_refs() {
            match stmt {
                Stmt::New { lhs, ty } => {
                    let obj = self.heap_model.obj_for(stmt_ref, ty);
                    let heap_ctx = self
                        .selector
                        .select_heap_context(&mut self.contexts, ctx, obj);
                    let cs_obj = self.cs_manager.get_cs_obj(heap_ctx, obj);
                    let ptr = self.cs_manager.var_ptr(ctx, *lhs);
                    self.worklist.push(ptr, PointsToSet::singleton(cs_obj));
                }
                Stmt::Copy { lhs, rhs } => {
                    let src = self.cs_manager.var_ptr(ctx, *rhs);
                    let dst = self.cs_manager.var_ptr(ctx, *lhs);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::LoadField {
                    lhs,
                    base: None,
                    field,
                } => {
                    let src = self.cs_manager.static_field_ptr(*field);
                    let dst = self.cs_manager.var_ptr(ctx, *lhs);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::StoreField {
                    base: None,
                    field,
                    rhs,
                } => {
                    let src = self.cs_manager.var_ptr(ctx, *rhs);
                    let dst = self.cs_manager.static_field_ptr(*field);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::Invoke(invoke) if invoke.is_static() => {
                    let Some(callee) = self.resolver.resolve_callee(None, invoke) else {
                        debug!("Unresolved static call at {}", stmt_ref);
                        continue;
                    };
                    let callee_ctx = self.selector.select_static_context(
                        &mut self.contexts,
                        ctx,
                        stmt_ref,
                        callee,
                    );
                    let cs_site = CsCallSite::new(ctx, stmt_ref);
                    let cs_callee = CsMethod::new(callee_ctx, callee);
                    if self
                        .call_graph
                        .add_edge(Edge::new(invoke.kind, cs_site, cs_callee))
                    {
                        self.process_invoke(cs_site, cs_callee);
                    }
                }
                _ => {}
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fixpoint
    // ═══════════════════════════════════════════════════════════════════════

    fn process_entry(&mut self, pointer: PointerId, pts: PointsToSet) {
        let delta = self.propagate(pointer, pts);
        if delta.is_empty() {
            return;
        }

        if let Pointer::Var { context, var } = *self.cs_manager.pointer(pointer) {
            for cs_obj in delta.iter() {
                self.handle_heap_access(context, var, cs_obj);
                self.process_call(context, var, cs_obj);
            }
        }
    }

    /// Add `pts` to pt(pointer) and forward the new part along PFG edges
    fn propagate(&mut self, pointer: PointerId, pts: PointsToSet) -> PointsToSet {
        let delta = self.cs_manager.pts_mut(pointer).add_all(&pts);
        if !delta.is_empty() {
            trace!("{} += {} objects", pointer, delta.len());
            let succs: Vec<PointerId> = self.pfg.successors_of(pointer).collect();
            for succ in succs {
                self.worklist.push(succ, delta.clone());
            }
        }
        delta
    }

    /// Add a PFG edge; a new edge immediately carries pt(src)
    fn add_pfg_edge(&mut self, src: PointerId, dst: PointerId) {
        if self.pfg.add_edge(src, dst) {
            let pts = self.cs_manager.pts(src);
            if !pts.is_empty() {
                let pts = pts.clone();
                self.worklist.push(dst, pts);
            }
        }
    }

    /// Field and array accesses whose base is `var` under `ctx`, now on `cs_obj`
    fn handle_heap_access(&mut self, ctx: ContextId, var: VarId, cs_obj: CsObjId) {
        let program = self.program;
        let uses = program.var_uses(var);

        for &load in &uses.load_fields {
            if let Stmt::LoadField { lhs, field, .. } = program.stmt(load) {
                let src = self.cs_manager.instance_field_ptr(cs_obj, *field);
                let dst = self.cs_manager.var_ptr(ctx, *lhs);
                self.add_pfg_edge(src, dst);
            }
        }
        for &store in &uses.store_fields {
            if let Stmt::StoreField { field, rhs, .. } = program.stmt(store) {
                let src = self.cs_manager.var_ptr(ctx, *rhs);
                let dst = self.cs_manager.instance_field_ptr(cs_obj, *field);
                self.add_pfg_edge(src, dst);
            }
        }
        for &load in &uses.load_arrays {
            if let Stmt::LoadArray { lhs, .. } = program.stmt(load) {
                let src = self.cs_manager.array_index_ptr(cs_obj);
                let dst = self.cs_manager.var_ptr(ctx, *lhs);
                self.add_pfg_edge(src, dst);
            }
        }
        for &store in &uses.store_arrays {
            if let Stmt::StoreArray { rhs, .. } = program.stmt(store) {
                let src = self.cs_manager.var_ptr(ctx, *rhs);
                let dst = self.cs_manager.array_index_ptr(cs_obj);
                self.add_pfg_edge(src, dst);
            }
        }
    }

    /// Dispatch every call whose receiver is `var` under `ctx` on `recv`
    fn process_call(&mut self, ctx: ContextId, var: VarId, recv: CsObjId) {
        let program = self.program;
        let cs_obj = *self.cs_manager.cs_obj(recv);
        let obj = self.heap_model.obj(cs_obj.obj).clone();
        let receiver = ReceiverInfo {
            heap_context: cs_obj.context,
            obj: cs_obj.obj,
            alloc_class: program.method(obj.container_method()).declaring_class,
        };

        for &call_site in &program.var_uses(var).invokes {
            let Some(invoke) = program.stmt(call_site).as_invoke() else {
                continue;
            };
            let Some(callee) = self.resolver.resolve_callee(Some(&obj.ty), invoke) else {
                debug!("Unresolved {} call at {} on {}", invoke.kind.as_str(), call_site, recv);
                continue;
            };

            let callee_ctx = self.selector.select_instance_context(
                &mut self.contexts,
                ctx,
                call_site,
                &receiver,
                callee,
            );
            if let Some(this) = program.method(callee).this {
                let this_ptr = self.cs_manager.var_ptr(callee_ctx, this);
                self.worklist.push(this_ptr, PointsToSet::singleton(recv));
            }

            let cs_site = CsCallSite::new(ctx, call_site);
            let cs_callee = CsMethod::new(callee_ctx, callee);
            if self
                .call_graph
                .add_edge(Edge::new(invoke.kind, cs_site, cs_callee))
            {
                self.process_invoke(cs_site, cs_callee);
            }
        }
    }

    /// New call edge: make the callee reachable and wire arguments and results
    fn process_invoke(&mut self, cs_site: CsCallSite, cs_callee: CsMethod) {
        self.add_reachable(cs_callee);

        let program = self.program;
        let Some(invoke) = program.stmt(cs_site.call_site).as_invoke() else {
            return;
        };
        let callee = program.method(cs_callee.method);
        let (caller_ctx, callee_ctx) = (cs_site.context, cs_callee.context);

        // Arity mismatch binds the common prefix only
        for (arg, param) in invoke.args.iter().zip(callee.params.iter()) {
            let src = self.cs_manager.var_ptr(caller_ctx, *arg);
            let dst = self.cs_manager.var_ptr(callee_ctx, *param);
            self.add_pfg_edge(src, dst);
        }

        if let Some(result) = invoke.result {
            for ret in program.return_vars(callee.id) {
                let src = self.cs_manager.var_ptr(callee_ctx, *ret);
                let dst = self.cs_manager.var_ptr(caller_ctx, result);
                self.add_pfg_edge(src, dst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::infrastructure::context_selector::ContextInsensitiveSelector;
    use crate::shared::models::{ProgramBuilder, Type};

    fn copy_program() -> (Program, VarId, VarId) {
        let mut b = ProgramBuilder::new();
        let a = b.add_class("A", None);
        let mut main = b.static_method(a, "main", "void main()");
        let x = main.var("x", Type::Class(a));
        let y = main.var("y", Type::Class(a));
        main.new_obj(x, Type::Class(a));
        main.copy(y, x);
        main.ret(None);
        let main = main.finish();
        b.add_entry(main);
        (b.build().unwrap(), x, y)
    }

    #[test]
    fn test_state_machine() {
        let (program, _, _) = copy_program();
        let mut solver = Solver::new(&program, Box::new(ContextInsensitiveSelector));
        assert_eq!(solver.state(), SolverState::Initializing);

        assert!(solver.step());
        assert_eq!(solver.state(), SolverState::Fixpoint);
        assert_eq!(solver.pending_entries(), 1);

        while solver.step() {}
        assert_eq!(solver.state(), SolverState::Done);
        assert!(!solver.step());
    }

    #[test]
    fn test_copy_propagates() {
        let (program, x, y) = copy_program();
        let mut solver = Solver::new(&program, Box::new(ContextInsensitiveSelector));
        solver.solve();

        let cs = solver.cs_manager();
        let px = cs.lookup(&Pointer::Var { context: ContextId::EMPTY, var: x }).unwrap();
        let py = cs.lookup(&Pointer::Var { context: ContextId::EMPTY, var: y }).unwrap();
        assert_eq!(cs.pts(px).len(), 1);
        assert_eq!(cs.pts(px), cs.pts(py));

        let stats = solver.stats();
        assert_eq!(stats.reachable_methods, 1);
        assert_eq!(stats.pfg_edges, 1);
        assert_eq!(stats.objects, 1);
    }

    #[test]
    fn test_unresolved_static_call_is_ignored() {
        let mut b = ProgramBuilder::new();
        let a = b.add_class("A", None);
        let mut main = b.static_method(a, "main", "void main()");
        main.invoke_static(
            None,
            crate::shared::models::MethodRef::new(a, "void missing()"),
            &[],
        );
        main.ret(None);
        let main = main.finish();
        b.add_entry(main);
        let program = b.build().unwrap();

        let mut solver = Solver::new(&program, Box::new(ContextInsensitiveSelector));
        solver.solve();
        assert_eq!(solver.call_graph().num_edges(), 0);
        assert_eq!(solver.state(), SolverState::Done);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EDGE CASES: argument / parameter count mismatch
    // ═══════════════════════════════════════════════════════════════════════

    /// `callee` declares `num_params` reference parameters; `main` allocates
    /// `num_args` distinct objects and passes them all
    fn mismatched_call(num_params: usize, num_args: usize) -> (Program, Vec<VarId>, Vec<VarId>) {
        let mut b = ProgramBuilder::new();
        let a = b.add_class("A", None);

        let mut callee = b.static_method(a, "take", "void take()");
        let params: Vec<VarId> = (0..num_params)
            .map(|i| callee.param(&format!("p{}", i), Type::Class(a)))
            .collect();
        callee.ret(None);
        callee.finish();

        let mut main = b.static_method(a, "main", "void main()");
        let args: Vec<VarId> = (0..num_args)
            .map(|i| main.var(&format!("a{}", i), Type::Class(a)))
            .collect();
        for &arg in &args {
            main.new_obj(arg, Type::Class(a));
        }
        main.invoke_static(
            None,
            crate::shared::models::MethodRef::new(a, "void take()"),
            &args,
        );
        main.ret(None);
        let main = main.finish();
        b.add_entry(main);
        (b.build().unwrap(), params, args)
    }

    fn pts_of(solver: &Solver<'_>, var: VarId) -> Option<PointsToSet> {
        let cs = solver.cs_manager();
        cs.lookup(&Pointer::Var { context: ContextId::EMPTY, var })
            .map(|p| cs.pts(p).clone())
    }

    #[test]
    fn test_fewer_args_than_params_binds_prefix() {
        let (program, params, args) = mismatched_call(2, 1);
        let mut solver = Solver::new(&program, Box::new(ContextInsensitiveSelector));
        solver.solve();

        assert_eq!(solver.call_graph().num_edges(), 1);
        let bound = pts_of(&solver, params[0]).unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(Some(bound), pts_of(&solver, args[0]));
        assert!(pts_of(&solver, params[1]).map_or(true, |pts| pts.is_empty()));
    }

    #[test]
    fn test_more_args_than_params_binds_prefix() {
        let (program, params, args) = mismatched_call(1, 2);
        let mut solver = Solver::new(&program, Box::new(ContextInsensitiveSelector));
        solver.solve();

        assert_eq!(solver.state(), SolverState::Done);
        let bound = pts_of(&solver, params[0]).unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(pts_of(&solver, args[0]).as_ref(), Some(&bound));
        // Second argument's object never reaches the callee
        let extra = pts_of(&solver, args[1]).unwrap();
        assert!(!extra.intersects(&bound));
        assert_eq!(solver.pfg().num_edges(), 1);
    }
}
