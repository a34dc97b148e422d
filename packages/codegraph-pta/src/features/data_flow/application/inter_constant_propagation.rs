//! Interprocedural constant propagation with heap aliasing
//!
//! Runs over the ICFG of the call graph computed by pointer analysis.
//! - call node: identity; the call result is killed on the call-to-return
//!   edge and rebuilt from the callee's return values on the return edge
//! - call edge: arguments bound to parameters
//! - `x = a.f` / `x = A.f`: meet of the values stored by every aliasing store
//! - `x = a[i]`: meet of the values stored by aliasing array stores whose
//!   index may equal `i`
//! - stores requeue their aliasing loads when their fact changes
//!
//! Two accesses alias when their bases may point to a common object (static
//! fields: same field). Array indices match when both are the same constant
//! or either is NAC; an UNDEF index matches nothing.

use super::constant_propagation::ConstantPropagation;
use crate::config::DataflowConfig;
use crate::features::data_flow::domain::{CPFact, DataflowResult, Value};
use crate::features::data_flow::infrastructure::{
    Icfg, IcfgEdge, IcfgEdgeKind, InterDataflowAnalysis, InterSolver, InterSolverContext,
};
use crate::features::points_to::{ObjId, PointerAnalysisResult};
use crate::shared::models::{FieldId, Node, Program, Stmt, StmtRef, VarId};
use rustc_hash::FxHashMap;
use tracing::info;

pub struct InterConstantPropagation<'p> {
    program: &'p Program,
    cp: ConstantPropagation<'p>,
    icfg: Icfg,
    config: DataflowConfig,
    /// Instance field load → aliasing stores
    field_stores_of_load: FxHashMap<StmtRef, Vec<StmtRef>>,
    /// Instance field store → aliasing loads
    field_loads_of_store: FxHashMap<StmtRef, Vec<StmtRef>>,
    array_stores_of_load: FxHashMap<StmtRef, Vec<StmtRef>>,
    array_loads_of_store: FxHashMap<StmtRef, Vec<StmtRef>>,
}

impl<'p> InterConstantPropagation<'p> {
    pub fn new(program: &'p Program, pta: &PointerAnalysisResult, config: DataflowConfig) -> Self {
        let icfg = Icfg::build(program, &pta.ci_call_graph());
        let alias_aware = config.alias_aware;
        let mut analysis = Self {
            program,
            cp: ConstantPropagation::new(program),
            icfg,
            config,
            field_stores_of_load: FxHashMap::default(),
            field_loads_of_store: FxHashMap::default(),
            array_stores_of_load: FxHashMap::default(),
            array_loads_of_store: FxHashMap::default(),
        };
        if alias_aware {
            analysis.index_heap_accesses(pta);
        }
        analysis
    }

    pub fn icfg(&self) -> &Icfg {
        &self.icfg
    }

    pub fn analyze(&self) -> DataflowResult<Node, CPFact> {
        let (result, stats) = InterSolver::new(self, &self.icfg).solve();
        info!(
            "Interprocedural constant propagation: {} methods, {} node visits, {} requeues",
            self.icfg.methods().len(),
            stats.node_visits,
            stats.requeues
        );
        result
    }

    /// Pair up instance field and array accesses whose bases may alias
    fn index_heap_accesses(&mut self, pta: &PointerAnalysisResult) {
        let program = self.program;
        let mut field_loads: FxHashMap<(ObjId, FieldId), Vec<StmtRef>> = FxHashMap::default();
        let mut field_stores: FxHashMap<(ObjId, FieldId), Vec<StmtRef>> = FxHashMap::default();
        let mut array_loads: FxHashMap<ObjId, Vec<StmtRef>> = FxHashMap::default();
        let mut array_stores: FxHashMap<ObjId, Vec<StmtRef>> = FxHashMap::default();
        let mut accesses: Vec<(StmtRef, Vec<ObjId>)> = Vec::new();

        for &method in self.icfg.methods() {
            for (stmt_ref, stmt) in program.method(method).stmt_refs() {
                let (base, target) = match stmt {
                    Stmt::LoadField {
                        base: Some(base),
                        field,
                        ..
                    } => (*base, AccessKind::FieldLoad(*field)),
                    Stmt::StoreField {
                        base: Some(base),
                        field,
                        ..
                    } => (*base, AccessKind::FieldStore(*field)),
                    Stmt::LoadArray { base, .. } => (*base, AccessKind::ArrayLoad),
                    Stmt::StoreArray { base, .. } => (*base, AccessKind::ArrayStore),
                    _ => continue,
                };
                let objs = pta.points_to_of_var(base);
                for &obj in &objs {
                    match target {
                        AccessKind::FieldLoad(field) => {
                            field_loads.entry((obj, field)).or_default().push(stmt_ref)
                        }
                        AccessKind::FieldStore(field) => {
                            field_stores.entry((obj, field)).or_default().push(stmt_ref)
                        }
                        AccessKind::ArrayLoad => array_loads.entry(obj).or_default().push(stmt_ref),
                        AccessKind::ArrayStore => {
                            array_stores.entry(obj).or_default().push(stmt_ref)
                        }
                    }
                }
                accesses.push((stmt_ref, objs));
            }
        }

        for (stmt_ref, objs) in accesses {
            let (index, others) = match program.stmt(stmt_ref) {
                Stmt::LoadField { field, .. } => (
                    &mut self.field_stores_of_load,
                    collect(objs.iter().filter_map(|o| field_stores.get(&(*o, *field)))),
                ),
                Stmt::StoreField { field, .. } => (
                    &mut self.field_loads_of_store,
                    collect(objs.iter().filter_map(|o| field_loads.get(&(*o, *field)))),
                ),
                Stmt::LoadArray { .. } => (
                    &mut self.array_stores_of_load,
                    collect(objs.iter().filter_map(|o| array_stores.get(o))),
                ),
                Stmt::StoreArray { .. } => (
                    &mut self.array_loads_of_store,
                    collect(objs.iter().filter_map(|o| array_loads.get(o))),
                ),
                _ => continue,
            };
            if !others.is_empty() {
                index.insert(stmt_ref, others);
            }
        }
    }

    fn aliases<'a>(map: &'a FxHashMap<StmtRef, Vec<StmtRef>>, stmt: StmtRef) -> &'a [StmtRef] {
        map.get(&stmt).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Meet of the stored values reaching `x = a.f` / `x = A.f`
    fn load_field_value(
        &self,
        stmt_ref: StmtRef,
        base: Option<VarId>,
        field: FieldId,
        ctx: &InterSolverContext<'_, CPFact>,
    ) -> Value {
        let stores = match base {
            None => self.program.static_field_stores(field),
            Some(_) => Self::aliases(&self.field_stores_of_load, stmt_ref),
        };
        stores.iter().fold(Value::Undef, |acc, &store| {
            match (self.program.stmt(store), ctx.out_fact(Node::from(store))) {
                (Stmt::StoreField { rhs, .. }, Some(fact)) => acc.meet(fact.get(*rhs)),
                _ => acc,
            }
        })
    }

    /// Meet of the stored values reaching `x = a[i]` with `i` valued `index`
    fn load_array_value(
        &self,
        stmt_ref: StmtRef,
        index: Value,
        ctx: &InterSolverContext<'_, CPFact>,
    ) -> Value {
        Self::aliases(&self.array_stores_of_load, stmt_ref)
            .iter()
            .fold(Value::Undef, |acc, &store| {
                match (self.program.stmt(store), ctx.out_fact(Node::from(store))) {
                    (
                        Stmt::StoreArray {
                            index: store_index,
                            rhs,
                            ..
                        },
                        Some(fact),
                    ) if index_may_alias(index, fact.get(*store_index)) => {
                        acc.meet(fact.get(*rhs))
                    }
                    _ => acc,
                }
            })
    }

    fn requeue_loads(
        &self,
        stmt_ref: StmtRef,
        stmt: &Stmt,
        fact: &CPFact,
        ctx: &mut InterSolverContext<'_, CPFact>,
    ) {
        match stmt {
            Stmt::StoreField {
                base: None, field, ..
            } => {
                for &load in self.program.static_field_loads(*field) {
                    ctx.requeue(Node::from(load));
                }
            }
            Stmt::StoreField { .. } => {
                for &load in Self::aliases(&self.field_loads_of_store, stmt_ref) {
                    ctx.requeue(Node::from(load));
                }
            }
            Stmt::StoreArray { index, .. } => {
                let stored_at = fact.get(*index);
                for &load in Self::aliases(&self.array_loads_of_store, stmt_ref) {
                    let load_index = match self.program.stmt(load) {
                        Stmt::LoadArray { index, .. } => ctx
                            .in_fact(Node::from(load))
                            .map_or(Value::Undef, |f| f.get(*index)),
                        _ => continue,
                    };
                    if index_may_alias(stored_at, load_index) {
                        ctx.requeue(Node::from(load));
                    }
                }
            }
            _ => {}
        }
    }

    fn tracks(&self, var: VarId) -> bool {
        self.cp.can_hold_int(var)
    }
}

#[derive(Clone, Copy)]
enum AccessKind {
    FieldLoad(FieldId),
    FieldStore(FieldId),
    ArrayLoad,
    ArrayStore,
}

fn collect<'a>(lists: impl Iterator<Item = &'a Vec<StmtRef>>) -> Vec<StmtRef> {
    let mut all: Vec<StmtRef> = lists.flatten().copied().collect();
    all.sort_unstable();
    all.dedup();
    all
}

/// Whether two array index values may denote the same slot
pub fn index_may_alias(a: Value, b: Value) -> bool {
    match (a, b) {
        (Value::Undef, _) | (_, Value::Undef) => false,
        (Value::Constant(x), Value::Constant(y)) => x == y,
        _ => true,
    }
}

impl InterDataflowAnalysis for InterConstantPropagation<'_> {
    type Fact = CPFact;

    fn new_boundary_fact(&self, entry: Node) -> CPFact {
        self.cp.boundary_fact_of(entry.method)
    }

    fn new_initial_fact(&self) -> CPFact {
        CPFact::new()
    }

    fn meet_into(&self, fact: &CPFact, target: &mut CPFact) {
        fact.meet_into(target);
    }

    fn transfer_call_node(
        &self,
        _node: Node,
        input: &CPFact,
        output: &mut CPFact,
        _ctx: &mut InterSolverContext<'_, CPFact>,
    ) -> bool {
        output.copy_from(input)
    }

    fn transfer_non_call_node(
        &self,
        node: Node,
        input: &CPFact,
        output: &mut CPFact,
        ctx: &mut InterSolverContext<'_, CPFact>,
    ) -> bool {
        let Some(stmt_ref) = node.stmt_ref() else {
            return output.copy_from(input);
        };
        let stmt = self.program.stmt(stmt_ref);
        if !self.config.alias_aware {
            return self.cp.transfer_stmt(stmt, input, output);
        }

        match stmt {
            Stmt::LoadField { lhs, base, field } if self.tracks(*lhs) => {
                let value = self.load_field_value(stmt_ref, *base, *field, ctx);
                let mut next = input.clone();
                next.update(*lhs, value);
                output.copy_from(&next)
            }
            Stmt::LoadArray { lhs, index, .. } if self.tracks(*lhs) => {
                let value = self.load_array_value(stmt_ref, input.get(*index), ctx);
                let mut next = input.clone();
                next.update(*lhs, value);
                output.copy_from(&next)
            }
            Stmt::StoreField { .. } | Stmt::StoreArray { .. } => {
                let changed = self.cp.transfer_stmt(stmt, input, output);
                if changed {
                    self.requeue_loads(stmt_ref, stmt, output, ctx);
                }
                changed
            }
            _ => self.cp.transfer_stmt(stmt, input, output),
        }
    }

    fn transfer_normal_edge(&self, _edge: &IcfgEdge, out: &CPFact) -> CPFact {
        out.clone()
    }

    fn transfer_call_to_return_edge(&self, edge: &IcfgEdge, out: &CPFact) -> CPFact {
        let mut fact = out.clone();
        if let Some(result) = edge
            .source
            .stmt_ref()
            .and_then(|s| self.program.stmt(s).as_invoke())
            .and_then(|invoke| invoke.result)
        {
            fact.remove(result);
        }
        fact
    }

    fn transfer_call_edge(&self, edge: &IcfgEdge, call_site_out: &CPFact) -> CPFact {
        let mut fact = CPFact::new();
        let IcfgEdgeKind::Call { call_site, callee } = edge.kind else {
            return fact;
        };
        let Some(invoke) = self.program.stmt(call_site).as_invoke() else {
            return fact;
        };
        for (arg, param) in invoke.args.iter().zip(&self.program.method(callee).params) {
            fact.update(*param, call_site_out.get(*arg));
        }
        fact
    }

    fn transfer_return_edge(&self, edge: &IcfgEdge, return_out: &CPFact) -> CPFact {
        let mut fact = CPFact::new();
        let IcfgEdgeKind::Return { call_site, callee } = edge.kind else {
            return fact;
        };
        let result = self
            .program
            .stmt(call_site)
            .as_invoke()
            .and_then(|invoke| invoke.result);
        if let Some(result) = result.filter(|r| self.tracks(*r)) {
            let value = self
                .program
                .return_vars(callee)
                .iter()
                .fold(Value::Undef, |acc, ret| acc.meet(return_out.get(*ret)));
            fact.update(result, value);
        }
        fact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContextStrategy, PTAConfig};
    use crate::features::points_to::PointerAnalysis;
    use crate::shared::models::{MethodRef, ProgramBuilder, Type};

    #[test]
    fn test_index_may_alias() {
        let (u, n) = (Value::Undef, Value::Nac);
        let (c1, c2) = (Value::Constant(1), Value::Constant(2));
        assert!(index_may_alias(c1, c1));
        assert!(!index_may_alias(c1, c2));
        assert!(index_may_alias(n, c2));
        assert!(index_may_alias(n, n));
        // EDGE CASES: undef index has not been reached yet
        assert!(!index_may_alias(u, n));
        assert!(!index_may_alias(c1, u));
    }

    #[test]
    fn test_constants_through_calls() {
        // inc(p): q = 1; r = p + q; return r
        // main: x = 41; y = inc(x); z = inc(x)
        let mut b = ProgramBuilder::new();
        let cls = b.add_class("A", None);
        let mut inc = b.static_method(cls, "inc", "int inc(int)");
        let p = inc.param("p", Type::Int);
        let q = inc.var("q", Type::Int);
        let r = inc.var("r", Type::Int);
        inc.constant(q, 1);
        inc.binary(r, crate::shared::models::BinaryOp::Add, p, q);
        inc.ret(Some(r));
        inc.finish();
        let mut main = b.static_method(cls, "main", "void main()");
        let x = main.var("x", Type::Int);
        let y = main.var("y", Type::Int);
        main.constant(x, 41);
        main.invoke_static(Some(y), MethodRef::new(cls, "int inc(int)"), &[x]);
        let last = main.ret(None);
        let main = main.finish();
        b.add_entry(main);
        let program = b.build().unwrap();

        let config = PTAConfig::default().context(ContextStrategy::Insensitive);
        let pta = PointerAnalysis::run(&program, &config).unwrap();
        let result =
            InterConstantPropagation::new(&program, &pta, DataflowConfig::default()).analyze();

        let fact = result.get_in_fact(Node::stmt(main, last)).unwrap();
        assert_eq!(fact.get(y), Value::Constant(42));
        assert_eq!(fact.get(x), Value::Constant(41));
    }

    #[test]
    fn test_static_field_flow() {
        // main: c = 7; A.s = c; v = A.s
        let mut b = ProgramBuilder::new();
        let cls = b.add_class("A", None);
        let s = b.add_field(cls, "s", Type::Int, true);
        let mut main = b.static_method(cls, "main", "void main()");
        let c = main.var("c", Type::Int);
        let v = main.var("v", Type::Int);
        main.constant(c, 7);
        main.store_static(s, c);
        main.load_static(v, s);
        let last = main.ret(None);
        let main = main.finish();
        b.add_entry(main);
        let program = b.build().unwrap();

        let pta = PointerAnalysis::run(&program, &PTAConfig::default()).unwrap();
        let aware =
            InterConstantPropagation::new(&program, &pta, DataflowConfig::default()).analyze();
        assert_eq!(
            aware.get_in_fact(Node::stmt(main, last)).unwrap().get(v),
            Value::Constant(7)
        );

        // EDGE CASES: without alias modelling loads are NAC
        let blind = InterConstantPropagation::new(
            &program,
            &pta,
            DataflowConfig::default().alias_aware(false),
        )
        .analyze();
        assert_eq!(
            blind.get_in_fact(Node::stmt(main, last)).unwrap().get(v),
            Value::Nac
        );
    }
}
