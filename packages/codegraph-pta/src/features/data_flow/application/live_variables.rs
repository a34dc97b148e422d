//! Live variable analysis
//!
//! Backward may analysis: a variable is live at a point when some path from
//! that point reads it before redefining it. The OUT fact of a statement is
//! the set live right after it.

use crate::features::data_flow::domain::{DataflowResult, SetFact};
use crate::features::data_flow::infrastructure::{DataflowAnalysis, WorklistSolver};
use crate::shared::models::{Cfg, MethodId, Node, Program, VarId};

pub struct LiveVariableAnalysis<'p> {
    program: &'p Program,
}

impl<'p> LiveVariableAnalysis<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    pub fn analyze(&self, method: MethodId) -> DataflowResult<Node, SetFact<VarId>> {
        let cfg = Cfg::build(self.program, method);
        WorklistSolver::solve(self, &cfg)
    }
}

impl DataflowAnalysis for LiveVariableAnalysis<'_> {
    type Fact = SetFact<VarId>;

    fn is_forward(&self) -> bool {
        false
    }

    fn new_boundary_fact(&self, _cfg: &Cfg) -> Self::Fact {
        SetFact::new()
    }

    fn new_initial_fact(&self) -> Self::Fact {
        SetFact::new()
    }

    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact) {
        target.union(fact);
    }

    /// IN = uses ∪ (OUT − def)
    fn transfer_node(&self, node: Node, live_out: &Self::Fact, live_in: &mut Self::Fact) -> bool {
        let mut next = live_out.clone();
        if let Some(stmt_ref) = node.stmt_ref() {
            let stmt = self.program.stmt(stmt_ref);
            if let Some(def) = stmt.def() {
                next.remove(&def);
            }
            for var in stmt.uses() {
                next.add(var);
            }
        }
        live_in.set(&next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{BinaryOp, Exp, ProgramBuilder, Type};

    #[test]
    fn test_liveness_straight_line() {
        // 0: a = 1; 1: b = 2; 2: c = a + a; 3: b = c; 4: return b
        let mut bld = ProgramBuilder::new();
        let cls = bld.add_class("A", None);
        let mut m = bld.static_method(cls, "f", "int f()");
        let a = m.var("a", Type::Int);
        let b = m.var("b", Type::Int);
        let c = m.var("c", Type::Int);
        m.constant(a, 1);
        m.constant(b, 2);
        m.binary(c, BinaryOp::Add, a, a);
        m.copy(b, c);
        m.ret(Some(b));
        let m = m.finish();
        bld.add_entry(m);
        let program = bld.build().unwrap();

        let result = LiveVariableAnalysis::new(&program).analyze(m);
        let after = |i: usize| result.get_out_fact(Node::stmt(m, i)).unwrap().clone();

        assert!(after(0).contains(&a));
        // b = 2 is overwritten before any read
        assert!(!after(1).contains(&b));
        assert!(after(2).contains(&c) && !after(2).contains(&a));
        assert!(after(3).contains(&b));
        assert!(after(4).is_empty());
    }

    #[test]
    fn test_liveness_loop() {
        // 0: i = 0; 1: if i goto 0; 2: return
        let mut bld = ProgramBuilder::new();
        let cls = bld.add_class("A", None);
        let mut m = bld.static_method(cls, "f", "void f()");
        let i = m.var("i", Type::Int);
        m.constant(i, 0);
        m.if_goto(Exp::Var(i), 0);
        m.ret(None);
        let m = m.finish();
        bld.add_entry(m);
        let program = bld.build().unwrap();

        let result = LiveVariableAnalysis::new(&program).analyze(m);
        assert!(result.get_out_fact(Node::stmt(m, 0)).unwrap().contains(&i));
        assert!(result.get_in_fact(Node::stmt(m, 1)).unwrap().contains(&i));
        assert!(!result.get_in_fact(Node::stmt(m, 0)).unwrap().contains(&i));
    }
}
