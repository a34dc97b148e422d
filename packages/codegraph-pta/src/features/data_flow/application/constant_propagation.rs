//! Intraprocedural constant propagation
//!
//! Forward must analysis over `int`-like variables (boolean, byte, short,
//! char, int). Arithmetic follows 32-bit two's complement: overflow wraps,
//! shift counts use their low 5 bits, and a zero divisor makes `/` and `%`
//! UNDEF. Any other definition of a tracked variable (field/array loads,
//! call results) is NAC.

use crate::features::data_flow::domain::{CPFact, DataflowResult, Value};
use crate::features::data_flow::infrastructure::{DataflowAnalysis, WorklistSolver};
use crate::shared::models::{BinaryOp, Cfg, Exp, MethodId, Node, Program, Stmt, VarId};

pub struct ConstantPropagation<'p> {
    program: &'p Program,
}

impl<'p> ConstantPropagation<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    pub fn analyze(&self, method: MethodId) -> DataflowResult<Node, CPFact> {
        let cfg = Cfg::build(self.program, method);
        WorklistSolver::solve(self, &cfg)
    }

    #[inline]
    pub fn can_hold_int(&self, var: VarId) -> bool {
        self.program.var(var).ty.can_hold_int()
    }

    /// Parameters of `method` that can hold an int start as NAC
    pub(crate) fn boundary_fact_of(&self, method: MethodId) -> CPFact {
        let mut fact = CPFact::new();
        for &param in &self.program.method(method).params {
            if self.can_hold_int(param) {
                fact.update(param, Value::Nac);
            }
        }
        fact
    }

    /// Statement transfer shared with the interprocedural analysis
    pub(crate) fn transfer_stmt(&self, stmt: &Stmt, input: &CPFact, output: &mut CPFact) -> bool {
        let mut next = input.clone();
        if let Some(lhs) = stmt.def() {
            if self.can_hold_int(lhs) {
                let value = match stmt {
                    Stmt::Assign { rhs, .. } => evaluate(rhs, input),
                    Stmt::Copy { rhs, .. } => input.get(*rhs),
                    _ => Value::Nac,
                };
                next.update(lhs, value);
            }
        }
        output.copy_from(&next)
    }
}

impl DataflowAnalysis for ConstantPropagation<'_> {
    type Fact = CPFact;

    fn is_forward(&self) -> bool {
        true
    }

    fn new_boundary_fact(&self, cfg: &Cfg) -> CPFact {
        self.boundary_fact_of(cfg.method())
    }

    fn new_initial_fact(&self) -> CPFact {
        CPFact::new()
    }

    fn meet_into(&self, fact: &CPFact, target: &mut CPFact) {
        fact.meet_into(target);
    }

    fn transfer_node(&self, node: Node, input: &CPFact, output: &mut CPFact) -> bool {
        match node.stmt_ref() {
            Some(stmt_ref) => self.transfer_stmt(self.program.stmt(stmt_ref), input, output),
            None => output.copy_from(input),
        }
    }
}

/// Value of `exp` under `fact`
pub fn evaluate(exp: &Exp, fact: &CPFact) -> Value {
    match exp {
        Exp::IntLiteral(c) => Value::Constant(*c),
        Exp::Var(var) => fact.get(*var),
        Exp::Binary { op, lhs, rhs } => {
            let (a, b) = (fact.get(*lhs), fact.get(*rhs));
            if op.may_throw() && b == Value::Constant(0) {
                return Value::Undef;
            }
            match (a, b) {
                (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
                (Value::Constant(a), Value::Constant(b)) => {
                    fold(*op, a, b).map_or(Value::Undef, Value::Constant)
                }
                _ => Value::Undef,
            }
        }
    }
}

fn fold(op: BinaryOp, a: i32, b: i32) -> Option<i32> {
    let value = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return None,
        BinaryOp::Div => a.wrapping_div(b),
        BinaryOp::Rem => a.wrapping_rem(b),
        BinaryOp::Eq => (a == b) as i32,
        BinaryOp::Ne => (a != b) as i32,
        BinaryOp::Lt => (a < b) as i32,
        BinaryOp::Le => (a <= b) as i32,
        BinaryOp::Gt => (a > b) as i32,
        BinaryOp::Ge => (a >= b) as i32,
        BinaryOp::Shl => a.wrapping_shl(b as u32),
        BinaryOp::Shr => a.wrapping_shr(b as u32),
        BinaryOp::Ushr => (a as u32).wrapping_shr(b as u32) as i32,
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
    };
    Some(value)
}
