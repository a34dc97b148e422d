//! Shared models
//!
//! - `ir`: classes, methods, fields, variables and statements
//! - `program_builder`: fluent construction of a [`Program`]
//! - `cfg`: statement-level control flow graph per method

pub mod cfg;
pub mod ir;
pub mod program_builder;

pub use cfg::{Cfg, CfgEdgeKind, Node, Point};
pub use ir::{
    BinaryOp, CallKind, Class, ClassId, Exp, Field, FieldId, Invoke, Method, MethodId, MethodRef,
    Program, ProgramData, Stmt, StmtRef, Subsignature, Type, Var, VarId, VarUses,
};
pub use program_builder::{MethodBuilder, ProgramBuilder};
