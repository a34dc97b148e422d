//! Fluent construction of [`Program`]s
//!
//! Handles are allocated eagerly so statements can refer to classes, fields
//! and variables declared earlier. Methods are referred to at call sites
//! through [`MethodRef`]s, so a call may name a method that is declared later.
//!
//! ```ignore
//! let mut b = ProgramBuilder::new();
//! let a = b.add_class("A", None);
//! let mut main = b.static_method(a, "main", "void main()");
//! let x = main.var("x", Type::Class(a));
//! main.new_obj(x, Type::Class(a));
//! let main = main.finish();
//! b.add_entry(main);
//! let program = b.build()?;
//! ```

use super::ir::{
    BinaryOp, CallKind, Class, ClassId, Exp, Field, FieldId, Invoke, Method, MethodId, MethodRef,
    Program, ProgramData, Stmt, Subsignature, Type, Var, VarId,
};
use crate::errors::Result;

/// Builder for a whole program
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    data: ProgramData,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_class(
        &mut self,
        name: &str,
        super_class: Option<ClassId>,
        interfaces: Vec<ClassId>,
        is_interface: bool,
        is_abstract: bool,
    ) -> ClassId {
        let id = ClassId::from_index(self.data.classes.len());
        self.data.classes.push(Class {
            id,
            name: name.to_string(),
            super_class,
            interfaces,
            is_interface,
            is_abstract,
            methods: Vec::new(),
        });
        id
    }

    /// Add a concrete class
    pub fn add_class(&mut self, name: &str, super_class: Option<ClassId>) -> ClassId {
        self.push_class(name, super_class, Vec::new(), false, false)
    }

    pub fn add_abstract_class(&mut self, name: &str, super_class: Option<ClassId>) -> ClassId {
        self.push_class(name, super_class, Vec::new(), false, true)
    }

    /// Add an interface extending `extends`
    pub fn add_interface(&mut self, name: &str, extends: &[ClassId]) -> ClassId {
        self.push_class(name, None, extends.to_vec(), true, true)
    }

    /// Declare that `class` implements `iface`
    pub fn implement(&mut self, class: ClassId, iface: ClassId) {
        let interfaces = &mut self.data.classes[class.index()].interfaces;
        if !interfaces.contains(&iface) {
            interfaces.push(iface);
        }
    }

    pub fn add_field(&mut self, class: ClassId, name: &str, ty: Type, is_static: bool) -> FieldId {
        let id = FieldId::from_index(self.data.fields.len());
        self.data.fields.push(Field {
            id,
            name: name.to_string(),
            declaring_class: class,
            ty,
            is_static,
        });
        id
    }

    fn push_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
        is_static: bool,
        is_abstract: bool,
    ) -> MethodBuilder<'_> {
        let id = MethodId::from_index(self.data.methods.len());
        self.data.methods.push(Method {
            id,
            name: name.to_string(),
            declaring_class: class,
            subsignature: Subsignature::new(subsignature),
            is_static,
            is_abstract,
            this: None,
            params: Vec::new(),
            stmts: Vec::new(),
        });
        self.data.classes[class.index()].methods.push(id);

        let mut method = MethodBuilder { builder: self, id };
        if !is_static {
            let this = method.var("this", Type::Class(class));
            method.method_mut().this = Some(this);
        }
        method
    }

    /// Start an instance method; `this` is created automatically
    pub fn method(&mut self, class: ClassId, name: &str, subsignature: &str) -> MethodBuilder<'_> {
        self.push_method(class, name, subsignature, false, false)
    }

    pub fn static_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
    ) -> MethodBuilder<'_> {
        self.push_method(class, name, subsignature, true, false)
    }

    /// Start an abstract instance method (no body)
    pub fn abstract_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
    ) -> MethodBuilder<'_> {
        self.push_method(class, name, subsignature, false, true)
    }

    pub fn add_entry(&mut self, method: MethodId) {
        if !self.data.entry_methods.contains(&method) {
            self.data.entry_methods.push(method);
        }
    }

    /// Validate and index the program
    pub fn build(self) -> Result<Program> {
        Program::from_data(self.data)
    }
}

/// Builder for one method body, borrowed from its [`ProgramBuilder`]
pub struct MethodBuilder<'b> {
    builder: &'b mut ProgramBuilder,
    id: MethodId,
}

impl<'b> MethodBuilder<'b> {
    fn method_mut(&mut self) -> &mut Method {
        &mut self.builder.data.methods[self.id.index()]
    }

    pub fn id(&self) -> MethodId {
        self.id
    }

    /// `this` of an instance method
    pub fn this(&self) -> Option<VarId> {
        self.builder.data.methods[self.id.index()].this
    }

    /// Declare a local variable
    pub fn var(&mut self, name: &str, ty: Type) -> VarId {
        let id = VarId::from_index(self.builder.data.vars.len());
        self.builder.data.vars.push(Var {
            id,
            name: name.to_string(),
            ty,
            method: self.id,
        });
        id
    }

    /// Declare the next formal parameter
    pub fn param(&mut self, name: &str, ty: Type) -> VarId {
        let var = self.var(name, ty);
        self.method_mut().params.push(var);
        var
    }

    /// Index the next pushed statement will get
    pub fn next_index(&self) -> usize {
        self.builder.data.methods[self.id.index()].stmts.len()
    }

    /// Append a statement, returning its index
    pub fn push(&mut self, stmt: Stmt) -> usize {
        let index = self.next_index();
        self.method_mut().stmts.push(stmt);
        index
    }

    /// Patch the target of a previously pushed branch
    pub fn set_target(&mut self, index: usize, new_target: usize) {
        match &mut self.method_mut().stmts[index] {
            Stmt::If { target, .. } | Stmt::Goto { target } => *target = new_target,
            _ => {}
        }
    }

    pub fn new_obj(&mut self, lhs: VarId, ty: Type) -> usize {
        self.push(Stmt::New { lhs, ty })
    }

    pub fn copy(&mut self, lhs: VarId, rhs: VarId) -> usize {
        self.push(Stmt::Copy { lhs, rhs })
    }

    pub fn assign(&mut self, lhs: VarId, rhs: Exp) -> usize {
        self.push(Stmt::Assign { lhs, rhs })
    }

    /// `lhs = value`
    pub fn constant(&mut self, lhs: VarId, value: i32) -> usize {
        self.assign(lhs, Exp::IntLiteral(value))
    }

    /// `lhs = a op b`
    pub fn binary(&mut self, lhs: VarId, op: BinaryOp, a: VarId, b: VarId) -> usize {
        self.assign(lhs, Exp::Binary { op, lhs: a, rhs: b })
    }

    pub fn load_field(&mut self, lhs: VarId, base: VarId, field: FieldId) -> usize {
        self.push(Stmt::LoadField {
            lhs,
            base: Some(base),
            field,
        })
    }

    pub fn store_field(&mut self, base: VarId, field: FieldId, rhs: VarId) -> usize {
        self.push(Stmt::StoreField {
            base: Some(base),
            field,
            rhs,
        })
    }

    pub fn load_static(&mut self, lhs: VarId, field: FieldId) -> usize {
        self.push(Stmt::LoadField {
            lhs,
            base: None,
            field,
        })
    }

    pub fn store_static(&mut self, field: FieldId, rhs: VarId) -> usize {
        self.push(Stmt::StoreField {
            base: None,
            field,
            rhs,
        })
    }

    pub fn load_array(&mut self, lhs: VarId, base: VarId, index: VarId) -> usize {
        self.push(Stmt::LoadArray { lhs, base, index })
    }

    pub fn store_array(&mut self, base: VarId, index: VarId, rhs: VarId) -> usize {
        self.push(Stmt::StoreArray { base, index, rhs })
    }

    pub fn invoke(
        &mut self,
        kind: CallKind,
        result: Option<VarId>,
        base: Option<VarId>,
        method_ref: MethodRef,
        args: &[VarId],
    ) -> usize {
        self.push(Stmt::Invoke(Invoke {
            kind,
            method_ref,
            base,
            args: args.to_vec(),
            result,
        }))
    }

    pub fn invoke_static(
        &mut self,
        result: Option<VarId>,
        method_ref: MethodRef,
        args: &[VarId],
    ) -> usize {
        self.invoke(CallKind::Static, result, None, method_ref, args)
    }

    pub fn invoke_virtual(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        method_ref: MethodRef,
        args: &[VarId],
    ) -> usize {
        self.invoke(CallKind::Virtual, result, Some(base), method_ref, args)
    }

    pub fn invoke_interface(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        method_ref: MethodRef,
        args: &[VarId],
    ) -> usize {
        self.invoke(CallKind::Interface, result, Some(base), method_ref, args)
    }

    pub fn invoke_special(
        &mut self,
        result: Option<VarId>,
        base: VarId,
        method_ref: MethodRef,
        args: &[VarId],
    ) -> usize {
        self.invoke(CallKind::Special, result, Some(base), method_ref, args)
    }

    /// `if (condition) goto target`
    pub fn if_goto(&mut self, condition: Exp, target: usize) -> usize {
        self.push(Stmt::If { condition, target })
    }

    pub fn goto(&mut self, target: usize) -> usize {
        self.push(Stmt::Goto { target })
    }

    pub fn switch(&mut self, var: VarId, cases: &[(i32, usize)], default: usize) -> usize {
        self.push(Stmt::Switch {
            var,
            cases: cases.to_vec(),
            default,
        })
    }

    pub fn ret(&mut self, value: Option<VarId>) -> usize {
        self.push(Stmt::Return { value })
    }

    pub fn nop(&mut self) -> usize {
        self.push(Stmt::Nop)
    }

    /// Finish the body and hand back the method handle
    pub fn finish(self) -> MethodId {
        self.id
    }
}
