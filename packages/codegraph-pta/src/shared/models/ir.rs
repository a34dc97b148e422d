//! Object-oriented IR consumed by the analyses
//!
//! A closed three-address form: every statement is one variant of [`Stmt`],
//! operands are method-local variables, and classes, methods, fields and
//! variables live in arenas owned by [`Program`] and are referred to by
//! lightweight handles.
//!
//! ```text
//! x = new A          Stmt::New
//! y = x              Stmt::Copy
//! n = a + b          Stmt::Assign { rhs: Exp::Binary }
//! z = x.f / A.f      Stmt::LoadField (base None = static)
//! x.f = y / A.f = y  Stmt::StoreField
//! z = a[i]           Stmt::LoadArray
//! a[i] = y           Stmt::StoreArray
//! r = x.m(a, b)      Stmt::Invoke
//! ```

use crate::errors::{PtaError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id!(
    /// Class or interface handle
    ClassId,
    "class#"
);
crate::define_id!(
    /// Method handle
    MethodId,
    "method#"
);
crate::define_id!(
    /// Field handle (static or instance)
    FieldId,
    "field#"
);
crate::define_id!(
    /// Local variable handle, unique across the whole program
    VarId,
    "var#"
);

/// Value types of the IR
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Class(ClassId),
    Array(Box<Type>),
}

impl Type {
    /// Whether a variable of this type is tracked by integer constant propagation
    #[inline]
    pub fn can_hold_int(&self) -> bool {
        matches!(
            self,
            Type::Boolean | Type::Byte | Type::Short | Type::Char | Type::Int
        )
    }

    /// Class to dispatch from, if this is a class type
    #[inline]
    pub fn class(&self) -> Option<ClassId> {
        match self {
            Type::Class(class) => Some(*class),
            _ => None,
        }
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Array(_))
    }

    pub fn array_of(element: Type) -> Type {
        Type::Array(Box::new(element))
    }
}

/// Method name plus descriptor, e.g. `"int foo(int,A)"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subsignature(String);

impl Subsignature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subsignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Symbolic reference to a method as written at a call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub declaring_class: ClassId,
    pub subsignature: Subsignature,
}

impl MethodRef {
    pub fn new(declaring_class: ClassId, subsignature: impl Into<String>) -> Self {
        Self {
            declaring_class,
            subsignature: Subsignature::new(subsignature),
        }
    }
}

/// Declared kind of a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallKind {
    /// `invokestatic`: no receiver
    Static,
    /// Constructors, private methods and `super` calls
    Special,
    /// Dispatch on a class-typed receiver
    Virtual,
    /// Dispatch on an interface-typed receiver
    Interface,
}

impl CallKind {
    /// Kind of a call site
    #[inline]
    pub fn of(invoke: &Invoke) -> Self {
        invoke.kind
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Static => "STATIC",
            CallKind::Special => "SPECIAL",
            CallKind::Virtual => "VIRTUAL",
            CallKind::Interface => "INTERFACE",
        }
    }
}

/// A call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invoke {
    pub kind: CallKind,
    pub method_ref: MethodRef,
    /// Receiver variable; `None` for static calls
    pub base: Option<VarId>,
    pub args: Vec<VarId>,
    /// Variable receiving the return value, if any
    pub result: Option<VarId>,
}

impl Invoke {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind == CallKind::Static
    }
}

/// Binary operators over `int`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Condition (yield 0/1)
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Shift
    Shl,
    Shr,
    Ushr,
    // Bitwise
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// `/` and `%` may raise on a zero divisor
    #[inline]
    pub fn may_throw(&self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::Rem)
    }

    #[inline]
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

/// Right-hand side expressions of [`Stmt::Assign`] and conditions of [`Stmt::If`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exp {
    IntLiteral(i32),
    Var(VarId),
    Binary { op: BinaryOp, lhs: VarId, rhs: VarId },
}

impl Exp {
    pub fn uses(&self) -> Vec<VarId> {
        match self {
            Exp::IntLiteral(_) => Vec::new(),
            Exp::Var(var) => vec![*var],
            Exp::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
        }
    }
}

/// IR statement. Branch targets are indices into the owning method's statement list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    /// `lhs = new ty`
    New { lhs: VarId, ty: Type },
    /// `lhs = rhs` between reference or primitive variables
    Copy { lhs: VarId, rhs: VarId },
    /// `lhs = <exp>` over integers
    Assign { lhs: VarId, rhs: Exp },
    /// `lhs = base.field`, or `lhs = C.field` when `base` is `None`
    LoadField {
        lhs: VarId,
        base: Option<VarId>,
        field: FieldId,
    },
    /// `base.field = rhs`, or `C.field = rhs` when `base` is `None`
    StoreField {
        base: Option<VarId>,
        field: FieldId,
        rhs: VarId,
    },
    /// `lhs = base[index]`
    LoadArray { lhs: VarId, base: VarId, index: VarId },
    /// `base[index] = rhs`
    StoreArray { base: VarId, index: VarId, rhs: VarId },
    Invoke(Invoke),
    /// `if (condition) goto target`
    If { condition: Exp, target: usize },
    Goto { target: usize },
    Switch {
        var: VarId,
        cases: Vec<(i32, usize)>,
        default: usize,
    },
    Return { value: Option<VarId> },
    Nop,
}

impl Stmt {
    /// Variable defined by this statement
    pub fn def(&self) -> Option<VarId> {
        match self {
            Stmt::New { lhs, .. }
            | Stmt::Copy { lhs, .. }
            | Stmt::Assign { lhs, .. }
            | Stmt::LoadField { lhs, .. }
            | Stmt::LoadArray { lhs, .. } => Some(*lhs),
            Stmt::Invoke(invoke) => invoke.result,
            _ => None,
        }
    }

    /// Variables read by this statement
    pub fn uses(&self) -> Vec<VarId> {
        match self {
            Stmt::New { .. } | Stmt::Goto { .. } | Stmt::Nop => Vec::new(),
            Stmt::Copy { rhs, .. } => vec![*rhs],
            Stmt::Assign { rhs, .. } => rhs.uses(),
            Stmt::LoadField { base, .. } => base.iter().copied().collect(),
            Stmt::StoreField { base, rhs, .. } => {
                base.iter().copied().chain(std::iter::once(*rhs)).collect()
            }
            Stmt::LoadArray { base, index, .. } => vec![*base, *index],
            Stmt::StoreArray { base, index, rhs } => vec![*base, *index, *rhs],
            Stmt::Invoke(invoke) => invoke
                .base
                .iter()
                .chain(invoke.args.iter())
                .copied()
                .collect(),
            Stmt::If { condition, .. } => condition.uses(),
            Stmt::Switch { var, .. } => vec![*var],
            Stmt::Return { value } => value.iter().copied().collect(),
        }
    }

    #[inline]
    pub fn as_invoke(&self) -> Option<&Invoke> {
        match self {
            Stmt::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }

    #[inline]
    pub fn is_invoke(&self) -> bool {
        matches!(self, Stmt::Invoke(_))
    }
}

/// Global reference to a statement: owning method + position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StmtRef {
    pub method: MethodId,
    pub index: u32,
}

impl StmtRef {
    #[inline]
    pub fn new(method: MethodId, index: usize) -> Self {
        Self {
            method,
            index: index as u32,
        }
    }
}

impl fmt::Display for StmtRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.method, self.index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub super_class: Option<ClassId>,
    /// Implemented interfaces (for classes) or extended interfaces (for interfaces)
    pub interfaces: Vec<ClassId>,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub methods: Vec<MethodId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub declaring_class: ClassId,
    pub ty: Type,
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    pub id: VarId,
    pub name: String,
    pub ty: Type,
    pub method: MethodId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub id: MethodId,
    pub name: String,
    pub declaring_class: ClassId,
    pub subsignature: Subsignature,
    pub is_static: bool,
    pub is_abstract: bool,
    /// `this` variable of instance methods
    pub this: Option<VarId>,
    pub params: Vec<VarId>,
    pub stmts: Vec<Stmt>,
}

impl Method {
    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Statements paired with their global references
    pub fn stmt_refs(&self) -> impl Iterator<Item = (StmtRef, &Stmt)> + '_ {
        let id = self.id;
        self.stmts
            .iter()
            .enumerate()
            .map(move |(i, stmt)| (StmtRef::new(id, i), stmt))
    }
}

/// Statements whose base is a given variable, grouped by kind
#[derive(Debug, Clone, Default)]
pub struct VarUses {
    /// `x = v.f`
    pub load_fields: Vec<StmtRef>,
    /// `v.f = y`
    pub store_fields: Vec<StmtRef>,
    /// `x = v[i]`
    pub load_arrays: Vec<StmtRef>,
    /// `v[i] = y`
    pub store_arrays: Vec<StmtRef>,
    /// `v.m(...)`
    pub invokes: Vec<StmtRef>,
}

static NO_USES: VarUses = VarUses {
    load_fields: Vec::new(),
    store_fields: Vec::new(),
    load_arrays: Vec::new(),
    store_arrays: Vec::new(),
    invokes: Vec::new(),
};

/// Lookup tables derived from the arenas
#[derive(Debug, Clone, Default)]
struct ProgramIndex {
    subclasses: FxHashMap<ClassId, Vec<ClassId>>,
    subinterfaces: FxHashMap<ClassId, Vec<ClassId>>,
    implementors: FxHashMap<ClassId, Vec<ClassId>>,
    declared_methods: FxHashMap<(ClassId, Subsignature), MethodId>,
    var_uses: FxHashMap<VarId, VarUses>,
    return_vars: Vec<Vec<VarId>>,
    static_loads: FxHashMap<FieldId, Vec<StmtRef>>,
    static_stores: FxHashMap<FieldId, Vec<StmtRef>>,
}

/// Raw arenas, the serialized form of a [`Program`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramData {
    pub classes: Vec<Class>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub vars: Vec<Var>,
    pub entry_methods: Vec<MethodId>,
}

/// A validated, indexed whole program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProgramData", into = "ProgramData")]
pub struct Program {
    data: ProgramData,
    index: ProgramIndex,
}

static NO_REFS: Vec<StmtRef> = Vec::new();
static NO_CLASSES: Vec<ClassId> = Vec::new();

impl Program {
    /// Validate the arenas and build lookup tables
    pub fn from_data(data: ProgramData) -> Result<Self> {
        validate(&data)?;
        let index = build_index(&data);
        Ok(Self { data, index })
    }

    /// Load a program from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let data: ProgramData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &ProgramData {
        &self.data
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.data.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.data.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.data.fields[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Var {
        &self.data.vars[id.index()]
    }

    #[inline]
    pub fn stmt(&self, stmt: StmtRef) -> &Stmt {
        &self.method(stmt.method).stmts[stmt.index as usize]
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.data.classes.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.data.methods.iter()
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.data.vars.iter()
    }

    pub fn entry_methods(&self) -> &[MethodId] {
        &self.data.entry_methods
    }

    /// Look up a class by name (first match)
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.data.classes.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Look up a method by `Class.name` (first match)
    pub fn method_by_name(&self, class_name: &str, method_name: &str) -> Option<MethodId> {
        let class = self.class_by_name(class_name)?;
        self.class(class)
            .methods
            .iter()
            .copied()
            .find(|m| self.method(*m).name == method_name)
    }

    /// Look up a variable by method and name
    pub fn var_by_name(&self, method: MethodId, name: &str) -> Option<VarId> {
        self.data
            .vars
            .iter()
            .find(|v| v.method == method && v.name == name)
            .map(|v| v.id)
    }

    /// Statements using `var` as their base
    pub fn var_uses(&self, var: VarId) -> &VarUses {
        self.index.var_uses.get(&var).unwrap_or(&NO_USES)
    }

    /// Variables returned by `return v` statements of a method
    pub fn return_vars(&self, method: MethodId) -> &[VarId] {
        &self.index.return_vars[method.index()]
    }

    pub fn static_field_loads(&self, field: FieldId) -> &[StmtRef] {
        self.index.static_loads.get(&field).unwrap_or(&NO_REFS)
    }

    pub fn static_field_stores(&self, field: FieldId) -> &[StmtRef] {
        self.index.static_stores.get(&field).unwrap_or(&NO_REFS)
    }

    /// Call sites of a method
    pub fn call_sites_in(&self, method: MethodId) -> impl Iterator<Item = (StmtRef, &Invoke)> + '_ {
        self.method(method)
            .stmt_refs()
            .filter_map(|(stmt_ref, stmt)| stmt.as_invoke().map(|invoke| (stmt_ref, invoke)))
    }

    pub(crate) fn subclasses(&self, class: ClassId) -> &[ClassId] {
        self.index.subclasses.get(&class).unwrap_or(&NO_CLASSES)
    }

    pub(crate) fn subinterfaces(&self, class: ClassId) -> &[ClassId] {
        self.index.subinterfaces.get(&class).unwrap_or(&NO_CLASSES)
    }

    pub(crate) fn implementors(&self, class: ClassId) -> &[ClassId] {
        self.index.implementors.get(&class).unwrap_or(&NO_CLASSES)
    }

    pub(crate) fn declared_method_by_subsig(
        &self,
        class: ClassId,
        subsignature: &Subsignature,
    ) -> Option<MethodId> {
        self.index
            .declared_methods
            .get(&(class, subsignature.clone()))
            .copied()
    }
}

impl TryFrom<ProgramData> for Program {
    type Error = PtaError;

    fn try_from(data: ProgramData) -> Result<Self> {
        Program::from_data(data)
    }
}

impl From<Program> for ProgramData {
    fn from(program: Program) -> Self {
        program.data
    }
}

fn validate(data: &ProgramData) -> Result<()> {
    let class_ok = |c: ClassId| c.index() < data.classes.len();
    let method_ok = |m: MethodId| m.index() < data.methods.len();
    let field_ok = |f: FieldId| f.index() < data.fields.len();
    let var_ok = |v: VarId| v.index() < data.vars.len();

    if data.entry_methods.is_empty() {
        return Err(PtaError::invalid_program("no entry method"));
    }
    for entry in &data.entry_methods {
        if !method_ok(*entry) {
            return Err(PtaError::invalid_program(format!("unknown entry {}", entry)));
        }
    }

    for (i, class) in data.classes.iter().enumerate() {
        if class.id.index() != i {
            return Err(PtaError::invalid_program(format!(
                "class '{}' stored at {} has id {}",
                class.name, i, class.id
            )));
        }
        let refs = class.super_class.iter().chain(class.interfaces.iter());
        if let Some(bad) = refs.copied().find(|c| !class_ok(*c)) {
            return Err(PtaError::invalid_program(format!(
                "class '{}' references unknown {}",
                class.name, bad
            )));
        }
        if let Some(bad) = class.methods.iter().copied().find(|m| !method_ok(*m)) {
            return Err(PtaError::invalid_program(format!(
                "class '{}' declares unknown {}",
                class.name, bad
            )));
        }
    }

    for class in &data.classes {
        // Any chain longer than the class count revisits a class
        let mut current = class.super_class;
        let mut depth = 0;
        while let Some(super_class) = current {
            if super_class == class.id || depth > data.classes.len() {
                return Err(PtaError::invalid_program(format!(
                    "class '{}' has a cyclic superclass chain",
                    class.name
                )));
            }
            depth += 1;
            current = data.classes[super_class.index()].super_class;
        }
    }

    let type_ok = |ty: &Type| type_classes_in(ty, data.classes.len());

    for (i, field) in data.fields.iter().enumerate() {
        if field.id.index() != i || !class_ok(field.declaring_class) || !type_ok(&field.ty) {
            return Err(PtaError::invalid_program(format!("malformed field '{}'", field.name)));
        }
    }

    for (i, var) in data.vars.iter().enumerate() {
        if var.id.index() != i || !method_ok(var.method) || !type_ok(&var.ty) {
            return Err(PtaError::invalid_program(format!("malformed variable '{}'", var.name)));
        }
    }

    for (i, method) in data.methods.iter().enumerate() {
        if method.id.index() != i || !class_ok(method.declaring_class) {
            return Err(PtaError::invalid_program(format!(
                "malformed method '{}'",
                method.name
            )));
        }
        let len = method.stmts.len();
        let locals = method.this.iter().chain(method.params.iter());
        if let Some(bad) = locals.copied().find(|v| !var_ok(*v)) {
            return Err(PtaError::invalid_program(format!(
                "method '{}' binds unknown {}",
                method.name, bad
            )));
        }
        for (index, stmt) in method.stmts.iter().enumerate() {
            let at = || format!("'{}' stmt {}", method.name, index);
            let vars = stmt.uses().into_iter().chain(stmt.def());
            if let Some(bad) = vars.into_iter().find(|v| !var_ok(*v)) {
                return Err(PtaError::invalid_program(format!("{}: unknown {}", at(), bad)));
            }
            match stmt {
                Stmt::New { ty, .. } if !type_ok(ty) => {
                    return Err(PtaError::invalid_program(format!(
                        "{}: allocation of unknown type {:?}",
                        at(),
                        ty
                    )));
                }
                Stmt::LoadField { field, .. } | Stmt::StoreField { field, .. } if !field_ok(*field) => {
                    return Err(PtaError::invalid_program(format!("{}: unknown {}", at(), field)));
                }
                Stmt::Invoke(invoke) if !class_ok(invoke.method_ref.declaring_class) => {
                    return Err(PtaError::invalid_program(format!(
                        "{}: call into unknown {}",
                        at(),
                        invoke.method_ref.declaring_class
                    )));
                }
                Stmt::Invoke(invoke) if !invoke.is_static() && invoke.base.is_none() => {
                    return Err(PtaError::invalid_program(format!(
                        "{}: {} call without receiver",
                        at(),
                        invoke.kind.as_str()
                    )));
                }
                Stmt::If { target, .. } | Stmt::Goto { target } if *target >= len => {
                    return Err(PtaError::invalid_program(format!(
                        "{}: branch target {} out of range",
                        at(),
                        target
                    )));
                }
                Stmt::Switch { cases, default, .. } => {
                    let bad = cases
                        .iter()
                        .map(|(_, target)| *target)
                        .chain(std::iter::once(*default))
                        .find(|target| *target >= len);
                    if let Some(target) = bad {
                        return Err(PtaError::invalid_program(format!(
                            "{}: switch target {} out of range",
                            at(),
                            target
                        )));
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Every class named by `ty`, through array element types, is below `num_classes`
fn type_classes_in(ty: &Type, num_classes: usize) -> bool {
    match ty {
        Type::Class(class) => class.index() < num_classes,
        Type::Array(element) => type_classes_in(element, num_classes),
        _ => true,
    }
}

fn build_index(data: &ProgramData) -> ProgramIndex {
    let mut index = ProgramIndex::default();

    for class in &data.classes {
        if let Some(super_class) = class.super_class {
            index.subclasses.entry(super_class).or_default().push(class.id);
        }
        for iface in &class.interfaces {
            if class.is_interface {
                index.subinterfaces.entry(*iface).or_default().push(class.id);
            } else {
                index.implementors.entry(*iface).or_default().push(class.id);
            }
        }
    }

    index.return_vars = vec![Vec::new(); data.methods.len()];
    for method in &data.methods {
        index
            .declared_methods
            .insert((method.declaring_class, method.subsignature.clone()), method.id);

        for (stmt_ref, stmt) in method.stmt_refs() {
            match stmt {
                Stmt::LoadField {
                    base: Some(base), ..
                } => index.var_uses.entry(*base).or_default().load_fields.push(stmt_ref),
                Stmt::LoadField {
                    base: None, field, ..
                } => index.static_loads.entry(*field).or_default().push(stmt_ref),
                Stmt::StoreField {
                    base: Some(base), ..
                } => index.var_uses.entry(*base).or_default().store_fields.push(stmt_ref),
                Stmt::StoreField {
                    base: None, field, ..
                } => index.static_stores.entry(*field).or_default().push(stmt_ref),
                Stmt::LoadArray { base, .. } => {
                    index.var_uses.entry(*base).or_default().load_arrays.push(stmt_ref)
                }
                Stmt::StoreArray { base, .. } => {
                    index.var_uses.entry(*base).or_default().store_arrays.push(stmt_ref)
                }
                Stmt::Invoke(Invoke {
                    base: Some(base), ..
                }) => index.var_uses.entry(*base).or_default().invokes.push(stmt_ref),
                Stmt::Return { value: Some(value) } => {
                    let returns = &mut index.return_vars[method.id.index()];
                    if !returns.contains(value) {
                        returns.push(*value);
                    }
                }
                _ => {}
            }
        }
    }

    index
}
