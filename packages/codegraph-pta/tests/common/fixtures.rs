//! Program fixtures
//!
//! Each fixture returns the program plus the handles the tests inspect.

use codegraph_pta::shared::models::{
    ClassId, FieldId, MethodId, MethodRef, Program, ProgramBuilder, StmtRef, Type, VarId,
};

/// `x = new A(); y = x;`
pub struct CopyFixture {
    pub program: Program,
    pub x: VarId,
    pub y: VarId,
}

pub fn copy_fixture() -> CopyFixture {
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
    CopyFixture {
        program: b.build().unwrap(),
        x,
        y,
    }
}

/// `B extends A`, both define `m()`; `main: a = new B(); a.m();`
pub struct DispatchFixture {
    pub program: Program,
    pub a_m: MethodId,
    pub b_m: MethodId,
    pub call_site: StmtRef,
}

pub fn dispatch_fixture() -> DispatchFixture {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let bc = b.add_class("B", Some(a));

    let mut am = b.method(a, "m", "void m()");
    am.ret(None);
    let a_m = am.finish();
    let mut bm = b.method(bc, "m", "void m()");
    bm.ret(None);
    let b_m = bm.finish();

    let mut main = b.static_method(a, "main", "void main()");
    let v = main.var("a", Type::Class(a));
    main.new_obj(v, Type::Class(bc));
    let site = main.invoke_virtual(None, v, MethodRef::new(a, "void m()"), &[]);
    main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    DispatchFixture {
        program: b.build().unwrap(),
        a_m,
        b_m,
        call_site: StmtRef::new(main, site),
    }
}

/// `create() { o = new A(); return o; }`, `main: x = create(); y = create();`
pub struct FactoryFixture {
    pub program: Program,
    pub x: VarId,
    pub y: VarId,
}

pub fn factory_fixture() -> FactoryFixture {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);

    let mut create = b.static_method(a, "create", "A create()");
    let o = create.var("o", Type::Class(a));
    create.new_obj(o, Type::Class(a));
    create.ret(Some(o));
    create.finish();

    let mut main = b.static_method(a, "main", "void main()");
    let x = main.var("x", Type::Class(a));
    let y = main.var("y", Type::Class(a));
    main.invoke_static(Some(x), MethodRef::new(a, "A create()"), &[]);
    main.invoke_static(Some(y), MethodRef::new(a, "A create()"), &[]);
    main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    FactoryFixture {
        program: b.build().unwrap(),
        x,
        y,
    }
}

/// `a = new A(); b = aliased ? a : new A(); one = 1; a.f = one; v = b.f;`
pub struct FieldFixture {
    pub program: Program,
    pub main: MethodId,
    pub v: VarId,
    /// Index of the final `return`
    pub exit_stmt: usize,
}

pub fn field_fixture(aliased: bool) -> FieldFixture {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let f = b.add_field(a, "f", Type::Int, false);

    let mut main = b.static_method(a, "main", "void main()");
    let va = main.var("a", Type::Class(a));
    let vb = main.var("b", Type::Class(a));
    let one = main.var("one", Type::Int);
    let v = main.var("v", Type::Int);
    main.new_obj(va, Type::Class(a));
    if aliased {
        main.copy(vb, va);
    } else {
        main.new_obj(vb, Type::Class(a));
    }
    main.constant(one, 1);
    main.store_field(va, f, one);
    main.load_field(v, vb, f);
    let exit_stmt = main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    FieldFixture {
        program: b.build().unwrap(),
        main,
        v,
        exit_stmt,
    }
}

/// Field written through a callee:
/// `set(A t, int n) { t.f = n; }`, `main: a = new A(); c = 5; set(a, c); r = a.f;`
pub struct SetterFixture {
    pub program: Program,
    pub main: MethodId,
    pub r: VarId,
    pub exit_stmt: usize,
}

pub fn setter_fixture() -> SetterFixture {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let f = b.add_field(a, "f", Type::Int, false);

    let mut set = b.static_method(a, "set", "void set(A,int)");
    let t = set.param("t", Type::Class(a));
    let n = set.param("n", Type::Int);
    set.store_field(t, f, n);
    set.ret(None);
    set.finish();

    let mut main = b.static_method(a, "main", "void main()");
    let va = main.var("a", Type::Class(a));
    let c = main.var("c", Type::Int);
    let r = main.var("r", Type::Int);
    main.new_obj(va, Type::Class(a));
    main.constant(c, 5);
    main.invoke_static(None, MethodRef::new(a, "void set(A,int)"), &[va, c]);
    main.load_field(r, va, f);
    let exit_stmt = main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    SetterFixture {
        program: b.build().unwrap(),
        main,
        r,
        exit_stmt,
    }
}

/// `main(int p)`: `arr[0] = 10; arr[1] = 20; x = arr[0]; y = arr[p]; z = arr[u];`
/// where `u` is never assigned
pub struct ArrayFixture {
    pub program: Program,
    pub main: MethodId,
    pub x: VarId,
    pub y: VarId,
    pub z: VarId,
    pub exit_stmt: usize,
}

pub fn array_fixture() -> ArrayFixture {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);

    let mut main = b.static_method(a, "main", "void main(int)");
    let p = main.param("p", Type::Int);
    let arr = main.var("arr", Type::array_of(Type::Int));
    let i0 = main.var("i0", Type::Int);
    let i1 = main.var("i1", Type::Int);
    let ten = main.var("ten", Type::Int);
    let twenty = main.var("twenty", Type::Int);
    let u = main.var("u", Type::Int);
    let x = main.var("x", Type::Int);
    let y = main.var("y", Type::Int);
    let z = main.var("z", Type::Int);
    main.new_obj(arr, Type::array_of(Type::Int));
    main.constant(i0, 0);
    main.constant(i1, 1);
    main.constant(ten, 10);
    main.constant(twenty, 20);
    main.store_array(arr, i0, ten);
    main.store_array(arr, i1, twenty);
    main.load_array(x, arr, i0);
    main.load_array(y, arr, p);
    main.load_array(z, arr, u);
    let exit_stmt = main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    ArrayFixture {
        program: b.build().unwrap(),
        main,
        x,
        y,
        z,
        exit_stmt,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generated programs
// ═══════════════════════════════════════════════════════════════════════════

/// Number of `Base`-typed variables in a generated `main`
pub const GEN_VARS: usize = 6;

/// One statement of a generated `main`; indices wrap around the variable pool
#[derive(Debug, Clone, Copy)]
pub enum Op {
    /// `v[i] = new C[k]`
    New(usize, usize),
    /// `v[i] = v[j]`
    Copy(usize, usize),
    /// `v[i].f = v[j]`
    Store(usize, usize),
    /// `v[i] = v[j].f`
    Load(usize, usize),
    /// `v[i] = v[j].id(v[k])`
    Call(usize, usize, usize),
}

pub struct Generated {
    pub program: Program,
    pub vars: Vec<VarId>,
    pub classes: Vec<ClassId>,
    pub field: FieldId,
}

/// `Base { Base f; Base id(Base p) { return p; } }`,
/// `Sub1 extends Base { Base id(Base p) { return this; } }`,
/// `Sub2 extends Base {}`, plus a `main` running `ops`
pub fn generated_program(ops: &[Op]) -> Generated {
    let mut b = ProgramBuilder::new();
    let base = b.add_class("Base", None);
    let sub1 = b.add_class("Sub1", Some(base));
    let sub2 = b.add_class("Sub2", Some(base));
    let field = b.add_field(base, "f", Type::Class(base), false);
    let classes = vec![base, sub1, sub2];

    let mut id = b.method(base, "id", "Base id(Base)");
    let p = id.param("p", Type::Class(base));
    id.ret(Some(p));
    id.finish();

    let mut id1 = b.method(sub1, "id", "Base id(Base)");
    let this = id1.this().unwrap();
    id1.param("p", Type::Class(base));
    id1.ret(Some(this));
    id1.finish();

    let mut main = b.static_method(base, "main", "void main()");
    let vars: Vec<VarId> = (0..GEN_VARS)
        .map(|i| main.var(&format!("v{}", i), Type::Class(base)))
        .collect();
    let v = |i: usize| vars[i % GEN_VARS];
    for op in ops {
        match *op {
            Op::New(i, k) => {
                main.new_obj(v(i), Type::Class(classes[k % classes.len()]));
            }
            Op::Copy(i, j) => {
                main.copy(v(i), v(j));
            }
            Op::Store(i, j) => {
                main.store_field(v(i), field, v(j));
            }
            Op::Load(i, j) => {
                main.load_field(v(i), v(j), field);
            }
            Op::Call(i, j, k) => {
                let id_ref = MethodRef::new(base, "Base id(Base)");
                main.invoke_virtual(Some(v(i)), v(j), id_ref, &[v(k)]);
            }
        }
    }
    main.ret(None);
    let main = main.finish();
    b.add_entry(main);

    Generated {
        program: b.build().unwrap(),
        vars,
        classes,
        field,
    }
}

/// Deterministic sequence of `n` ops cycling through every statement kind
pub fn chain_ops(n: usize) -> Vec<Op> {
    (0..n)
        .map(|i| match i % 5 {
            0 => Op::New(i, i / 5),
            1 => Op::Copy(i + 1, i),
            2 => Op::Store(i, i + 2),
            3 => Op::Load(i + 3, i),
            _ => Op::Call(i, i + 1, i + 2),
        })
        .collect()
}
