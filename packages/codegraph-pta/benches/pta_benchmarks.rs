//! Performance benchmarks for the points-to solver and dataflow passes
//!
//! Generated programs of growing size, solved under each context policy.

use codegraph_pta::config::{ContextStrategy, DataflowConfig, PTAConfig};
use codegraph_pta::shared::models::{MethodId, MethodRef, Program, ProgramBuilder, Type};
use codegraph_pta::{ChaCallGraphBuilder, DeadCodeDetection, InterConstantPropagation, PointerAnalysis};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// `n` node classes linked through a field, each with an overriding `next()`,
/// plus a `main` that allocates and walks them
fn linked_program(n: usize) -> (Program, MethodId) {
    let mut b = ProgramBuilder::new();
    let base = b.add_class("Node", None);
    let field = b.add_field(base, "next", Type::Class(base), false);
    let count = b.add_field(base, "count", Type::Int, false);

    let mut next = b.method(base, "next", "Node next()");
    let this = next.this().expect("instance method");
    let r = next.var("r", Type::Class(base));
    next.load_field(r, this, field);
    next.ret(Some(r));
    next.finish();

    let mut classes = vec![base];
    for i in 0..n {
        let class = b.add_class(&format!("Node{}", i), Some(base));
        let mut m = b.method(class, "next", "Node next()");
        let this = m.this().expect("instance method");
        m.ret(Some(this));
        m.finish();
        classes.push(class);
    }

    let mut main = b.static_method(base, "main", "void main()");
    let vars: Vec<_> = (0..n)
        .map(|i| main.var(&format!("v{}", i), Type::Class(base)))
        .collect();
    let k = main.var("k", Type::Int);
    let c = main.var("c", Type::Int);
    main.constant(k, 1);
    for (i, &v) in vars.iter().enumerate() {
        main.new_obj(v, Type::Class(classes[(i % n) + 1]));
        if i > 0 {
            main.store_field(vars[i - 1], field, v);
        }
        main.store_field(v, count, k);
        main.invoke_virtual(Some(v), v, MethodRef::new(base, "Node next()"), &[]);
        main.load_field(c, v, count);
    }
    main.ret(None);
    let main = main.finish();
    b.add_entry(main);
    (b.build().expect("valid program"), main)
}

// ============================================================================
// Points-to
// ============================================================================

fn bench_pointer_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_analysis");

    for size in [10, 50, 200] {
        let (program, _) = linked_program(size);
        group.throughput(Throughput::Elements(size as u64));
        for (name, context) in [
            ("insensitive", ContextStrategy::Insensitive),
            ("1-call-site", ContextStrategy::CallSite(1)),
            ("2-object", ContextStrategy::Object(2)),
            ("1-type", ContextStrategy::Type(1)),
        ] {
            let config = PTAConfig::default().context(context);
            group.bench_with_input(BenchmarkId::new(name, size), &program, |b, program| {
                b.iter(|| black_box(PointerAnalysis::run(program, &config)))
            });
        }
    }

    group.finish();
}

fn bench_cha(c: &mut Criterion) {
    let mut group = c.benchmark_group("cha_call_graph");
    for size in [10, 50, 200] {
        let (program, _) = linked_program(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| black_box(ChaCallGraphBuilder::new(program).build()))
        });
    }
    group.finish();
}

// ============================================================================
// Dataflow
// ============================================================================

fn bench_inter_constant_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("inter_constant_propagation");
    for size in [10, 50] {
        let (program, _) = linked_program(size);
        let pta = PointerAnalysis::run(&program, &PTAConfig::default()).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| {
                let analysis = InterConstantPropagation::new(program, &pta, DataflowConfig::default());
                black_box(analysis.analyze())
            })
        });
    }
    group.finish();
}

fn bench_dead_code(c: &mut Criterion) {
    let (program, main) = linked_program(200);
    c.bench_function("dead_code_200", |b| {
        b.iter(|| black_box(DeadCodeDetection::new(&program).analyze(main)))
    });
}

criterion_group!(
    benches,
    bench_pointer_analysis,
    bench_cha,
    bench_inter_constant_propagation,
    bench_dead_code
);
criterion_main!(benches);
