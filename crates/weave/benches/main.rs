use ahash::AHashSet;
use criterion::{black_box, criterion_group, criterion_main, Bencher, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use weave::{Builtins, FoldCtx, FreshIdSource, Interner, NoopTracer, NormalizePolicy, Reserved, Rule, StderrDebugSink, Term};

/// A tiny rule set: `D[x] -> Mul[2, x]` (a user rule that must beat the
/// primitive folder to its own argument, as in the outermost-first
/// ordering invariant) plus nothing else — the rest of the work is plain
/// arithmetic folding.
fn double_rule(reserved: &Reserved, interner: &mut Interner) -> Rule {
    let d = interner.intern("D");
    let mul = interner.intern("Mul");
    let var_x = Term::app(Term::sym(reserved.var), vec![Term::str("x")]);
    Rule {
        name: "double".to_string(),
        lhs: Term::app(Term::sym(d), vec![var_x.clone()]),
        rhs: Term::app(Term::sym(mul), vec![Term::num(2.0), var_x]),
        guard: None,
        prio: 0.0,
        source_index: 0,
    }
}

/// Builds `D[D[D[...D[1]...]]]` nested `depth` times, which normalizes to
/// `1 * 2^depth` through repeated rule firings interleaved with folding.
fn nested_doubles(interner: &mut Interner, depth: usize) -> Term {
    let d = interner.intern("D");
    let mut term = Term::num(1.0);
    for _ in 0..depth {
        term = Term::app(Term::sym(d), vec![term]);
    }
    term
}

fn run_normalize(bench: &mut Bencher, depth: usize) {
    let mut interner = Interner::new();
    let reserved = Reserved::new(&mut interner);
    let builtins = Builtins::new(&mut interner);
    let rule = double_rule(&reserved, &mut interner);
    let rules = vec![rule];
    let term = nested_doubles(&mut interner, depth);

    bench.iter(|| {
        let skip = AHashSet::default();
        let mut fresh = FreshIdSource::new(0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut debug = StderrDebugSink;
        let mut ctx = FoldCtx {
            reserved: &reserved,
            builtins: &builtins,
            skip: &skip,
            interner: &mut interner,
            fresh: &mut fresh,
            rng: &mut rng,
            debug: &mut debug,
        };
        let mut tracer = NoopTracer;
        let result = weave::normalize(&term, &rules, &NormalizePolicy::default(), &mut ctx, &mut tracer).unwrap();
        black_box(result);
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("normalize_nested_doubles_8", |b| run_normalize(b, 8));
    c.bench_function("normalize_nested_doubles_64", |b| run_normalize(b, 64));
    c.bench_function("normalize_nested_doubles_256", |b| run_normalize(b, 256));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
