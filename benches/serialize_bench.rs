//! Serializer throughput benchmarks: evaluate a script with the reference
//! tree-walking host, build a value graph from its completion value, then
//! print it back to source text.
//!
//! Run with: cargo bench --bench serialize_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use revive_common::SourceKind;
use revive_emit::{serialize, SerializeOptions};
use revive_graph::build_value_graph;
use revive_host::{Host, TreeWalkHost};
use revive_tracker::EvalContext;
use std::rc::Rc;

const FLAT_OBJECT: &str = r#"
({
    a: 1, b: 2, c: 3, d: "four", e: [5, 6, 7],
    f: { nested: true }, g: null, h: undefined,
})
"#;

const NESTED_GRAPH: &str = r#"
const shared = { id: 1 };
const list = [shared, shared, { id: 2, parent: shared }];
const cyclic = { name: "root" };
cyclic.self = cyclic;
list.push(cyclic);
({ list, shared, cyclic })
"#;

const CLOSURES: &str = r#"
function makeAdder(n) {
    return (x) => x + n;
}
({
    addOne: makeAdder(1),
    addTwo: makeAdder(2),
    addTen: makeAdder(10),
})
"#;

fn graph_for(source: &str, options: &SerializeOptions) -> String {
    let host = TreeWalkHost::new();
    let value = host.evaluate(source, EvalContext::new(SourceKind::Script, None)).unwrap();
    let graph = build_value_graph(host.as_ref(), vec![(Rc::from("root"), value)]).unwrap();
    serialize(&graph, options).unwrap().into_single()
}

fn bench_serialize(c: &mut Criterion) {
    let options = SerializeOptions::default();
    let mut group = c.benchmark_group("serialize");
    for (name, source) in [("flat_object", FLAT_OBJECT), ("nested_graph", NESTED_GRAPH), ("closures", CLOSURES)] {
        group.bench_with_input(BenchmarkId::new("bare", name), source, |b, source| {
            b.iter(|| black_box(graph_for(source, &options)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_serialize);
criterion_main!(benches);
