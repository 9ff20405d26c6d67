//! Instrumenter throughput benchmarks.
//!
//! Run with: cargo bench --bench instrument_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use revive_common::SourceKind;
use revive_instrument::instrument;

const SMALL_SOURCE: &str = r#"
function add(a, b) {
    return a + b;
}
const result = add(1, 2);
"#;

const MEDIUM_SOURCE: &str = r#"
function makeCounter(start) {
    let count = start;
    return {
        increment() { return ++count; },
        decrement() { return --count; },
        value() { return count; },
    };
}

class Point {
    #x;
    #y;
    constructor(x, y) {
        this.#x = x;
        this.#y = y;
    }
    get x() { return this.#x; }
    get y() { return this.#y; }
    translate(dx, dy) {
        return new Point(this.#x + dx, this.#y + dy);
    }
}

const counter = makeCounter(0);
const origin = new Point(0, 0);
const moved = origin.translate(3, 4);
"#;

const LARGE_SOURCE: &str = r#"
function pipeline(...fns) {
    return (input) => fns.reduce((value, fn) => fn(value), input);
}

function memoize(fn) {
    const cache = new Map();
    return (...args) => {
        const key = JSON.stringify(args);
        if (cache.has(key)) return cache.get(key);
        const result = fn(...args);
        cache.set(key, result);
        return result;
    };
}

class EventBus {
    constructor() {
        this.listeners = new Map();
    }
    on(name, handler) {
        if (!this.listeners.has(name)) this.listeners.set(name, []);
        this.listeners.get(name).push(handler);
        return () => this.off(name, handler);
    }
    off(name, handler) {
        const handlers = this.listeners.get(name);
        if (!handlers) return;
        this.listeners.set(name, handlers.filter((h) => h !== handler));
    }
    emit(name, ...args) {
        (this.listeners.get(name) || []).forEach((handler) => handler(...args));
    }
}

const bus = new EventBus();
const double = memoize((x) => x * 2);
const triple = (x) => x * 3;
const transform = pipeline(double, triple);
bus.on("value", (x) => transform(x));
bus.emit("value", 21);
"#;

fn bench_instrument(c: &mut Criterion) {
    let mut group = c.benchmark_group("instrument");
    for (name, source) in [("small", SMALL_SOURCE), ("medium", MEDIUM_SOURCE), ("large", LARGE_SOURCE)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("script", name), source, |b, source| {
            b.iter(|| instrument(black_box(source), SourceKind::Script).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_instrument);
criterion_main!(benches);
