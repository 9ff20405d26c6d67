use super::*;

#[test]
fn interning_the_same_text_twice_returns_the_same_atom() {
    let mut interner = Interner::new();
    let a = interner.intern("frame");
    let b = interner.intern("frame");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn distinct_text_gets_distinct_atoms() {
    let mut interner = Interner::new();
    let a = interner.intern("x");
    let b = interner.intern("y");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), "x");
    assert_eq!(interner.resolve(b), "y");
}

#[test]
fn sharded_interner_is_concurrency_safe_by_type() {
    let interner = ShardedInterner::new();
    let a = interner.intern("scope");
    let b = interner.intern("scope");
    assert_eq!(a, b);
    assert_eq!(&*interner.resolve(a), "scope");
}
