use super::*;
use revive_common::Interner;

#[test]
fn fresh_prefix_is_the_base_prefix_when_no_collision() {
    let interner = Interner::new();
    let namespace = InternalNamespace::new(&interner);
    assert_eq!(namespace.prefix(), "__revive");
}

#[test]
fn fresh_names_are_namespaced_and_unique() {
    let mut interner = Interner::new();
    let mut namespace = InternalNamespace::new(&interner);
    let a = namespace.fresh(&mut interner, "scope");
    let b = namespace.fresh(&mut interner, "scope");
    assert_ne!(a, b);
    assert!(interner.resolve(a).starts_with("__revive_scope_"));
}

#[test]
fn reserved_names_are_stable_across_calls() {
    let mut interner = Interner::new();
    let namespace = InternalNamespace::new(&interner);
    let a = namespace.reserved(&mut interner, "registerScope");
    let b = namespace.reserved(&mut interner, "registerScope");
    assert_eq!(a, b);
}

#[test]
fn collision_with_base_prefix_bumps_generation() {
    let mut interner = Interner::new();
    interner.intern("__revive_scope_0");
    let namespace = InternalNamespace::new(&interner);
    assert_eq!(namespace.prefix(), "__revive1");
}
