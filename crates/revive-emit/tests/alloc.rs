use super::*;

#[test]
fn plain_allocator_never_repeats_a_name() {
    let mut alloc = NameAllocator::new(false);
    let names: Vec<Rc<str>> = (0..50).map(|_| alloc.fresh("v")).collect();
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}

#[test]
fn plain_allocator_names_stay_under_the_instrumenter_namespace() {
    let mut alloc = NameAllocator::new(false);
    let name = alloc.fresh("v");
    assert!(name.starts_with(INSTRUMENTER_PREFIX), "expected `{name}` to start with `{INSTRUMENTER_PREFIX}`");
}

#[test]
fn mangle_mode_skips_reserved_words() {
    let mut alloc = NameAllocator::new(true);
    for _ in 0..200 {
        let name = alloc.fresh("x");
        assert!(!RESERVED_WORDS.contains(&name.as_ref()), "allocator handed out reserved word `{name}`");
    }
}

#[test]
fn mangle_mode_never_repeats_a_name() {
    let mut alloc = NameAllocator::new(true);
    let names: Vec<Rc<str>> = (0..200).map(|_| alloc.fresh("x")).collect();
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}

#[test]
fn mangle_mode_honors_reserve_existing() {
    let mut alloc = NameAllocator::new(true);
    alloc.reserve_existing("a");
    let first = alloc.fresh("x");
    assert_ne!(first.as_ref(), "a");
}

#[test]
fn mangle_names_grow_past_single_characters() {
    let mut alloc = NameAllocator::new(true);
    let mut last = String::new();
    for _ in 0..80 {
        last = alloc.fresh("x").to_string();
    }
    assert!(last.len() > 1, "expected the allocator to overflow into multi-character names, got `{last}`");
}
