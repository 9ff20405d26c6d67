use super::*;
use revive_ast::FunctionId;
use revive_common::{Interner, Strictness};

#[test]
fn new_record_has_no_free_names() {
    let record = InfoRecord::new(FunctionId(0), Strictness::Sloppy);
    assert!(record.free_names.is_empty());
    assert!(!record.wildcard_capture);
}

#[test]
fn recording_the_same_name_twice_does_not_duplicate_the_entry() {
    let mut interner = Interner::new();
    let x = interner.intern("x");
    let mut record = InfoRecord::new(FunctionId(0), Strictness::Sloppy);
    record.record_usage(x, NameUsage::Read);
    record.record_usage(x, NameUsage::Read);
    assert_eq!(record.free_names.len(), 1);
    assert_eq!(record.free_names[0].usages.len(), 1);
}

#[test]
fn distinct_usages_of_the_same_name_are_both_kept() {
    let mut interner = Interner::new();
    let x = interner.intern("x");
    let mut record = InfoRecord::new(FunctionId(0), Strictness::Sloppy);
    record.record_usage(x, NameUsage::Read);
    record.record_usage(x, NameUsage::Write);
    assert_eq!(record.free_names[0].usages.len(), 2);
}

#[test]
fn distinct_names_get_distinct_entries() {
    let mut interner = Interner::new();
    let x = interner.intern("x");
    let y = interner.intern("y");
    let mut record = InfoRecord::new(FunctionId(0), Strictness::Sloppy);
    record.record_usage(x, NameUsage::Read);
    record.record_usage(y, NameUsage::Write);
    assert_eq!(record.free_names.len(), 2);
}
