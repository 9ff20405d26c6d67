//! String interning for identifier deduplication.
//!
//! Identifiers (variable names, property keys, scope-frame binding names) are
//! compared and hashed far more often than they are created, so we intern
//! them once into a shared `Atom` and pass that by value everywhere else.

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// An interned string. Cheap to copy, compares by pointer-sized id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    pub fn as_str<'a>(&self, interner: &'a Interner) -> &'a str {
        interner.resolve(*self)
    }
}

/// Single-threaded interner, used by the scanner/parser/instrumenter where
/// one `NodeArena` is built on one thread.
#[derive(Default)]
pub struct Interner {
    strings: Vec<Arc<str>>,
    lookup: FxHashMap<Arc<str>, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&id) = self.lookup.get(text) {
            return Atom(id);
        }
        let id = self.strings.len() as u32;
        let arc: Arc<str> = Arc::from(text);
        self.strings.push(arc.clone());
        self.lookup.insert(arc, id);
        Atom(id)
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// All interned strings in assignment order. Used by the instrumenter to
    /// check whether user source already binds an identifier under its
    /// reserved prefix before picking one.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_ref())
    }
}

/// Thread-safe interner, used by the runtime tracker, which is a process-wide
/// registry reached from arbitrary instrumented call sites.
#[derive(Default)]
pub struct ShardedInterner {
    lookup: DashMap<Arc<str>, u32>,
    strings: DashMap<u32, Arc<str>>,
    next: AtomicU32,
}

impl ShardedInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, text: &str) -> Atom {
        if let Some(id) = self.lookup.get(text) {
            return Atom(*id);
        }
        let arc: Arc<str> = Arc::from(text);
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.lookup.insert(arc.clone(), id);
        self.strings.insert(id, arc);
        Atom(id)
    }

    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.strings
            .get(&atom.0)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| Arc::from(""))
    }
}

#[cfg(test)]
#[path = "../tests/interner.rs"]
mod tests;
