//! Per-identifier-reference resolution results: bound to a declaration,
//! global, or left free.

use crate::scope::ScopeId;
use revive_ast::NodeId;
use revive_common::Atom;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Bound { scope: ScopeId, name: Atom },
    /// Free because no enclosing scope up to the program scope declares it
    /// (ordinary global-or-undeclared reference), or because it is reachable
    /// only through a `with`/direct-`eval` scope the analyzer cannot see
    /// through statically — the instrumenter treats both as "must capture"
    /// Free(Atom),
}

#[derive(Default)]
pub struct Resolutions {
    map: FxHashMap<NodeId, Resolution>,
}

impl Resolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, resolution: Resolution) {
        self.map.insert(id, resolution);
    }

    pub fn get(&self, id: NodeId) -> Option<Resolution> {
        self.map.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Resolution)> + '_ {
        self.map.iter().map(|(&id, &resolution)| (id, resolution))
    }
}
