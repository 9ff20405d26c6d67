//! Internal identifier namespace: every identifier the instrumenter introduces shares one
//! reserved prefix, so the emitter and the tracker's fixed entry-point names
//! never need to guess what user code bound. If user source
//! already binds something under the base prefix, the whole namespace is
//! bumped to a fresh generation before any identifier is minted, rather than
//! renaming one collision at a time.

use revive_common::{Atom, Interner};

const BASE_PREFIX: &str = "__revive";

pub struct InternalNamespace {
    prefix: String,
    counter: u32,
}

impl InternalNamespace {
    /// Scans `interner` for any identifier already bound under the base
    /// prefix (or a numbered generation of it) and picks the first
    /// generation with no collisions.
    pub fn new(interner: &Interner) -> Self {
        let mut generation = 0u32;
        loop {
            let candidate =
                if generation == 0 { BASE_PREFIX.to_string() } else { format!("{BASE_PREFIX}{generation}") };
            let collides = interner.iter().any(|text| text.starts_with(candidate.as_str()));
            if !collides {
                return InternalNamespace { prefix: candidate, counter: 0 };
            }
            generation += 1;
        }
    }

    /// Mints a fresh identifier under this namespace, e.g.
    /// `__revive_scope_3` for `role == "scope"`.
    pub fn fresh(&mut self, interner: &mut Interner, role: &str) -> Atom {
        let name = format!("{}_{}_{}", self.prefix, role, self.counter);
        self.counter += 1;
        interner.intern(&name)
    }

    /// Interns (idempotently) one of the tracker's fixed entry-point names
    /// — unlike `fresh`, every call with the same `name`
    /// returns the same atom, since every call site must reference the one
    /// shared tracker function.
    pub fn reserved(&self, interner: &mut Interner, name: &str) -> Atom {
        interner.intern(&format!("{}_{}", self.prefix, name))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
#[path = "../tests/namespace.rs"]
mod tests;
