//! Info records: for every function literal the instrumenter
//! touches, a data structure listing every free name it references, how it
//! references it, and whether `this`/`arguments`/`new.target`/`super`/direct
//! `eval` appear inside. The emitter (revive-emit) reads these back to
//! rewrite captured identifiers and to decide which wrapper arrows a
//! lifted-out function body needs.

use revive_ast::FunctionId;
use revive_common::{Atom, Strictness};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameUsage {
    Read,
    Write,
    Delete,
    Typeof,
}

#[derive(Clone, Debug)]
pub struct FreeNameRecord {
    pub name: Atom,
    pub usages: Vec<NameUsage>,
}

impl FreeNameRecord {
    fn record(&mut self, usage: NameUsage) {
        if !self.usages.contains(&usage) {
            self.usages.push(usage);
        }
    }
}

#[derive(Clone, Debug)]
pub struct InfoRecord {
    pub function: FunctionId,
    pub free_names: Vec<FreeNameRecord>,
    pub uses_this: bool,
    pub uses_arguments: bool,
    pub uses_new_target: bool,
    pub uses_super: bool,
    pub uses_direct_eval: bool,
    pub strictness: Strictness,
    /// Set when this function's body (or an enclosing scope up to the
    /// nearest function boundary) contains a `with` or a direct `eval`;
    /// every free name must then be assumed captured instead
    /// of trusting the precise `free_names` list above.
    pub wildcard_capture: bool,
}

impl InfoRecord {
    pub fn new(function: FunctionId, strictness: Strictness) -> Self {
        InfoRecord {
            function,
            free_names: Vec::new(),
            uses_this: false,
            uses_arguments: false,
            uses_new_target: false,
            uses_super: false,
            uses_direct_eval: false,
            strictness,
            wildcard_capture: false,
        }
    }

    pub fn record_usage(&mut self, name: Atom, usage: NameUsage) {
        match self.free_names.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.record(usage),
            None => self.free_names.push(FreeNameRecord { name, usages: vec![usage] }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/info.rs"]
mod tests;
