//! Parses ECMAScript-family source into a `revive_ast::NodeArena`.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::Parser;

use revive_ast::{NodeArena, NodeId};
use revive_common::{Interner, SourceKind};

/// Parses `source` as a complete program, returning the arena, the
/// identifier interner built up while parsing it, and the root `Program`
/// node.
pub fn parse(source: &str, source_kind: SourceKind) -> Result<(NodeArena, Interner, NodeId), ParseError> {
    Parser::new(source).parse_program(source_kind)
}

#[cfg(test)]
#[path = "../tests/parser.rs"]
mod tests;
