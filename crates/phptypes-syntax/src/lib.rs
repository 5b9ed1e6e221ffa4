//! Syntax layer for PHPDoc type annotations.
//!
//! Turns annotation text such as `array{foo: string, bar?: list<int>}` into a
//! [`Node`] tree. The tree carries no meaning of its own: name resolution and
//! type construction happen in `phptypes-lib`.
//!
//! # Example
//!
//! ```
//! use phptypes_syntax::{Node, parse};
//!
//! let node = parse("list<string> | null").unwrap();
//! assert!(matches!(node, Node::Union { .. }));
//! assert_eq!(node.to_string(), "list<string> | null");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod lexer;
mod node;
mod parser;

#[cfg(test)]
mod parser_tests;

pub use node::{CallableParameter, Node, StructMember, write_comma_separated};
pub use parser::{DEFAULT_RECURSION_FUEL, ParseError, Parser};

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses `input` as a single type annotation.
pub fn parse(input: &str) -> Result<Node> {
    Parser::new(input)?.parse()
}
