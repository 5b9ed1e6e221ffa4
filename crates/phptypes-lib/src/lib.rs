//! Structural PHPDoc types and a subtyping checker.
//!
//! Annotation text is parsed by `phptypes-syntax`, turned into a [`Type`] by
//! the [`builder`] with names resolved through a [`Scope`], and compared with
//! [`is_subtype`].
//!
//! # Example
//!
//! ```
//! use phptypes_lib::{Scope, is_subtype, type_from_text};
//!
//! let scope = Scope::global();
//! let list = type_from_text("list<string>", &scope).unwrap();
//! let tuple = type_from_text("array{'a', 'b'}", &scope).unwrap();
//!
//! assert!(is_subtype(&list, &tuple));
//! assert_eq!(type_from_text("true|false", &scope).unwrap().to_string(), "bool");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod compat;
pub mod scope;
pub mod types;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use phptypes_syntax::{Node, ParseError, write_comma_separated};

pub use builder::from_tree;
pub use compat::{is_subtype, join};
pub use scope::{Constructor, Entry, Scope};
pub use types::{CallableParameter, ClassLike, MapType, StructMember, Type};

/// Errors raised while turning annotation text into a [`Type`].
///
/// Messages are part of the public contract and stay stable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The text is not a well-formed annotation.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unknown type {}", Generic(.name, .parameters))]
    UnknownType { name: String, parameters: Vec<Type> },

    #[error("Can't use {key} as array key. Only strings and integers are allowed.")]
    InvalidArrayKey { key: Type },

    #[error(
        "Array types must take one of the following forms: array, array<ValueType>, array<KeyType, ValueType>. Got {}",
        Generic(.name, .parameters)
    )]
    ArrayArity { name: String, parameters: Vec<Type> },

    #[error(
        "Iterable types must take one of the following forms: iterable, iterable<ValueType>, iterable<KeyType, ValueType>"
    )]
    IterableArity,

    #[error("class-string takes zero or one type parameters")]
    ClassStringArity,

    #[error(
        "The list type takes exactly one type parameter, {} ({}) given",
        .0.len(),
        CommaSeparated(.0)
    )]
    ListArity(Vec<Type>),

    #[error(
        "The int type takes exactly zero or two type parameters, {} ({}) given",
        .0.len(),
        CommaSeparated(.0)
    )]
    IntArity(Vec<Node>),

    #[error("Invalid minimum value for int type: {0}. Must be an integer or \"min\".")]
    InvalidIntMin(Node),

    #[error("Invalid maximum value for int type: {0}. Must be an integer or \"max\".")]
    InvalidIntMax(Node),

    #[error("Invalid range for int type: minimum {min} is greater than maximum {max}.")]
    InvalidIntRange { min: i64, max: i64 },
}

/// Result type for type construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses `text` and builds a type, resolving names through `scope`.
pub fn type_from_text(text: &str, scope: &Scope) -> Result<Type> {
    let node = phptypes_syntax::parse(text)?;
    from_tree(&node, scope)
}

impl FromStr for Type {
    type Err = Error;

    /// Builds against [`Scope::global`].
    fn from_str(text: &str) -> Result<Self> {
        type_from_text(text, &Scope::global())
    }
}

/// `name` or `name<A, B>`, for messages.
struct Generic<'a>(&'a String, &'a Vec<Type>);

impl fmt::Display for Generic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)?;
        if !self.1.is_empty() {
            f.write_str("<")?;
            write_comma_separated(f, self.1)?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

struct CommaSeparated<'a, T>(&'a Vec<T>);

impl<T: fmt::Display> fmt::Display for CommaSeparated<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_comma_separated(f, self.0)
    }
}
