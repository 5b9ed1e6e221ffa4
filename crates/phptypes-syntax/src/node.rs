//! Syntax tree for type annotations.
//!
//! The tree is a closed set of node shapes. Consumers match on [`Node`]
//! exhaustively, so a new shape shows up as a compile error in every
//! consumer rather than as a runtime fallback.
//!
//! `Display` renders the canonical text form. Rendering then re-parsing
//! yields an equal tree, modulo the associativity of `|` and `&`.

use std::fmt;

use indexmap::IndexMap;

/// A node of the annotation syntax tree.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    /// Named type, optionally with `<...>` type parameters: `list<string>`.
    Identifier {
        name: String,
        type_parameters: Vec<Node>,
    },
    /// Integer literal: `42`, `-1`.
    IntLiteral(i64),
    /// String literal, stored unescaped: `'foo'`.
    StringLiteral(String),
    /// `left | right`
    Union { left: Box<Node>, right: Box<Node> },
    /// `left & right`
    Intersection { left: Box<Node>, right: Box<Node> },
    /// Positional array shape: `array{string, int}`.
    Tuple(Vec<Node>),
    /// Keyed array shape: `array{foo: string, bar?: int}`.
    Struct(IndexMap<String, StructMember>),
    /// `callable(string, int=): void`
    Callable {
        return_type: Box<Node>,
        parameters: Vec<CallableParameter>,
    },
}

/// Member of a keyed array shape.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StructMember {
    pub ty: Node,
    pub optional: bool,
}

impl StructMember {
    pub fn required(ty: Node) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: Node) -> Self {
        Self { ty, optional: true }
    }
}

/// Parameter of a callable signature.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CallableParameter {
    pub ty: Node,
    pub optional: bool,
}

impl CallableParameter {
    pub fn required(ty: Node) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: Node) -> Self {
        Self { ty, optional: true }
    }
}

impl Node {
    /// Bare identifier without type parameters.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier {
            name: name.into(),
            type_parameters: Vec::new(),
        }
    }

    /// Identifier with type parameters.
    pub fn generic(name: impl Into<String>, type_parameters: Vec<Node>) -> Self {
        Self::Identifier {
            name: name.into(),
            type_parameters,
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    pub fn union(left: Node, right: Node) -> Self {
        Self::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn intersection(left: Node, right: Node) -> Self {
        Self::Intersection {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn callable(return_type: Node, parameters: Vec<CallableParameter>) -> Self {
        Self::Callable {
            return_type: Box::new(return_type),
            parameters,
        }
    }

    /// Whether this node is a `|` or `&` combination.
    pub fn is_compound(&self) -> bool {
        matches!(self, Self::Union { .. } | Self::Intersection { .. })
    }
}

/// Writes `items` separated by `", "`.
pub fn write_comma_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Writes a single-quoted string literal, escaping `'` and `\`.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("'")
}

/// Keys that the parser reads back without quotes.
fn is_bare_key(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        Some(c) if c.is_ascii_digit() => chars.all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

impl fmt::Display for StructMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for CallableParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.optional {
            f.write_str("=")?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Identifier {
                name,
                type_parameters,
            } => {
                f.write_str(name)?;
                if !type_parameters.is_empty() {
                    f.write_str("<")?;
                    write_comma_separated(f, type_parameters)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Node::IntLiteral(value) => write!(f, "{value}"),
            Node::StringLiteral(value) => write_quoted(f, value),
            Node::Union { left, right } => write!(f, "{left} | {right}"),
            Node::Intersection { left, right } => {
                // `&` binds tighter than `|`
                for (i, operand) in [left, right].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    if matches!(**operand, Node::Union { .. }) {
                        write!(f, "({operand})")?;
                    } else {
                        write!(f, "{operand}")?;
                    }
                }
                Ok(())
            }
            Node::Tuple(elements) => {
                f.write_str("array{")?;
                write_comma_separated(f, elements)?;
                f.write_str("}")
            }
            Node::Struct(members) => {
                f.write_str("array{")?;
                for (i, (name, member)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_bare_key(name) {
                        f.write_str(name)?;
                    } else {
                        write_quoted(f, name)?;
                    }
                    if member.optional {
                        f.write_str("?")?;
                    }
                    write!(f, ": {member}")?;
                }
                f.write_str("}")
            }
            Node::Callable {
                return_type,
                parameters,
            } => {
                f.write_str("callable(")?;
                write_comma_separated(f, parameters)?;
                if return_type.is_compound() {
                    write!(f, "): ({return_type})")
                } else {
                    write!(f, "): {return_type}")
                }
            }
        }
    }
}
