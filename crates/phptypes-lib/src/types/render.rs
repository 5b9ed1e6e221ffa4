//! Canonical text form.
//!
//! A type renders by converting back to a syntax [`Node`] and printing that,
//! so the text always re-parses into the same type.

use std::fmt;

use phptypes_syntax::Node;

use super::{CallableParameter, StructMember, Type};

impl Type {
    /// Syntax tree for the canonical form of this type.
    pub fn to_node(&self) -> Node {
        match self {
            Type::Never => Node::identifier("never"),
            Type::Mixed => Node::identifier("mixed"),
            Type::Void => Node::identifier("void"),
            Type::Null => Node::identifier("null"),
            Type::Scalar => Node::identifier("scalar"),
            Type::Resource => Node::identifier("resource"),
            Type::Float => Node::identifier("float"),
            Type::Bool(None) => Node::identifier("bool"),
            Type::Bool(Some(true)) => Node::identifier("true"),
            Type::Bool(Some(false)) => Node::identifier("false"),
            Type::Int { min, max } => int_node(*min, *max),
            Type::IntLiteral(value) => Node::IntLiteral(*value),
            Type::String { numeric: true, .. } => Node::identifier("numeric-string"),
            Type::String {
                non_empty: true, ..
            } => Node::identifier("non-empty-string"),
            Type::String { .. } => Node::identifier("string"),
            Type::StringLiteral(value) => Node::string_literal(value.as_str()),
            Type::ClassLike(class) => Node::generic(
                class.name.as_str(),
                class.type_parameters.iter().map(Type::to_node).collect(),
            ),
            Type::ClassString(class) => Node::generic(
                "class-string",
                class.iter().map(|c| c.to_node()).collect(),
            ),
            Type::List { element, non_empty } => Node::generic(
                if *non_empty { "non-empty-list" } else { "list" },
                vec![element.to_node()],
            ),
            Type::Map(map) => {
                let key = if is_array_key(map.key()) {
                    Node::identifier("array-key")
                } else {
                    map.key().to_node()
                };
                Node::generic(
                    if map.is_non_empty() {
                        "non-empty-array"
                    } else {
                        "array"
                    },
                    vec![key, map.value().to_node()],
                )
            }
            Type::Iterable { key, value } => {
                Node::generic("iterable", vec![key.to_node(), value.to_node()])
            }
            Type::Tuple(elements) => Node::Tuple(elements.iter().map(Type::to_node).collect()),
            Type::Struct(members) => Node::Struct(
                members
                    .iter()
                    .map(|(name, member)| (name.clone(), member_node(member)))
                    .collect(),
            ),
            Type::Callable {
                return_type,
                parameters,
            } => Node::callable(
                return_type.to_node(),
                parameters.iter().map(parameter_node).collect(),
            ),
            Type::Union(left, right) => Node::union(left.to_node(), right.to_node()),
            Type::Intersection(left, right) => {
                Node::intersection(left.to_node(), right.to_node())
            }
        }
    }
}

fn int_node(min: Option<i64>, max: Option<i64>) -> Node {
    match (min, max) {
        (None, None) => Node::identifier("int"),
        (Some(1), None) => Node::identifier("positive-int"),
        (None, Some(-1)) => Node::identifier("negative-int"),
        _ => Node::generic(
            "int",
            vec![
                min.map_or_else(|| Node::identifier("min"), Node::IntLiteral),
                max.map_or_else(|| Node::identifier("max"), Node::IntLiteral),
            ],
        ),
    }
}

fn member_node(member: &StructMember) -> phptypes_syntax::StructMember {
    phptypes_syntax::StructMember {
        ty: member.ty.to_node(),
        optional: member.optional,
    }
}

fn parameter_node(parameter: &CallableParameter) -> phptypes_syntax::CallableParameter {
    phptypes_syntax::CallableParameter {
        ty: parameter.ty.to_node(),
        optional: parameter.optional,
    }
}

/// Whether `ty` is exactly `string | int` (either order, no refinements),
/// the union `array-key` stands for.
pub(crate) fn is_array_key(ty: &Type) -> bool {
    let Type::Union(left, right) = ty else {
        return false;
    };
    let (left, right) = (&**left, &**right);
    let string = Type::string();
    let int = Type::int();
    (*left == string && *right == int) || (*left == int && *right == string)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_node(), f)
    }
}
