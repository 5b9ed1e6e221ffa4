//! Syntax tree to [`Type`].
//!
//! Names resolve through a [`Scope`], except `int`, whose parameters are
//! bound literals rather than types. Unions are simplified on the way in
//! with [`join`], so `true|false` builds `bool` and `int|5` builds `int`.

use indexmap::IndexMap;
use phptypes_syntax::Node;

use crate::compat::join;
use crate::scope::Scope;
use crate::types::{CallableParameter, StructMember, Type};
use crate::{Error, Result};

pub fn from_tree(node: &Node, scope: &Scope) -> Result<Type> {
    match node {
        Node::Identifier {
            name,
            type_parameters,
        } if name == "int" => int_type(type_parameters),
        Node::Identifier {
            name,
            type_parameters,
        } => {
            let parameters = build_all(type_parameters, scope)?;
            scope.resolve(name, parameters)
        }
        Node::IntLiteral(value) => Ok(Type::IntLiteral(*value)),
        Node::StringLiteral(value) => Ok(Type::string_literal(value.as_str())),
        Node::Union { left, right } => {
            let left = from_tree(left, scope)?;
            let right = from_tree(right, scope)?;
            Ok(join(left, right))
        }
        Node::Intersection { left, right } => {
            let left = from_tree(left, scope)?;
            let right = from_tree(right, scope)?;
            Ok(Type::intersection(left, right))
        }
        Node::Tuple(elements) => build_all(elements, scope).map(Type::Tuple),
        Node::Struct(members) => {
            let mut built = IndexMap::with_capacity(members.len());
            for (name, member) in members {
                let ty = from_tree(&member.ty, scope)?;
                built.insert(
                    name.clone(),
                    StructMember {
                        ty,
                        optional: member.optional,
                    },
                );
            }
            Ok(Type::Struct(built))
        }
        Node::Callable {
            return_type,
            parameters,
        } => {
            let return_type = from_tree(return_type, scope)?;
            let parameters = parameters
                .iter()
                .map(|parameter| {
                    Ok(CallableParameter {
                        ty: from_tree(&parameter.ty, scope)?,
                        optional: parameter.optional,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Type::callable(return_type, parameters))
        }
    }
}

fn build_all(nodes: &[Node], scope: &Scope) -> Result<Vec<Type>> {
    nodes.iter().map(|node| from_tree(node, scope)).collect()
}

/// `int` or `int<min|N, max|N>`.
fn int_type(parameters: &[Node]) -> Result<Type> {
    let [min, max] = parameters else {
        if parameters.is_empty() {
            return Ok(Type::int());
        }
        return Err(Error::IntArity(parameters.to_vec()));
    };
    let min = int_bound(min, "min").ok_or_else(|| Error::InvalidIntMin(min.clone()))?;
    let max = int_bound(max, "max").ok_or_else(|| Error::InvalidIntMax(max.clone()))?;
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(Error::InvalidIntRange { min, max });
    }
    Ok(Type::int_range(min, max))
}

/// `Some(None)` for the open-ended sentinel, `None` when the node is neither
/// a literal nor the sentinel.
fn int_bound(node: &Node, sentinel: &str) -> Option<Option<i64>> {
    match node {
        Node::IntLiteral(value) => Some(Some(*value)),
        Node::Identifier {
            name,
            type_parameters,
        } if name == sentinel && type_parameters.is_empty() => Some(None),
        _ => None,
    }
}
