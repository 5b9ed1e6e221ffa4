//! Structural subtyping.
//!
//! [`is_subtype`] answers whether every value of `sub` is also a value of
//! `sup`. Unions and intersections on the sub side are split first; the rest
//! is an exhaustive dispatch on the super variant, so a new variant without a
//! rule does not compile.
//!
//! Arrays are compared through projections (see [`projection`]): a list,
//! tuple or array shape can stand in for `array<K, V>` or `iterable<K, V>`.

pub mod projection;


use indexmap::IndexMap;

use crate::types::{CallableParameter, ClassLike, StructMember, Type};

pub use projection::{IterableView, MapView, to_iterable, to_map};

/// Whether `sub` can be used where `sup` is expected.
pub fn is_subtype(sup: &Type, sub: &Type) -> bool {
    match sub {
        Type::Union(left, right) | Type::Intersection(left, right) => {
            return is_subtype(sup, left) && is_subtype(sup, right);
        }
        _ => {}
    }

    match sup {
        Type::Mixed => true,
        Type::Never => false,
        Type::Null => matches!(sub, Type::Null),
        Type::Void => matches!(sub, Type::Void),
        Type::Resource => matches!(sub, Type::Resource),
        Type::Bool(expected) => match sub {
            Type::Bool(actual) => expected.is_none() || expected == actual,
            _ => false,
        },
        Type::Float => matches!(sub, Type::Float | Type::Int { .. } | Type::IntLiteral(_)),
        Type::IntLiteral(value) => match sub {
            Type::IntLiteral(other) => value == other,
            Type::Int { min, max } => *min == Some(*value) && *max == Some(*value),
            _ => false,
        },
        Type::Int { min, max } => check_int(*min, *max, sub),
        Type::String { non_empty, numeric } => check_string(*non_empty, *numeric, sub),
        Type::StringLiteral(value) => {
            matches!(sub, Type::StringLiteral(other) if value == other)
        }
        Type::ClassString(expected) => match (expected, sub) {
            (None, Type::ClassString(_)) => true,
            (Some(expected), Type::ClassString(Some(actual))) => is_subtype(expected, actual),
            _ => false,
        },
        Type::ClassLike(class) => match sub {
            Type::ClassLike(candidate) => extends(class, candidate),
            _ => false,
        },
        Type::Scalar => matches!(
            sub,
            Type::Scalar
                | Type::Bool(_)
                | Type::Int { .. }
                | Type::IntLiteral(_)
                | Type::Float
                | Type::String { .. }
                | Type::StringLiteral(_)
                | Type::ClassString(_)
        ),
        Type::List { element, non_empty } => check_list(element, *non_empty, sub),
        Type::Map(map) => match to_map(sub) {
            Some(view) => {
                (!map.is_non_empty() || view.non_empty)
                    && is_subtype(map.key(), &view.key)
                    && is_subtype(map.value(), &view.value)
            }
            None => false,
        },
        Type::Iterable { key, value } => match to_iterable(sub) {
            Some(view) => is_subtype(key, &view.key) && is_subtype(value, &view.value),
            None => false,
        },
        Type::Tuple(elements) => match sub {
            Type::Tuple(candidates) => {
                elements.len() <= candidates.len()
                    && elements
                        .iter()
                        .zip(candidates)
                        .all(|(element, candidate)| is_subtype(element, candidate))
            }
            _ => false,
        },
        Type::Struct(members) => match sub {
            Type::Struct(candidates) => check_struct(members, candidates),
            _ => false,
        },
        Type::Callable {
            return_type,
            parameters,
        } => match sub {
            Type::Callable {
                return_type: candidate_return,
                parameters: candidate_parameters,
            } => {
                (**return_type == Type::Void || is_subtype(return_type, candidate_return))
                    && check_parameters(parameters, candidate_parameters)
            }
            _ => false,
        },
        Type::Intersection(left, right) => is_subtype(left, sub) && is_subtype(right, sub),
        Type::Union(left, right) => is_subtype(left, sub) || is_subtype(right, sub),
    }
}

/// Union of two types with redundant branches dropped.
///
/// A branch that is a subtype of the other disappears; `true` and `false`
/// fold into `bool`.
pub fn join(left: Type, right: Type) -> Type {
    if is_subtype(&left, &right) {
        return left;
    }
    if is_subtype(&right, &left) {
        return right;
    }
    if let (Type::Bool(Some(a)), Type::Bool(Some(b))) = (&left, &right)
        && a != b
    {
        return Type::bool();
    }
    Type::union(left, right)
}

fn check_int(min: Option<i64>, max: Option<i64>, sub: &Type) -> bool {
    let min = min.unwrap_or(i64::MIN);
    let max = max.unwrap_or(i64::MAX);
    match sub {
        Type::IntLiteral(value) => min <= *value && *value <= max,
        Type::Int {
            min: sub_min,
            max: sub_max,
        } => min <= sub_min.unwrap_or(i64::MIN) && sub_max.unwrap_or(i64::MAX) <= max,
        _ => false,
    }
}

fn check_string(non_empty: bool, numeric: bool, sub: &Type) -> bool {
    match sub {
        Type::StringLiteral(text) => {
            (!numeric || is_numeric(text)) && (!non_empty || !text.is_empty())
        }
        Type::ClassString(_) => !numeric,
        Type::String {
            non_empty: sub_non_empty,
            numeric: sub_numeric,
        } => (!numeric || *sub_numeric) && (!non_empty || *sub_non_empty || *sub_numeric),
        _ => false,
    }
}

fn check_list(element: &Type, non_empty: bool, sub: &Type) -> bool {
    match sub {
        Type::Tuple(elements) => elements.iter().all(|candidate| is_subtype(element, candidate)),
        Type::List {
            element: candidate,
            non_empty: sub_non_empty,
        } => (!non_empty || *sub_non_empty) && is_subtype(element, candidate),
        _ => false,
    }
}

fn check_struct(
    members: &IndexMap<String, StructMember>,
    candidates: &IndexMap<String, StructMember>,
) -> bool {
    members.iter().all(|(name, member)| match candidates.get(name) {
        None => member.optional,
        Some(candidate) => {
            is_subtype(&member.ty, &candidate.ty) && (member.optional || !candidate.optional)
        }
    })
}

/// Parameters are contravariant: the sub callable must accept whatever the
/// super callable may be called with.
fn check_parameters(parameters: &[CallableParameter], candidates: &[CallableParameter]) -> bool {
    if candidates.len() > parameters.len() {
        return false;
    }
    candidates.iter().zip(parameters).all(|(candidate, parameter)| {
        (candidate.optional || !parameter.optional) && is_subtype(&candidate.ty, &parameter.ty)
    })
}

/// Nominal check: same name, or some declared ancestor of `candidate` has it.
fn extends(class: &ClassLike, candidate: &ClassLike) -> bool {
    class.name == candidate.name
        || candidate
            .parents
            .iter()
            .any(|parent| extends(class, parent))
}

/// PHP's notion of a numeric string: optional surrounding whitespace, an
/// optional sign, a decimal number with optional fraction and exponent.
pub(crate) fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && trimmed.parse::<f64>().is_ok()
}
