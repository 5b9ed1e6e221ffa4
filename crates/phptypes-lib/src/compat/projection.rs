//! Map and iterable views of array-like types.
//!
//! Which variants can stand in for `array<K, V>` or `iterable<K, V>` is
//! decided here in one table rather than spread over the variants.
//!
//! | Type | Map view |
//! |------|----------|
//! | `array<K, V>` | itself |
//! | `list<V>` | `int`, `V`, same non-emptiness |
//! | `array{A, B}` | `int`, `A \| B` deduplicated, non-empty if it has elements |
//! | `array{a: A, b?: B}` | `'a' \| 'b'`, `A \| B`, non-empty if a member is required |
//! | `L \| R` | pointwise union when both sides project |
//!
//! An iterable has an iterable view of itself; everything with a map view
//! also has an iterable view.

use std::borrow::Cow;

use indexmap::IndexMap;

use super::join;
use crate::types::{StructMember, Type};

/// A type seen as `array<key, value>`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView<'a> {
    pub key: Cow<'a, Type>,
    pub value: Cow<'a, Type>,
    pub non_empty: bool,
}

/// A type seen as `iterable<key, value>`.
#[derive(Debug, Clone, PartialEq)]
pub struct IterableView<'a> {
    pub key: Cow<'a, Type>,
    pub value: Cow<'a, Type>,
}

pub fn to_map(ty: &Type) -> Option<MapView<'_>> {
    match ty {
        Type::Map(map) => Some(MapView {
            key: Cow::Borrowed(map.key()),
            value: Cow::Borrowed(map.value()),
            non_empty: map.is_non_empty(),
        }),
        Type::List { element, non_empty } => Some(MapView {
            key: Cow::Owned(Type::int()),
            value: Cow::Borrowed(&**element),
            non_empty: *non_empty,
        }),
        Type::Tuple(elements) => Some(tuple_view(elements)),
        Type::Struct(members) => Some(struct_view(members)),
        Type::Union(left, right) => {
            let left = to_map(left)?;
            let right = to_map(right)?;
            Some(MapView {
                key: Cow::Owned(join(left.key.into_owned(), right.key.into_owned())),
                value: Cow::Owned(join(left.value.into_owned(), right.value.into_owned())),
                non_empty: left.non_empty && right.non_empty,
            })
        }
        _ => None,
    }
}

pub fn to_iterable(ty: &Type) -> Option<IterableView<'_>> {
    match ty {
        Type::Iterable { key, value } => Some(IterableView {
            key: Cow::Borrowed(&**key),
            value: Cow::Borrowed(&**value),
        }),
        Type::Union(left, right) => {
            let left = to_iterable(left)?;
            let right = to_iterable(right)?;
            Some(IterableView {
                key: Cow::Owned(join(left.key.into_owned(), right.key.into_owned())),
                value: Cow::Owned(join(left.value.into_owned(), right.value.into_owned())),
            })
        }
        other => to_map(other).map(|view| IterableView {
            key: view.key,
            value: view.value,
        }),
    }
}

fn tuple_view(elements: &[Type]) -> MapView<'static> {
    let value = elements
        .iter()
        .cloned()
        .reduce(join)
        .unwrap_or(Type::Never);
    MapView {
        key: Cow::Owned(Type::int()),
        value: Cow::Owned(value),
        non_empty: !elements.is_empty(),
    }
}

fn struct_view(members: &IndexMap<String, StructMember>) -> MapView<'static> {
    if members.is_empty() {
        return MapView {
            key: Cow::Owned(Type::non_empty_string()),
            value: Cow::Owned(Type::Mixed),
            non_empty: false,
        };
    }
    let key = members.keys().map(|name| key_literal(name)).reduce(join);
    let value = members.values().map(|member| member.ty.clone()).reduce(join);
    MapView {
        key: Cow::Owned(key.unwrap_or(Type::Never)),
        value: Cow::Owned(value.unwrap_or(Type::Never)),
        non_empty: members.values().any(|member| !member.optional),
    }
}

/// Decimal integer keys are stored as integers, like PHP arrays do.
fn key_literal(name: &str) -> Type {
    match name.parse::<i64>() {
        Ok(value) if value.to_string() == name => Type::IntLiteral(value),
        _ => Type::string_literal(name),
    }
}
