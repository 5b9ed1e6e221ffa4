//! The type model.
//!
//! # Overview
//!
//! [`Type`] is a closed set of variants. Values are immutable trees that own
//! their children; equality is structural. New types are produced by
//! construction, never by editing an existing one.
//!
//! # Design Decisions
//!
//! ## Maps validate their key
//!
//! A map key must itself be a subtype of `string | int`. [`MapType`] keeps its
//! fields private so the only way to obtain one is [`MapType::new`], which
//! performs that check.
//!
//! ## Intersections merge array shapes
//!
//! [`Type::intersection`] flattens both operands and merges every struct
//! leaf into one struct: shared members intersect their types and stay
//! optional only if optional on both sides. The result holds at most one
//! struct leaf.
//!
//! ## Unions stay binary
//!
//! Unions and intersections are binary trees, as parsed. Set-style checks
//! use [`Type::union_members`] and [`Type::intersection_members`].

mod render;

#[cfg(test)]
mod types_tests;

use indexmap::IndexMap;

use crate::compat::is_subtype;
use crate::{Error, Result};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Type {
    /// Bottom type. Accepted by nothing, not even itself.
    Never,
    /// Top type.
    Mixed,
    Void,
    Null,
    Scalar,
    Resource,
    /// `bool`, or `true` / `false` when the literal is known.
    Bool(Option<bool>),
    /// Integer range; an absent bound is unbounded.
    Int { min: Option<i64>, max: Option<i64> },
    IntLiteral(i64),
    Float,
    /// `string`, `non-empty-string` or `numeric-string`.
    ///
    /// A numeric string counts as non-empty whether or not `non_empty` is set.
    String { non_empty: bool, numeric: bool },
    StringLiteral(String),
    /// Nominal class, interface or enum.
    ClassLike(ClassLike),
    /// `class-string` or `class-string<T>`.
    ClassString(Option<Box<Type>>),
    List { element: Box<Type>, non_empty: bool },
    Map(MapType),
    Iterable { key: Box<Type>, value: Box<Type> },
    Tuple(Vec<Type>),
    Struct(IndexMap<String, StructMember>),
    Callable {
        return_type: Box<Type>,
        parameters: Vec<CallableParameter>,
    },
    Union(Box<Type>, Box<Type>),
    /// Prefer [`Type::intersection`], which merges array shapes.
    Intersection(Box<Type>, Box<Type>),
}

/// A named nominal type.
///
/// Parents form the declared hierarchy walked by the subtype check. The
/// graph must be acyclic: the check does not guard against cycles.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClassLike {
    pub name: String,
    pub type_parameters: Vec<Type>,
    pub parents: Vec<ClassLike>,
}

impl ClassLike {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_parameters: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<Type>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_parents(mut self, parents: Vec<ClassLike>) -> Self {
        self.parents = parents;
        self
    }
}

impl From<ClassLike> for Type {
    fn from(class: ClassLike) -> Self {
        Type::ClassLike(class)
    }
}

/// `array<K, V>` / `non-empty-array<K, V>` with a validated key type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MapType {
    key: Box<Type>,
    value: Box<Type>,
    non_empty: bool,
}

impl MapType {
    /// Fails with [`Error::InvalidArrayKey`] unless `key` is a subtype of
    /// `string | int`.
    pub fn new(key: Type, value: Type, non_empty: bool) -> Result<Self> {
        if !is_subtype(&Type::array_key(), &key) {
            return Err(Error::InvalidArrayKey { key });
        }
        Ok(Self {
            key: Box::new(key),
            value: Box::new(value),
            non_empty,
        })
    }

    pub fn key(&self) -> &Type {
        &self.key
    }

    pub fn value(&self) -> &Type {
        &self.value
    }

    pub fn is_non_empty(&self) -> bool {
        self.non_empty
    }
}

/// Member of an array shape.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StructMember {
    pub ty: Type,
    pub optional: bool,
}

impl StructMember {
    pub fn required(ty: Type) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: Type) -> Self {
        Self { ty, optional: true }
    }
}

/// Parameter of a callable signature.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CallableParameter {
    pub ty: Type,
    pub optional: bool,
}

impl CallableParameter {
    pub fn required(ty: Type) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: Type) -> Self {
        Self { ty, optional: true }
    }
}

impl Type {
    pub fn bool() -> Self {
        Type::Bool(None)
    }

    pub fn bool_literal(value: bool) -> Self {
        Type::Bool(Some(value))
    }

    pub fn int() -> Self {
        Type::Int {
            min: None,
            max: None,
        }
    }

    /// `int<min, max>`, `None` being unbounded. Callers keep `min <= max`;
    /// the builder reports inverted text ranges as an error.
    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Self {
        if let (Some(min), Some(max)) = (min, max) {
            debug_assert!(min <= max, "inverted int range {min}..{max}");
        }
        Type::Int { min, max }
    }

    /// `int<1, max>`
    pub fn positive_int() -> Self {
        Type::int_range(Some(1), None)
    }

    /// `int<min, -1>`
    pub fn negative_int() -> Self {
        Type::int_range(None, Some(-1))
    }

    pub fn string() -> Self {
        Type::String {
            non_empty: false,
            numeric: false,
        }
    }

    pub fn non_empty_string() -> Self {
        Type::String {
            non_empty: true,
            numeric: false,
        }
    }

    pub fn numeric_string() -> Self {
        Type::String {
            non_empty: true,
            numeric: true,
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Type::StringLiteral(value.into())
    }

    /// `string | int`, the set of valid array keys.
    pub fn array_key() -> Self {
        Type::union(Type::string(), Type::int())
    }

    pub fn class_string(class: Option<Type>) -> Self {
        Type::ClassString(class.map(Box::new))
    }

    pub fn list(element: Type) -> Self {
        Type::List {
            element: Box::new(element),
            non_empty: false,
        }
    }

    pub fn non_empty_list(element: Type) -> Self {
        Type::List {
            element: Box::new(element),
            non_empty: true,
        }
    }

    pub fn map(key: Type, value: Type) -> Result<Self> {
        MapType::new(key, value, false).map(Type::Map)
    }

    pub fn non_empty_map(key: Type, value: Type) -> Result<Self> {
        MapType::new(key, value, true).map(Type::Map)
    }

    pub fn iterable(key: Type, value: Type) -> Self {
        Type::Iterable {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn callable(return_type: Type, parameters: Vec<CallableParameter>) -> Self {
        Type::Callable {
            return_type: Box::new(return_type),
            parameters,
        }
    }

    /// Plain binary union; no simplification.
    pub fn union(left: Type, right: Type) -> Self {
        Type::Union(Box::new(left), Box::new(right))
    }

    /// Intersection with array shapes merged.
    ///
    /// Both operands are flattened; all struct leaves collapse into one
    /// struct placed where the first struct leaf was. Returns the merged
    /// struct itself when nothing else remains.
    pub fn intersection(left: Type, right: Type) -> Self {
        let mut leaves: Vec<Type> = Vec::new();
        let mut struct_slot: Option<usize> = None;

        for leaf in left
            .into_intersection_members()
            .into_iter()
            .chain(right.into_intersection_members())
        {
            match (leaf, struct_slot) {
                (Type::Struct(members), Some(slot)) => {
                    if let Type::Struct(merged) = &mut leaves[slot] {
                        merge_struct_members(merged, members);
                    }
                }
                (leaf @ Type::Struct(_), None) => {
                    struct_slot = Some(leaves.len());
                    leaves.push(leaf);
                }
                (leaf, _) => leaves.push(leaf),
            }
        }

        let mut leaves = leaves.into_iter();
        let Some(first) = leaves.next() else {
            return Type::Mixed;
        };
        leaves.fold(first, |acc, leaf| {
            Type::Intersection(Box::new(acc), Box::new(leaf))
        })
    }

    /// Leaves of a union tree in left-to-right order. A non-union type is
    /// its own single leaf.
    pub fn union_members(&self) -> Vec<&Type> {
        let mut out = Vec::new();
        collect_members(self, &mut out, |ty| match ty {
            Type::Union(left, right) => Some((left, right)),
            _ => None,
        });
        out
    }

    /// Leaves of an intersection tree in left-to-right order.
    pub fn intersection_members(&self) -> Vec<&Type> {
        let mut out = Vec::new();
        collect_members(self, &mut out, |ty| match ty {
            Type::Intersection(left, right) => Some((left, right)),
            _ => None,
        });
        out
    }

    fn into_intersection_members(self) -> Vec<Type> {
        match self {
            Type::Intersection(left, right) => {
                let mut out = left.into_intersection_members();
                out.extend(right.into_intersection_members());
                out
            }
            other => vec![other],
        }
    }
}

fn collect_members<'a>(
    ty: &'a Type,
    out: &mut Vec<&'a Type>,
    split: fn(&'a Type) -> Option<(&'a Box<Type>, &'a Box<Type>)>,
) {
    match split(ty) {
        Some((left, right)) => {
            collect_members(left, out, split);
            collect_members(right, out, split);
        }
        None => out.push(ty),
    }
}

/// Folds `from` into `into`: shared members intersect, the rest are appended.
fn merge_struct_members(
    into: &mut IndexMap<String, StructMember>,
    from: IndexMap<String, StructMember>,
) {
    for (name, member) in from {
        match into.get_mut(&name) {
            Some(existing) => {
                if existing.ty != member.ty {
                    let ty = std::mem::replace(&mut existing.ty, Type::Mixed);
                    existing.ty = Type::intersection(ty, member.ty);
                }
                existing.optional = existing.optional && member.optional;
            }
            None => {
                into.insert(name, member);
            }
        }
    }
}
