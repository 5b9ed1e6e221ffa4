//! Named-type registry.
//!
//! A [`Scope`] maps names to either a fixed type or a constructor that takes
//! the type parameters written after the name. [`Scope::global`] knows the
//! PHPDoc built-ins; callers register their own classes on top.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{MapType, Type};
use crate::{Error, Result};

/// Builds a type from its type parameters.
pub type Constructor = Arc<dyn Fn(Vec<Type>) -> Result<Type> + Send + Sync>;

#[derive(Clone)]
pub enum Entry {
    /// Resolves to this type; type parameters are ignored.
    Fixed(Type),
    Parametric(Constructor),
}

impl Entry {
    pub fn parametric(
        constructor: impl Fn(Vec<Type>) -> Result<Type> + Send + Sync + 'static,
    ) -> Self {
        Entry::Parametric(Arc::new(constructor))
    }
}

impl From<Type> for Entry {
    fn from(ty: Type) -> Self {
        Entry::Fixed(ty)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Fixed(ty) => f.debug_tuple("Fixed").field(ty).finish(),
            Entry::Parametric(_) => f.write_str("Parametric(..)"),
        }
    }
}

/// Name to type registry, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    entries: IndexMap<String, Entry>,
}

impl Scope {
    /// Empty scope. Not even `int` resolves through it; see [`Scope::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope with the PHPDoc built-in names registered.
    ///
    /// `int` is absent: its bounds are literals, not types, so the builder
    /// handles it directly.
    pub fn global() -> Self {
        let mut scope = Self::new();
        scope.register("array", Entry::parametric(|params| map(params, false)));
        scope.register("array-key", Type::array_key());
        scope.register("class-string", Entry::parametric(class_string));
        scope.register("bool", Type::bool());
        scope.register("false", Type::bool_literal(false));
        scope.register("float", Type::Float);
        scope.register("iterable", Entry::parametric(iterable));
        scope.register("list", Entry::parametric(|params| list(params, false)));
        scope.register("mixed", Type::Mixed);
        scope.register("negative-int", Type::negative_int());
        scope.register("never", Type::Never);
        scope.register(
            "non-empty-array",
            Entry::parametric(|params| map(params, true)),
        );
        scope.register(
            "non-empty-list",
            Entry::parametric(|params| list(params, true)),
        );
        scope.register("non-empty-string", Type::non_empty_string());
        scope.register("null", Type::Null);
        scope.register("numeric-string", Type::numeric_string());
        scope.register("positive-int", Type::positive_int());
        scope.register("resource", Type::Resource);
        scope.register("scalar", Type::Scalar);
        scope.register("string", Type::string());
        scope.register("true", Type::bool_literal(true));
        scope.register("void", Type::Void);
        scope
    }

    /// Adds `name`, replacing any previous entry of that name.
    pub fn register(&mut self, name: impl Into<String>, entry: impl Into<Entry>) {
        self.entries.insert(name.into(), entry.into());
    }

    pub fn resolve(&self, name: &str, type_parameters: Vec<Type>) -> Result<Type> {
        match self.entries.get(name) {
            Some(Entry::Fixed(ty)) => Ok(ty.clone()),
            Some(Entry::Parametric(constructor)) => constructor(type_parameters),
            None => Err(Error::UnknownType {
                name: name.to_owned(),
                parameters: type_parameters,
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, oldest first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn list(mut params: Vec<Type>, non_empty: bool) -> Result<Type> {
    if params.len() != 1 {
        return Err(Error::ListArity(params));
    }
    let element = Box::new(params.remove(0));
    Ok(Type::List { element, non_empty })
}

fn map(params: Vec<Type>, non_empty: bool) -> Result<Type> {
    if params.len() > 2 {
        let name = if non_empty { "non-empty-array" } else { "array" };
        return Err(Error::ArrayArity {
            name: name.to_owned(),
            parameters: params,
        });
    }
    let mut params = params.into_iter();
    let (key, value) = match (params.next(), params.next()) {
        (None, _) => (Type::array_key(), Type::Mixed),
        (Some(value), None) => (Type::array_key(), value),
        (Some(key), Some(value)) => (key, value),
    };
    MapType::new(key, value, non_empty).map(Type::Map)
}

fn iterable(params: Vec<Type>) -> Result<Type> {
    let mut params = params.into_iter();
    let ty = match (params.next(), params.next(), params.next()) {
        (None, _, _) => Type::iterable(Type::Mixed, Type::Mixed),
        (Some(value), None, _) => Type::iterable(Type::Mixed, value),
        (Some(key), Some(value), None) => Type::iterable(key, value),
        _ => return Err(Error::IterableArity),
    };
    Ok(ty)
}

fn class_string(params: Vec<Type>) -> Result<Type> {
    let mut params = params.into_iter();
    match (params.next(), params.next()) {
        (class, None) => Ok(Type::class_string(class)),
        _ => Err(Error::ClassStringArity),
    }
}
