use indexmap::IndexMap;

use super::*;

fn shape(members: &[(&str, StructMember)]) -> Type {
    Type::Struct(
        members
            .iter()
            .map(|(name, member)| (name.to_string(), member.clone()))
            .collect(),
    )
}

#[test]
fn map_accepts_valid_keys() {
    assert!(Type::map(Type::array_key(), Type::Mixed).is_ok());
    assert!(Type::map(Type::int(), Type::Mixed).is_ok());
    assert!(Type::map(Type::non_empty_string(), Type::Mixed).is_ok());
    assert!(Type::map(Type::string_literal("a"), Type::Mixed).is_ok());
    assert!(Type::map(Type::int_range(Some(0), Some(10)), Type::Mixed).is_ok());
}

#[test]
fn map_rejects_invalid_key() {
    let err = Type::map(Type::bool(), Type::string()).unwrap_err();
    insta::assert_snapshot!(err, @"Can't use bool as array key. Only strings and integers are allowed.");

    let err = Type::non_empty_map(Type::Float, Type::string()).unwrap_err();
    assert_eq!(err, Error::InvalidArrayKey { key: Type::Float });
}

#[test]
fn map_getters() {
    let map = MapType::new(Type::int(), Type::string(), true).unwrap();
    assert_eq!(map.key(), &Type::int());
    assert_eq!(map.value(), &Type::string());
    assert!(map.is_non_empty());
}

#[test]
fn union_members_in_order() {
    let ty = Type::union(
        Type::union(Type::string(), Type::int()),
        Type::union(Type::Null, Type::Float),
    );
    assert_eq!(
        ty.union_members(),
        vec![&Type::string(), &Type::int(), &Type::Null, &Type::Float]
    );
    assert_eq!(Type::Null.union_members(), vec![&Type::Null]);
}

#[test]
fn intersection_members_stop_at_unions() {
    let union = Type::union(Type::Null, Type::Float);
    let ty = Type::Intersection(
        Box::new(Type::ClassLike(ClassLike::new("Foo"))),
        Box::new(union.clone()),
    );
    assert_eq!(
        ty.intersection_members(),
        vec![&Type::ClassLike(ClassLike::new("Foo")), &union]
    );
}

#[test]
fn intersection_keeps_non_struct_leaves() {
    let foo: Type = ClassLike::new("Foo").into();
    let bar: Type = ClassLike::new("Bar").into();
    let ty = Type::intersection(foo.clone(), bar.clone());
    assert_eq!(ty, Type::Intersection(Box::new(foo), Box::new(bar)));
}

#[test]
fn intersection_merges_structs() {
    let left = shape(&[
        ("a", StructMember::required(Type::string())),
        ("b", StructMember::optional(Type::int())),
    ]);
    let right = shape(&[
        ("b", StructMember::optional(Type::int())),
        ("c", StructMember::optional(Type::Float)),
    ]);

    let merged = Type::intersection(left, right);

    let expected = shape(&[
        ("a", StructMember::required(Type::string())),
        ("b", StructMember::optional(Type::int())),
        ("c", StructMember::optional(Type::Float)),
    ]);
    assert_eq!(merged, expected);
}

#[test]
fn intersection_member_optional_only_if_optional_on_both_sides() {
    let left = shape(&[("a", StructMember::optional(Type::string()))]);
    let right = shape(&[("a", StructMember::required(Type::string()))]);

    let merged = Type::intersection(left, right);

    assert_eq!(merged, shape(&[("a", StructMember::required(Type::string()))]));
}

#[test]
fn intersection_member_types_intersect() {
    let foo: Type = ClassLike::new("Foo").into();
    let bar: Type = ClassLike::new("Bar").into();
    let left = shape(&[("a", StructMember::required(foo.clone()))]);
    let right = shape(&[("a", StructMember::required(bar.clone()))]);

    let merged = Type::intersection(left, right);

    let Type::Struct(members) = merged else {
        panic!("expected struct");
    };
    assert_eq!(
        members["a"].ty,
        Type::Intersection(Box::new(foo), Box::new(bar))
    );
}

#[test]
fn intersection_holds_one_struct_in_first_struct_position() {
    let foo: Type = ClassLike::new("Foo").into();
    let bar: Type = ClassLike::new("Bar").into();
    let a = shape(&[("a", StructMember::required(Type::int()))]);
    let b = shape(&[("b", StructMember::required(Type::int()))]);

    let ty = Type::intersection(
        Type::intersection(foo.clone(), a),
        Type::intersection(b, bar.clone()),
    );

    let leaves = ty.intersection_members();
    assert_eq!(leaves.len(), 3);
    assert_eq!(leaves[0], &foo);
    assert_eq!(
        leaves[1],
        &shape(&[
            ("a", StructMember::required(Type::int())),
            ("b", StructMember::required(Type::int())),
        ])
    );
    assert_eq!(leaves[2], &bar);
}

#[test]
fn intersection_of_structs_alone_is_a_struct() {
    let a = shape(&[("a", StructMember::required(Type::int()))]);
    let empty = Type::Struct(IndexMap::new());
    assert_eq!(Type::intersection(a.clone(), empty), a);
}

#[test]
fn class_like_builders() {
    let parent = ClassLike::new("FooInterface");
    let class = ClassLike::new("Foo")
        .with_type_parameters(vec![Type::int()])
        .with_parents(vec![parent.clone()]);
    assert_eq!(class.name, "Foo");
    assert_eq!(class.type_parameters, vec![Type::int()]);
    assert_eq!(class.parents, vec![parent]);
}

#[test]
fn named_constructors() {
    assert_eq!(Type::positive_int(), Type::Int { min: Some(1), max: None });
    assert_eq!(Type::negative_int(), Type::Int { min: None, max: Some(-1) });
    assert_eq!(
        Type::numeric_string(),
        Type::String {
            non_empty: true,
            numeric: true
        }
    );
    assert_eq!(
        Type::array_key(),
        Type::Union(Box::new(Type::string()), Box::new(Type::int()))
    );
    assert_eq!(Type::class_string(None), Type::ClassString(None));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "inverted int range 10..0")]
fn int_range_rejects_inverted_bounds() {
    Type::int_range(Some(10), Some(0));
}
