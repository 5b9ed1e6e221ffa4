use indexmap::IndexMap;
use indoc::indoc;

use crate::{CallableParameter, DEFAULT_RECURSION_FUEL, Node, Parser, StructMember, parse};

fn ident(name: &str) -> Node {
    Node::identifier(name)
}

fn render(input: &str) -> String {
    match parse(input) {
        Ok(node) => node.to_string(),
        Err(e) => format!("ERROR: {e}"),
    }
}

#[test]
fn parse_identifier() {
    assert_eq!(parse("string").unwrap(), ident("string"));
    assert_eq!(parse("non-empty-list").unwrap(), ident("non-empty-list"));
    assert_eq!(parse("\\App\\Foo").unwrap(), ident("\\App\\Foo"));
}

#[test]
fn parse_type_parameters() {
    let node = parse("array<int, list<string>>").unwrap();
    assert_eq!(
        node,
        Node::generic(
            "array",
            vec![ident("int"), Node::generic("list", vec![ident("string")])]
        )
    );
}

#[test]
fn intersection_binds_tighter_than_union() {
    let node = parse("a | b & c").unwrap();
    assert_eq!(
        node,
        Node::union(ident("a"), Node::intersection(ident("b"), ident("c")))
    );
}

#[test]
fn union_is_left_associative() {
    let node = parse("a | b | c").unwrap();
    assert_eq!(
        node,
        Node::union(Node::union(ident("a"), ident("b")), ident("c"))
    );
}

#[test]
fn parentheses_group() {
    let node = parse("(a | b) & c").unwrap();
    assert_eq!(
        node,
        Node::intersection(Node::union(ident("a"), ident("b")), ident("c"))
    );
    insta::assert_snapshot!(node.to_string(), @"(a | b) & c");
}

#[test]
fn parse_int_literals() {
    assert_eq!(parse("42").unwrap(), Node::IntLiteral(42));
    assert_eq!(parse("-42").unwrap(), Node::IntLiteral(-42));
    assert_eq!(
        parse("int<-5, max>").unwrap(),
        Node::generic("int", vec![Node::IntLiteral(-5), ident("max")])
    );
}

#[test]
fn parse_int_literal_out_of_range() {
    insta::assert_snapshot!(
        render("99999999999999999999"),
        @"ERROR: integer literal out of range: 99999999999999999999 at 0..20"
    );
}

#[test]
fn parse_string_literals() {
    assert_eq!(parse("'foo'").unwrap(), Node::string_literal("foo"));
    assert_eq!(parse("\"foo\"").unwrap(), Node::string_literal("foo"));
    assert_eq!(parse(r"'it\'s'").unwrap(), Node::string_literal("it's"));
    insta::assert_snapshot!(render("\"foo\""), @"'foo'");
    insta::assert_snapshot!(render(r"'it\'s'"), @r"'it\'s'");
}

#[test]
fn parse_struct() {
    let node = parse("array{foo: string, bar?: int}").unwrap();
    let mut members = IndexMap::new();
    members.insert("foo".to_string(), StructMember::required(ident("string")));
    members.insert("bar".to_string(), StructMember::optional(ident("int")));
    assert_eq!(node, Node::Struct(members));
    insta::assert_snapshot!(node.to_string(), @"array{foo: string, bar?: int}");
}

#[test]
fn parse_empty_shape_is_struct() {
    assert_eq!(parse("array{}").unwrap(), Node::Struct(IndexMap::new()));
    insta::assert_snapshot!(render("array{}"), @"array{}");
}

#[test]
fn parse_multiline_struct_with_trailing_comma() {
    let input = indoc! {"
        array{
            foo: string,
            bar?: string,
        }
    "};
    insta::assert_snapshot!(render(input), @"array{foo: string, bar?: string}");
}

#[test]
fn parse_struct_with_quoted_and_numeric_keys() {
    insta::assert_snapshot!(
        render("array{'foo bar': int, 0: string, \"baz\": bool}"),
        @"array{'foo bar': int, 0: string, baz: bool}"
    );
}

#[test]
fn parse_struct_member_order_is_preserved() {
    let Node::Struct(members) = parse("array{z: int, a: int, m: int}").unwrap() else {
        panic!("expected struct");
    };
    let names: Vec<_> = members.keys().map(String::as_str).collect();
    assert_eq!(names, ["z", "a", "m"]);
}

#[test]
fn parse_tuple() {
    let node = parse("array{string, int}").unwrap();
    assert_eq!(node, Node::Tuple(vec![ident("string"), ident("int")]));
    insta::assert_snapshot!(node.to_string(), @"array{string, int}");
}

#[test]
fn parse_tuple_of_literals() {
    let node = parse("array{'a', 'b'}").unwrap();
    assert_eq!(
        node,
        Node::Tuple(vec![Node::string_literal("a"), Node::string_literal("b")])
    );
}

#[test]
fn parse_array_without_shape_is_identifier() {
    assert_eq!(parse("array").unwrap(), ident("array"));
}

#[test]
fn parse_duplicate_struct_key() {
    insta::assert_snapshot!(
        render("array{a: int, a: string}"),
        @"ERROR: duplicate array shape key 'a' at 14..15"
    );
}

#[test]
fn parse_mixed_shape_entries() {
    insta::assert_snapshot!(
        render("array{a: int, string}"),
        @"ERROR: cannot mix keyed and positional entries in array shape at 14..20"
    );
}

#[test]
fn parse_callable() {
    let node = parse("callable(string, int=): void").unwrap();
    assert_eq!(
        node,
        Node::callable(
            ident("void"),
            vec![
                CallableParameter::required(ident("string")),
                CallableParameter::optional(ident("int")),
            ]
        )
    );
    insta::assert_snapshot!(node.to_string(), @"callable(string, int=): void");
}

#[test]
fn parse_callable_without_parameters() {
    assert_eq!(
        parse("callable(): void").unwrap(),
        Node::callable(ident("void"), Vec::new())
    );
}

#[test]
fn callable_return_type_is_a_primary() {
    let node = parse("callable(): int | null").unwrap();
    assert_eq!(
        node,
        Node::union(Node::callable(ident("int"), Vec::new()), ident("null"))
    );
    insta::assert_snapshot!(node.to_string(), @"callable(): int | null");

    let node = parse("callable(): (int | null)").unwrap();
    assert_eq!(
        node,
        Node::callable(Node::union(ident("int"), ident("null")), Vec::new())
    );
    insta::assert_snapshot!(node.to_string(), @"callable(): (int | null)");
}

#[test]
fn parse_errors() {
    insta::assert_snapshot!(render(""), @"ERROR: expected type, got EOF at 0..0");
    insta::assert_snapshot!(render("list<string"), @"ERROR: expected RAngle, got EOF at 11..11");
    insta::assert_snapshot!(render("string int"), @r#"ERROR: unexpected Ident("int") after type at 7..10"#);
    insta::assert_snapshot!(render("string %"), @r#"ERROR: unexpected character: "%" at 7..8"#);
    insta::assert_snapshot!(render("callable(string)"), @"ERROR: expected Colon, got EOF at 16..16");
}

#[test]
fn recursion_fuel_limits_nesting() {
    let input = "list<list<list<int>>>";

    let err = Parser::new(input)
        .unwrap()
        .with_recursion_fuel(2)
        .parse()
        .unwrap_err();
    insta::assert_snapshot!(err, @"recursion limit exceeded at 10..14");

    assert!(
        Parser::new(input)
            .unwrap()
            .with_recursion_fuel(3)
            .parse()
            .is_ok()
    );
}

#[test]
fn default_recursion_fuel_rejects_deep_nesting() {
    let depth = DEFAULT_RECURSION_FUEL as usize + 1;
    let input = format!("{}int{}", "list<".repeat(depth), ">".repeat(depth));
    let err = parse(&input).unwrap_err();
    assert_eq!(err.message, "recursion limit exceeded");
}

#[test]
fn callable_return_types_consume_recursion_fuel() {
    let input = format!("{}int", "callable(): ".repeat(20));

    let err = Parser::new(&input)
        .unwrap()
        .with_recursion_fuel(5)
        .parse()
        .unwrap_err();
    assert_eq!(err.message, "recursion limit exceeded");

    assert!(
        Parser::new(&input)
            .unwrap()
            .with_recursion_fuel(21)
            .parse()
            .is_ok()
    );
}

#[test]
fn default_recursion_fuel_rejects_long_callable_chains() {
    let input = format!("{}int", "callable(): ".repeat(100_000));
    let err = parse(&input).unwrap_err();
    assert_eq!(err.message, "recursion limit exceeded");
}
