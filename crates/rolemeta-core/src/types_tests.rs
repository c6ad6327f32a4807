use crate::types::{Primitive, TypeRef, WildcardBound, parse_type};

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parse_named() {
    assert_eq!(parse_type("Block", &[]).unwrap(), TypeRef::named("Block"));
    assert_eq!(
        parse_type("code.Block", &[]).unwrap(),
        TypeRef::named("code.Block")
    );
}

#[test]
fn parse_parameterized() {
    let ty = parse_type("Map<String, List<Expression>>", &[]).unwrap();
    assert_eq!(
        ty,
        TypeRef::generic(
            "Map",
            vec![
                TypeRef::named("String"),
                TypeRef::generic("List", vec![TypeRef::named("Expression")]),
            ]
        )
    );
    assert_eq!(ty.to_string(), "Map<String, List<Expression>>");
}

#[test]
fn parse_wildcards() {
    let ty = parse_type("List<? extends Expression>", &[]).unwrap();
    assert_eq!(
        ty.type_args(),
        &[TypeRef::wildcard_extends(TypeRef::named("Expression"))]
    );

    let ty = parse_type("Set<? super Statement>", &[]).unwrap();
    assert_eq!(
        ty.type_args()[0],
        TypeRef::Wildcard(WildcardBound::Super(Box::new(TypeRef::named("Statement"))))
    );

    let ty = parse_type("Reference<?>", &[]).unwrap();
    assert_eq!(ty.type_args(), &[TypeRef::unbounded_wildcard()]);
    assert_eq!(ty.to_string(), "Reference<?>");
}

#[test]
fn parse_type_variables() {
    let ty = parse_type("Expression<T>", &params(&["T"])).unwrap();
    assert_eq!(ty.type_args(), &[TypeRef::Variable("T".to_string())]);

    // Without the declaration, `T` is an ordinary named type.
    let ty = parse_type("Expression<T>", &[]).unwrap();
    assert_eq!(ty.type_args(), &[TypeRef::named("T")]);

    let ty = parse_type("? extends T", &params(&["T"])).unwrap();
    assert_eq!(
        ty,
        TypeRef::wildcard_extends(TypeRef::Variable("T".to_string()))
    );
}

#[test]
fn parse_primitives_and_top() {
    assert_eq!(
        parse_type("boolean", &[]).unwrap(),
        TypeRef::Primitive(Primitive::Boolean)
    );
    assert_eq!(parse_type("Object", &[]).unwrap(), TypeRef::Top);
    assert_eq!(TypeRef::Top.to_string(), "Object");
}

#[test]
fn boxing() {
    assert_eq!(
        TypeRef::Primitive(Primitive::Int).boxed(),
        TypeRef::named("Integer")
    );
    assert_eq!(
        TypeRef::Primitive(Primitive::Char).boxed(),
        TypeRef::named("Character")
    );
    assert_eq!(TypeRef::named("Block").boxed(), TypeRef::named("Block"));
}

#[test]
fn parse_errors_carry_spans() {
    let err = parse_type("List<Block", &[]).unwrap_err();
    assert_eq!(err.span, 10..10);

    let err = parse_type("Block Block", &[]).unwrap_err();
    assert_eq!(err.message, "unexpected trailing input");
    assert_eq!(err.span, 6..11);

    let err = parse_type("List<#>", &[]).unwrap_err();
    assert_eq!(err.span, 5..6);

    assert!(parse_type("", &[]).is_err());
}
