use crate::Role;

#[test]
fn names_round_trip() {
    for &role in Role::ALL {
        assert_eq!(Role::from_name(role.name()), Some(role));
        assert_eq!(role.name().parse::<Role>(), Ok(role));
    }
}

#[test]
fn unknown_name_is_rejected() {
    assert_eq!(Role::from_name("body"), None);
    let err = "NOPE".parse::<Role>().unwrap_err();
    assert_eq!(err.to_string(), "unknown role `NOPE`");
}

#[test]
fn roles_order_by_name() {
    assert!(Role::Annotation < Role::AnnotationType);
    assert!(Role::Type < Role::TypeArgument);
    assert!(Role::Parent < Role::Statement);

    let mut sorted = Role::ALL.to_vec();
    sorted.sort();
    let names: Vec<_> = sorted.iter().map(|r| r.name()).collect();
    let mut expected = names.clone();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[test]
fn parent_is_the_only_back_reference() {
    let back_refs: Vec<_> = Role::ALL
        .iter()
        .filter(|r| !r.is_containment())
        .collect();
    assert_eq!(back_refs, vec![&Role::Parent]);
}

#[test]
fn serde_uses_stable_names() {
    let json = serde_json::to_string(&Role::TypeArgument).unwrap();
    assert_eq!(json, "\"TYPE_ARGUMENT\"");
    let role: Role = serde_json::from_str("\"BODY\"").unwrap();
    assert_eq!(role, Role::Body);
}
