use rolemeta_core::Role;

use crate::test_utils::{fixture_tree, literal, literal_value, sample};
use crate::{AccessError, FieldValue, NodeId, SourcePosition, Tree, Value};

fn statements(tree: &Tree, block: NodeId) -> Vec<NodeId> {
    tree.get(block, Role::Statement).unwrap().nodes().collect()
}

#[test]
fn create_unknown_type() {
    let mut tree = fixture_tree();
    let err = tree.create("Nope").unwrap_err();
    assert_eq!(err, AccessError::UnknownNodeType("Nope".to_string()));
    assert!(tree.is_empty());
}

#[test]
fn new_node_has_every_role_empty() {
    let mut tree = fixture_tree();
    let block = tree.create("Block").unwrap();
    let roles: Vec<_> = tree.slots(block).map(|(role, _)| role).collect();
    assert_eq!(roles, [Role::Statement, Role::Label, Role::Annotation]);
    assert!(tree.slots(block).all(|(_, value)| value.is_empty()));

    let class = tree.create("Class").unwrap();
    let kinds: Vec<_> = tree
        .slots(class)
        .map(|(role, value)| format!("{role} {}", value.kind()))
        .collect();
    assert_eq!(
        kinds,
        [
            "MODIFIER SET",
            "METHOD LIST",
            "NESTED_TYPE SET",
            "NAME SINGLE",
            "ANNOTATION LIST"
        ]
    );
    assert_eq!(tree.parent(class), None);
    assert!(!tree.is_implicit(class));
    assert_eq!(tree.position(class), None);
}

#[test]
fn navigation() {
    let s = sample();
    let tree = &s.tree;
    let [first, second] = s.returns;

    assert_eq!(tree.children(s.block), [first, second]);
    assert_eq!(tree.children(s.invocation), s.literals[1..]);
    assert_eq!(
        tree.subtree(s.block),
        [
            s.block,
            first,
            s.literals[0],
            second,
            s.invocation,
            s.literals[1],
            s.literals[2]
        ]
    );
    assert_eq!(tree.descendants(s.block).len(), 6);

    let ancestors: Vec<_> = tree.ancestors(s.literals[2]).collect();
    assert_eq!(ancestors, [s.invocation, second, s.block]);
    assert!(tree.has_parent(s.literals[2], s.block));
    assert!(!tree.has_parent(s.block, s.literals[2]));
    assert!(!tree.has_parent(s.block, s.block));

    assert_eq!(tree.parent_of_type(s.literals[1], "Statement"), Some(second));
    assert_eq!(tree.parent_of_type(s.literals[1], "Block"), Some(s.block));
    assert_eq!(tree.parent_of_type(s.literals[1], "Class"), None);

    assert!(tree.is_instance_of(s.literals[0], "Expression"));
    assert!(tree.is_instance_of(s.literals[0], "Element"));
    assert!(!tree.is_instance_of(s.literals[0], "Statement"));
    assert!(!tree.is_instance_of(s.literals[0], "Nope"));
    assert_eq!(tree.type_name(s.invocation), "Invocation");
}

#[test]
fn set_parent_rejects_loops() {
    let mut tree = fixture_tree();
    let a = tree.create("Block").unwrap();
    let b = tree.create("Block").unwrap();
    tree.set_parent(a, Some(b)).unwrap();

    let err = tree.set_parent(b, Some(a)).unwrap_err();
    assert_eq!(err, AccessError::OwnershipCycle { parent: a, child: b });
    let err = tree.set_parent(a, Some(a)).unwrap_err();
    assert_eq!(err, AccessError::OwnershipCycle { parent: a, child: a });
    assert_eq!(tree.parent(a), Some(b));
    assert_eq!(tree.parent(b), None);

    let mut s = sample();
    let err = s.tree.set_parent(s.block, Some(s.literals[2])).unwrap_err();
    assert!(matches!(err, AccessError::OwnershipCycle { .. }));
    assert_eq!(s.tree.subtree(s.block).len(), 7);
}

#[test]
fn create_with_fills_roles_directly() {
    let mut tree = fixture_tree();
    let return_type = tree.create("TypeReference").unwrap();
    let body = tree.create("Block").unwrap();
    let holder = tree.create("Block").unwrap();
    tree.add(holder, Role::Statement, body).unwrap();

    let method = tree
        .create_with(
            "Method",
            [
                (Role::Name, FieldValue::from(Value::from("run"))),
                (Role::Type, FieldValue::from(return_type)),
                (Role::Body, FieldValue::from(body)),
            ],
        )
        .unwrap();

    assert_eq!(tree.get(method, Role::Type).unwrap(), FieldValue::from(return_type));
    assert_eq!(tree.parent(return_type), Some(method));
    assert_eq!(tree.parent(body), Some(method));
    assert_eq!(tree.size(holder, Role::Statement).unwrap(), 0);

    // Filled by the producer, still read-only for everyone else.
    let err = tree.set(method, Role::Type, FieldValue::Single(None)).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { role: Role::Type, .. }));
    let err = tree.add(method, Role::Parameter, return_type).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { .. }));
    let err = tree.put(method, Role::TypeParameter, "T", return_type).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { .. }));
    assert_eq!(tree.get(method, Role::Type).unwrap(), FieldValue::from(return_type));

    // Writable roles keep going through their handlers.
    tree.set(method, Role::Name, Value::from("stop")).unwrap();
    assert_eq!(
        tree.get(method, Role::Name).unwrap(),
        FieldValue::from(Value::from("stop"))
    );
}

#[test]
fn create_with_rejects_bad_fields() {
    let mut tree = fixture_tree();
    let ty = tree.create("TypeReference").unwrap();
    let before = tree.len();

    let err = tree
        .create_with("Method", [(Role::Parameter, FieldValue::from(ty))])
        .unwrap_err();
    insta::assert_snapshot!(err, @"expected a LIST value, found SINGLE");

    let err = tree
        .create_with(
            "Method",
            [
                (Role::Type, FieldValue::from(ty)),
                (Role::Parameter, FieldValue::List(vec![Value::Node(ty)])),
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::DuplicateNode {
            role: Role::Parameter,
            child: ty,
        }
    );

    let err = tree
        .create_with("Block", [(Role::Value, FieldValue::from(Value::Int(1)))])
        .unwrap_err();
    assert!(matches!(err, AccessError::HandlerNotFound { role: Role::Value, .. }));

    let no_fields: [(Role, FieldValue); 0] = [];
    let err = tree.create_with("Nope", no_fields).unwrap_err();
    assert_eq!(err, AccessError::UnknownNodeType("Nope".to_string()));

    assert_eq!(tree.len(), before);
    assert_eq!(tree.parent(ty), None);
}

#[test]
fn signature_renders_filled_roles() {
    let mut s = sample();
    s.tree.set(s.block, Role::Label, Value::from("outer")).unwrap();
    insta::assert_snapshot!(
        s.tree.signature(s.block),
        @r#"Block(STATEMENT=[Return(EXPRESSION=Literal(VALUE=1)), Return(EXPRESSION=Invocation(ARGUMENT=[Literal(VALUE=2), Literal(VALUE=3)]))], LABEL="outer")"#
    );

    let empty = s.tree.create("Return").unwrap();
    assert_eq!(s.tree.signature(empty), "Return");

    let annotation = s.tree.create("Annotation").unwrap();
    let since = literal(&mut s.tree, 7);
    s.tree
        .set(annotation, Role::AnnotationType, Value::from("Since"))
        .unwrap();
    s.tree.put(annotation, Role::Value, "value", since).unwrap();
    insta::assert_snapshot!(
        s.tree.signature(annotation),
        @r#"Annotation(ANNOTATION_TYPE="Since", VALUE={value: Literal(VALUE=7)})"#
    );

    let class = s.tree.create("Class").unwrap();
    s.tree.add(class, Role::Modifier, "public").unwrap();
    s.tree.add(class, Role::Modifier, "final").unwrap();
    insta::assert_snapshot!(s.tree.signature(class), @r#"Class(MODIFIER={"public", "final"})"#);
}

#[test]
fn position_and_implicit_flag() {
    let mut tree = fixture_tree();
    let block = tree.create("Block").unwrap();
    tree.set_position(block, Some(SourcePosition::new(3, 7)));
    tree.set_implicit(block, true);

    assert_eq!(tree.position(block).unwrap().to_string(), "3:7");
    assert!(tree.is_implicit(block));
}

#[test]
fn replace_in_list_keeps_index() {
    let mut s = sample();
    let [first, second] = s.returns;
    let fresh = s.tree.create("Return").unwrap();

    s.tree.replace(first, fresh).unwrap();

    assert_eq!(statements(&s.tree, s.block), [fresh, second]);
    assert_eq!(s.tree.parent(fresh), Some(s.block));
    assert_eq!(s.tree.parent(first), None);
    // The detached subtree stays intact.
    assert_eq!(s.tree.parent(s.literals[0]), Some(first));
}

#[test]
fn replace_with_sibling_from_same_list() {
    let mut tree = fixture_tree();
    let block = tree.create("Block").unwrap();
    let stmts: Vec<_> = (0..3).map(|_| tree.create("Return").unwrap()).collect();
    for &stmt in &stmts {
        tree.add(block, Role::Statement, stmt).unwrap();
    }

    tree.replace(stmts[2], stmts[0]).unwrap();

    assert_eq!(statements(&tree, block), [stmts[1], stmts[0]]);
    assert_eq!(tree.parent(stmts[0]), Some(block));
    assert_eq!(tree.parent(stmts[2]), None);
}

#[test]
fn replace_single_value() {
    let mut s = sample();
    let fresh = literal(&mut s.tree, 9);

    s.tree.replace(s.literals[0], fresh).unwrap();

    assert_eq!(
        s.tree.get(s.returns[0], Role::Expression).unwrap(),
        FieldValue::from(fresh)
    );
    assert_eq!(s.tree.parent(fresh), Some(s.returns[0]));
    assert_eq!(s.tree.parent(s.literals[0]), None);
}

#[test]
fn replace_moves_replacement_out_of_its_holder() {
    let mut s = sample();
    let other = s.tree.create("Return").unwrap();
    let held = literal(&mut s.tree, 7);
    s.tree.set(other, Role::Expression, held).unwrap();

    s.tree.replace(s.literals[1], held).unwrap();

    assert_eq!(s.tree.get(other, Role::Expression).unwrap(), FieldValue::Single(None));
    assert_eq!(s.tree.children(s.invocation), [held, s.literals[2]]);
    assert_eq!(s.tree.parent(held), Some(s.invocation));
}

#[test]
fn replace_map_value_keeps_key() {
    let mut tree = fixture_tree();
    let annotation = tree.create("Annotation").unwrap();
    let a = literal(&mut tree, 1);
    let b = literal(&mut tree, 2);
    let fresh = literal(&mut tree, 3);
    tree.put(annotation, Role::Value, "a", a).unwrap();
    tree.put(annotation, Role::Value, "b", b).unwrap();

    tree.replace(a, fresh).unwrap();

    let FieldValue::Map(entries) = tree.get(annotation, Role::Value).unwrap() else {
        panic!("expected a map value");
    };
    let entries: Vec<_> = entries.into_iter().collect();
    assert_eq!(
        entries,
        [
            ("a".to_string(), Value::Node(fresh)),
            ("b".to_string(), Value::Node(b))
        ]
    );
    assert_eq!(tree.parent(a), None);
}

#[test]
fn replace_set_member_keeps_index() {
    let mut tree = fixture_tree();
    let class = tree.create("Class").unwrap();
    let nested: Vec<_> = (0..3).map(|_| tree.create("Class").unwrap()).collect();
    for &n in &nested {
        tree.add(class, Role::NestedType, n).unwrap();
    }
    let fresh = tree.create("Class").unwrap();

    tree.replace(nested[1], fresh).unwrap();
    assert_eq!(tree.children(class), [nested[0], fresh, nested[2]]);

    // A replacement already in the set keeps its place; the set shrinks.
    tree.replace(nested[0], nested[2]).unwrap();
    assert_eq!(tree.children(class), [fresh, nested[2]]);
    assert_eq!(tree.parent(nested[0]), None);
    assert_eq!(tree.parent(nested[2]), Some(class));
}

#[test]
fn replace_errors() {
    let mut s = sample();
    let loose = s.tree.create("Return").unwrap();

    let err = s.tree.replace(s.block, loose).unwrap_err();
    assert_eq!(err, AccessError::Detached(s.block));

    let err = s.tree.replace(s.returns[0], s.block).unwrap_err();
    assert_eq!(
        err,
        AccessError::OwnershipCycle {
            parent: s.block,
            child: s.block,
        }
    );
    let err = s.tree.replace(s.literals[0], s.block).unwrap_err();
    assert_eq!(
        err,
        AccessError::OwnershipCycle {
            parent: s.returns[0],
            child: s.block,
        }
    );

    // A back-reference without containment.
    s.tree.set_parent(loose, Some(s.block)).unwrap();
    let other = s.tree.create("Return").unwrap();
    let err = s.tree.replace(loose, other).unwrap_err();
    insta::assert_snapshot!(err, @"node #7 is not held by #0");

    assert_eq!(statements(&s.tree, s.block), s.returns);
}

#[test]
fn replace_matching_filtered() {
    let mut s = sample();
    let third = s.tree.create("Return").unwrap();
    let five = literal(&mut s.tree, 5);
    s.tree.set(third, Role::Expression, five).unwrap();
    s.tree.add(s.block, Role::Statement, third).unwrap();

    let replaced = s
        .tree
        .replace_matching(
            s.block,
            |tree, node| {
                tree.is_instance_of(node, "Literal")
                    && literal_value(tree, node).is_some_and(|n| n % 2 == 1)
            },
            |tree, node| {
                let n = literal_value(tree, node).unwrap_or_default();
                literal(tree, n * 10)
            },
        )
        .unwrap();
    assert_eq!(replaced, 3);

    let values: Vec<_> = s
        .tree
        .subtree(s.block)
        .into_iter()
        .filter_map(|node| literal_value(&s.tree, node))
        .collect();
    assert_eq!(values, [10, 2, 30, 50]);
    assert_eq!(s.tree.parent(s.literals[0]), None);
    assert_eq!(s.tree.parent(five), None);
}

#[test]
fn replace_matching_ignores_new_nodes() {
    let mut s = sample();
    let mut made = 0;
    let replaced = s
        .tree
        .replace_matching(
            s.block,
            |tree, node| tree.is_instance_of(node, "Literal"),
            |tree, _| {
                made += 1;
                literal(tree, 0)
            },
        )
        .unwrap();
    assert_eq!(replaced, 3);
    assert_eq!(made, 3);
}

#[test]
fn replace_matching_skips_detached_root() {
    let mut s = sample();
    let replaced = s
        .tree
        .replace_matching(
            s.block,
            |tree, node| tree.is_instance_of(node, "Statement"),
            |tree, _| tree.create("Return").unwrap(),
        )
        .unwrap();
    assert_eq!(replaced, 2);
    assert_eq!(s.tree.parent(s.block), None);
}

#[test]
fn annotations() {
    let mut tree = fixture_tree();
    let class = tree.create("Class").unwrap();
    let method = tree.create("Method").unwrap();
    tree.add(class, Role::Method, method).unwrap();

    let deprecated = tree.create("Annotation").unwrap();
    let type_ref = tree.create("TypeReference").unwrap();
    tree.set(type_ref, Role::Name, Value::from("Deprecated")).unwrap();
    tree.set(deprecated, Role::AnnotationType, type_ref).unwrap();

    let override_ = tree.create("Annotation").unwrap();
    tree.set(override_, Role::AnnotationType, Value::from("Override"))
        .unwrap();

    tree.set_annotations(method, vec![deprecated, override_]).unwrap();

    assert_eq!(tree.annotations(method), [deprecated, override_]);
    assert_eq!(tree.parent(deprecated), Some(method));
    assert_eq!(tree.annotation(method, "Deprecated"), Some(deprecated));
    assert_eq!(tree.annotation(method, "Override"), Some(override_));
    assert_eq!(tree.annotation(method, "Inline"), None);
    assert_eq!(tree.annotated_children(class, "Deprecated"), [method]);
    assert!(tree.annotated_children(method, "Deprecated").is_empty());

    let extra = tree.create("Annotation").unwrap();
    tree.add_annotation(class, extra).unwrap();
    assert_eq!(tree.annotations(class), [extra]);
}

#[test]
fn deep_clone_copies_subtree() {
    let mut s = sample();
    let second = s.returns[1];
    s.tree.set_position(second, Some(SourcePosition::new(4, 1)));
    let before = s.tree.len();

    let copy = s.tree.deep_clone(second);

    assert_eq!(s.tree.len(), before + 4);
    assert_eq!(s.tree.parent(copy), None);
    assert_eq!(s.tree.position(copy), Some(SourcePosition::new(4, 1)));

    let call = s.tree.children(copy)[0];
    assert_ne!(call, s.invocation);
    assert_eq!(s.tree.parent(call), Some(copy));
    let args = s.tree.children(call);
    assert_eq!(args.len(), 2);
    assert!(args.iter().all(|a| !s.literals.contains(a)));
    assert!(args.iter().all(|&a| s.tree.parent(a) == Some(call)));
    let values: Vec<_> = args.iter().filter_map(|&a| literal_value(&s.tree, a)).collect();
    assert_eq!(values, [2, 3]);

    assert_eq!(s.tree.parent(second), Some(s.block));
    assert_eq!(s.tree.children(s.invocation), s.literals[1..]);
}

#[test]
#[should_panic(expected = "node #42 not found")]
fn foreign_node_handle_panics() {
    let tree = fixture_tree();
    tree.parent(NodeId::new(42));
}
