//! Shared fixtures for runtime tests.

use std::sync::Arc;

use indoc::indoc;
use rolemeta_core::{RawCatalog, Role, parse_catalog};
use rolemeta_gen::GeneratorConfig;

use crate::{FieldValue, NodeId, Registry, Tree, Value};

/// Small statement/expression catalog. `Literal` redeclares `TYPE` below its
/// root `Expression`. Every `Method` role but `BODY` is read-only, one per
/// container kind.
pub const FIXTURE: &str = indoc! {r#"
    {
        "types": [
            {
                "name": "Element",
                "fields": [
                    {"role": "ANNOTATION", "type": "List<Annotation>",
                     "getter": "annotations", "setter": "set_annotations"},
                    {"role": "PARENT", "type": "Element",
                     "getter": "parent", "setter": "set_parent"}
                ]
            },
            {
                "name": "NamedElement",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "NAME", "type": "String", "getter": "name", "setter": "set_name"}
                ]
            },
            {"name": "TypeReference", "supertypes": ["NamedElement"]},
            {
                "name": "Annotation",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "ANNOTATION_TYPE", "type": "TypeReference",
                     "getter": "annotation_type", "setter": "set_annotation_type"},
                    {"role": "VALUE", "type": "Map<String, Expression>",
                     "getter": "values", "setter": "set_values"}
                ]
            },
            {
                "name": "Expression",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "TYPE", "type": "TypeReference", "getter": "type_ref", "setter": "set_type"}
                ]
            },
            {
                "name": "Literal",
                "supertypes": ["Expression"],
                "fields": [
                    {"role": "TYPE", "type": "TypeReference", "getter": "type_ref", "setter": "set_type"},
                    {"role": "VALUE", "type": "Object", "getter": "value", "setter": "set_value"}
                ]
            },
            {
                "name": "Invocation",
                "supertypes": ["Expression"],
                "fields": [
                    {"role": "ARGUMENT", "type": "List<Expression>",
                     "getter": "arguments", "setter": "set_arguments"}
                ]
            },
            {
                "name": "Statement",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "LABEL", "type": "String", "getter": "label", "setter": "set_label"}
                ]
            },
            {
                "name": "Block",
                "supertypes": ["Statement"],
                "fields": [
                    {"role": "STATEMENT", "type": "List<Statement>",
                     "getter": "statements", "setter": "set_statements"}
                ]
            },
            {
                "name": "Return",
                "supertypes": ["Statement"],
                "fields": [
                    {"role": "EXPRESSION", "type": "Expression",
                     "getter": "returned_expression", "setter": "set_returned_expression"}
                ]
            },
            {
                "name": "Class",
                "supertypes": ["NamedElement"],
                "fields": [
                    {"role": "MODIFIER", "type": "Set<ModifierKind>",
                     "getter": "modifiers", "setter": "set_modifiers"},
                    {"role": "METHOD", "type": "List<Method>",
                     "getter": "methods", "setter": "set_methods"},
                    {"role": "NESTED_TYPE", "type": "Set<Class>",
                     "getter": "nested_types", "setter": "set_nested_types"}
                ]
            },
            {
                "name": "Method",
                "supertypes": ["NamedElement"],
                "fields": [
                    {"role": "BODY", "type": "Block", "getter": "body", "setter": "set_body"},
                    {"role": "TYPE", "type": "TypeReference", "getter": "return_type"},
                    {"role": "PARAMETER", "type": "List<TypeReference>", "getter": "parameters"},
                    {"role": "THROWN_TYPE", "type": "Set<TypeReference>", "getter": "thrown_types"},
                    {"role": "TYPE_PARAMETER", "type": "Map<String, TypeReference>",
                     "getter": "type_parameters"}
                ]
            }
        ]
    }
"#};

pub fn fixture_catalog() -> RawCatalog {
    parse_catalog(FIXTURE).expect("fixture JSON must parse")
}

pub fn fixture_registry() -> Arc<Registry> {
    let registry = Registry::build(&fixture_catalog(), &GeneratorConfig::default())
        .expect("fixture catalog must build");
    Arc::new(registry)
}

pub fn fixture_tree() -> Tree {
    Tree::new(fixture_registry())
}

pub fn literal(tree: &mut Tree, value: i64) -> NodeId {
    let id = tree.create("Literal").unwrap();
    tree.set(id, Role::Value, Value::Int(value)).unwrap();
    id
}

pub fn literal_value(tree: &Tree, id: NodeId) -> Option<i64> {
    match tree.get(id, Role::Value) {
        Ok(FieldValue::Single(Some(Value::Int(n)))) => Some(n),
        _ => None,
    }
}

/// `Block [Return(Literal 1), Return(Invocation [Literal 2, Literal 3])]`.
pub struct Sample {
    pub tree: Tree,
    pub block: NodeId,
    pub returns: [NodeId; 2],
    pub invocation: NodeId,
    pub literals: [NodeId; 3],
}

pub fn sample() -> Sample {
    let mut tree = fixture_tree();
    let block = tree.create("Block").unwrap();
    let first = tree.create("Return").unwrap();
    let second = tree.create("Return").unwrap();
    let invocation = tree.create("Invocation").unwrap();
    let literals = [
        literal(&mut tree, 1),
        literal(&mut tree, 2),
        literal(&mut tree, 3),
    ];

    tree.set(first, Role::Expression, literals[0]).unwrap();
    tree.add(invocation, Role::Argument, literals[1]).unwrap();
    tree.add(invocation, Role::Argument, literals[2]).unwrap();
    tree.set(second, Role::Expression, invocation).unwrap();
    tree.add(block, Role::Statement, first).unwrap();
    tree.add(block, Role::Statement, second).unwrap();

    Sample {
        tree,
        block,
        returns: [first, second],
        invocation,
        literals,
    }
}
