//! Shared fixtures for generator tests.

use indoc::indoc;
use rolemeta_core::parse_catalog;

use crate::{GenerateError, Generation, GeneratorConfig, Metamodel, generate};

/// Small expression-language catalog exercising every container kind,
/// inherited and redeclared roles, and wildcard normalization.
pub const FIXTURE: &str = indoc! {r#"
    {
        "types": [
            {
                "name": "Element",
                "fields": [
                    {"role": "ANNOTATION", "type": "List<Annotation>",
                     "getter": "annotations", "setter": "set_annotations"}
                ]
            },
            {
                "name": "TypedElement",
                "supertypes": ["Element"],
                "type_params": ["T"],
                "fields": [
                    {"role": "TYPE", "type": "TypeReference<T>",
                     "getter": "type_ref", "setter": "set_type"}
                ]
            },
            {
                "name": "Expression",
                "supertypes": ["TypedElement"],
                "type_params": ["T"],
                "fields": [
                    {"role": "TYPE", "type": "TypeReference<T>",
                     "getter": "type_ref", "setter": "set_type"}
                ]
            },
            {
                "name": "Annotation",
                "supertypes": ["Expression"],
                "fields": [
                    {"role": "ANNOTATION_TYPE", "type": "TypeReference<? extends Annotation>",
                     "getter": "annotation_type"},
                    {"role": "VALUE", "type": "Map<String, Expression<?>>",
                     "getter": "values", "setter": "set_values"}
                ]
            },
            {
                "name": "Statement",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "LABEL", "type": "String",
                     "getter": "label", "setter": "set_label"}
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
                "name": "Literal",
                "supertypes": ["Expression"],
                "type_params": ["T"],
                "fields": [
                    {"role": "VALUE", "type": "T",
                     "getter": "value", "setter": "set_value"}
                ]
            },
            {
                "name": "Modifiable",
                "supertypes": ["Element"],
                "fields": [
                    {"role": "MODIFIER", "type": "Set<ModifierKind>",
                     "getter": "modifiers", "setter": "set_modifiers"}
                ]
            },
            {
                "name": "Invocation",
                "supertypes": ["Expression"],
                "type_params": ["T"],
                "fields": [
                    {"role": "ARGUMENT", "type": "List<Expression<?>>",
                     "getter": "arguments", "setter": "set_arguments"},
                    {"role": "TYPE_ARGUMENT", "type": "List<? extends T>",
                     "getter": "type_arguments", "setter": "set_type_arguments"}
                ]
            }
        ]
    }
"#};

pub fn build(json: &str) -> Result<Metamodel, GenerateError> {
    let catalog = parse_catalog(json).expect("fixture JSON must parse");
    Metamodel::build(&catalog, GeneratorConfig::default().container_shapes())
}

pub fn fixture_metamodel() -> Metamodel {
    build(FIXTURE).expect("fixture catalog must be valid")
}

pub fn fixture_generation() -> Generation {
    generate(&fixture_metamodel(), &GeneratorConfig::default())
        .expect("fixture catalog must generate")
}
