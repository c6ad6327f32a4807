//! Generation errors.
//!
//! Every variant is fatal to the batch: the generator never publishes a
//! partial handler set.

use rolemeta_core::{Role, TypeSyntaxError};

/// A container shape outside the four supported kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{ty}`: {reason}")]
pub struct IllegalContainerKind {
    pub ty: String,
    pub reason: String,
}

/// Errors from parsing or filling a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown placeholder `${0}$` at line {1}")]
    UnknownPlaceholder(String, usize),

    #[error("unterminated placeholder at line {0}")]
    UnterminatedPlaceholder(usize),

    #[error("`$if {0}$` at line {1} has no matching `$end$`")]
    UnclosedSection(String, usize),

    #[error("`$end$` at line {0} has no matching `$if$`")]
    UnmatchedEnd(usize),

    #[error("required parameter `{0}` has no value")]
    MissingParameter(&'static str),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    #[error("node type `{0}` is declared more than once")]
    DuplicateNodeType(String),

    #[error("node type `{ty}` extends unknown type `{supertype}`")]
    UnknownSupertype { ty: String, supertype: String },

    #[error("inheritance cycle through node type `{0}`")]
    InheritanceCycle(String),

    #[error("node type `{ty}` declares role {role} more than once")]
    DuplicateRole { ty: String, role: Role },

    #[error("invalid type for {ty}.{role}: {source}")]
    TypeSyntax {
        ty: String,
        role: Role,
        #[source]
        source: TypeSyntaxError,
    },

    #[error("illegal container kind for {ty}.{role}: {source}")]
    IllegalContainerKind {
        ty: String,
        role: Role,
        #[source]
        source: IllegalContainerKind,
    },

    #[error("handler template is invalid: {0}")]
    Template(#[source] TemplateError),

    #[error("generation aborted at handler `{handler}`: {source}")]
    GenerationAborted {
        handler: String,
        #[source]
        source: TemplateError,
    },
}
