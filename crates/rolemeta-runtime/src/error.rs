//! Runtime dispatch and mutation errors.
//!
//! All of these are local to one call: a failing call leaves the tree
//! unchanged and the caller decides what to do.

use rolemeta_core::Role;
use rolemeta_gen::{ContainerKind, GenerateError};

use crate::value::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("no handler for role {role} on node type `{node_type}`")]
    HandlerNotFound { role: Role, node_type: String },

    #[error("handler `{handler}` is read-only: cannot mutate role {role} of `{node_type}`")]
    UnsupportedMutation {
        handler: String,
        role: Role,
        node_type: String,
    },

    #[error("`{operation}` is not supported by {kind} role {role}")]
    ContainerMismatch {
        operation: &'static str,
        role: Role,
        kind: ContainerKind,
    },

    #[error("expected a {expected} value, found {found}")]
    ValueKind {
        expected: ContainerKind,
        found: ContainerKind,
    },

    #[error("handler `{handler}` does not apply to node type `{node_type}`")]
    NotApplicable { handler: String, node_type: String },

    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("node {child} is not held by {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("attaching {child} under {parent} would create an ownership cycle")]
    OwnershipCycle { parent: NodeId, child: NodeId },

    #[error("node {child} is given more than once for role {role}")]
    DuplicateNode { role: Role, child: NodeId },
}

/// Failure to rebuild a shared registry; the previous registry stays live.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RebuildError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Access(#[from] AccessError),
}
