//! Runtime side of rolemeta: uniform role access over a node tree.
//!
//! - [`Registry`] maps (node type, role) to a [`Handler`], built from a
//!   generation run or a generated `ROLE_HANDLERS` table
//! - [`Tree`] owns the nodes and keeps parent links consistent under writes
//!   and replacement
//! - [`Visitor`] walks containment roles
//!
//! Generated handler modules import [`Role`], [`ContainerKind`] and the
//! [`family`] traits from this crate.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
pub mod family;
mod handler;
mod invariants;
pub mod registry;
pub mod tree;
pub mod value;
pub mod visit;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tree_tests;

pub use error::{AccessError, RebuildError};
pub use family::{
    HandlerDecl, ListHandler, MapHandler, OwnedHandlerDecl, RoleHandler, SetHandler,
    SingleHandler,
};
pub use handler::Handler;
pub use registry::{Registry, SharedRegistry};
pub use rolemeta_core::Role;
pub use rolemeta_gen::ContainerKind;
pub use tree::{SourcePosition, Tree};
pub use value::{FieldValue, NodeId, Value, Values};
pub use visit::{Visitor, walk_node, walk_role};

/// Result type for role access.
pub type Result<T> = std::result::Result<T, AccessError>;
