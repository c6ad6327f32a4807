//! Contract implemented by generated handler modules.
//!
//! A generated module holds one unit per handler: an implementation of
//! [`RoleHandler`] over the concrete node type, a marker impl of its family
//! trait, and a [`HandlerDecl`] row in the `ROLE_HANDLERS` table.
//! [`crate::Registry::from_decls`] turns that table into dispatchable
//! [`crate::Handler`]s.

use rolemeta_core::Role;
use rolemeta_gen::{ContainerKind, HandlerArtifact};

use crate::error::AccessError;
use crate::value::FieldValue;

/// Typed accessor pair for one role of one node type.
pub trait RoleHandler {
    type Node;

    const ROLE: Role;
    /// Normalized value type, in catalog notation.
    const VALUE_TYPE: &'static str;

    fn get_value(&self, node: &Self::Node) -> FieldValue;

    /// Handlers generated without a setter keep this default.
    fn set_value(&self, node: &mut Self::Node, value: FieldValue) -> Result<(), AccessError> {
        let _ = (node, value);
        Err(AccessError::UnsupportedMutation {
            handler: short_type_name::<Self>().to_string(),
            role: Self::ROLE,
            node_type: short_type_name::<Self::Node>().to_string(),
        })
    }
}

pub trait SingleHandler: RoleHandler {}

pub trait ListHandler: RoleHandler {}

pub trait SetHandler: RoleHandler {}

pub trait MapHandler: RoleHandler {}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Row of a generated handler table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerDecl {
    pub name: &'static str,
    /// Root declaring type, as named in the catalog.
    pub owner: &'static str,
    pub role: Role,
    pub kind: ContainerKind,
    pub value_type: &'static str,
    pub mutable: bool,
}

impl HandlerDecl {
    pub const fn new(
        name: &'static str,
        owner: &'static str,
        role: Role,
        kind: ContainerKind,
        value_type: &'static str,
        mutable: bool,
    ) -> Self {
        Self {
            name,
            owner,
            role,
            kind,
            value_type,
            mutable,
        }
    }
}

/// Owned counterpart of [`HandlerDecl`], built from a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedHandlerDecl {
    pub name: String,
    pub owner: String,
    pub role: Role,
    pub kind: ContainerKind,
    pub value_type: String,
    pub mutable: bool,
}

impl From<&HandlerDecl> for OwnedHandlerDecl {
    fn from(decl: &HandlerDecl) -> Self {
        Self {
            name: decl.name.to_string(),
            owner: decl.owner.to_string(),
            role: decl.role,
            kind: decl.kind,
            value_type: decl.value_type.to_string(),
            mutable: decl.mutable,
        }
    }
}

impl From<&HandlerArtifact> for OwnedHandlerDecl {
    fn from(artifact: &HandlerArtifact) -> Self {
        Self {
            name: artifact.params.handler_name.clone(),
            owner: artifact.owner_name.clone(),
            role: artifact.role,
            kind: artifact.kind,
            value_type: artifact.params.value_type.clone(),
            mutable: artifact.is_mutable(),
        }
    }
}
