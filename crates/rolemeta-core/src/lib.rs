#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for rolemeta.
//!
//! Three layers:
//! - **Roles**: the closed set of structural tags shared by every node type
//! - **Type expressions**: the declared value types of role-tagged fields
//! - **Catalog**: 1:1 deserialization of the node-type catalog file

pub mod catalog;
pub mod colors;
pub mod role;
pub mod types;
pub mod utils;

#[cfg(test)]
mod role_tests;
#[cfg(test)]
mod types_tests;

pub use catalog::{RawCatalog, RawField, RawNodeType, parse_catalog};
pub use colors::Colors;
pub use role::{Role, UnknownRole};
pub use types::{Primitive, TypeRef, TypeSyntaxError, WildcardBound, parse_type};
