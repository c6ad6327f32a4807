//! Deserialization layer: 1:1 mapping to the node-type catalog file.
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "Invocation",
//!       "supertypes": ["Expression"],
//!       "type_params": ["T"],
//!       "fields": [
//!         { "role": "ARGUMENT", "type": "List<Expression<?>>",
//!           "getter": "arguments", "setter": "set_arguments" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Types are parsed lazily (see [`RawField::parse_type`]) so that a malformed
//! expression is reported together with the field that declares it.

use serde::{Deserialize, Serialize};

use crate::Role;
use crate::types::{TypeRef, TypeSyntaxError, parse_type};

/// The whole catalog, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCatalog {
    pub types: Vec<RawNodeType>,
}

/// Node type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNodeType {
    pub name: String,
    /// Direct supertypes, in declaration order.
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Type variables usable in field types.
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// Role-tagged field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawField {
    pub role: Role,
    #[serde(rename = "type")]
    pub type_expr: String,
    pub getter: String,
    #[serde(default)]
    pub setter: Option<String>,
}

impl RawField {
    pub fn parse_type(&self, type_params: &[String]) -> Result<TypeRef, TypeSyntaxError> {
        parse_type(&self.type_expr, type_params)
    }
}

/// Parse catalog JSON content.
pub fn parse_catalog(json: &str) -> Result<RawCatalog, serde_json::Error> {
    serde_json::from_str(json)
}
