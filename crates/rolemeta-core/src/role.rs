//! The closed set of structural roles.
//!
//! A role names a structural relationship (e.g. `BODY`, `ARGUMENT`) and means
//! the same thing on every node type that declares it. Role names are a stable
//! contract: catalogs declare them, algorithms query them. Adding a role is
//! backward compatible; renaming or removing one is not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! roles {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Structural tag on a node-type field.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum Role {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl Role {
            /// Every role, in declaration order.
            pub const ALL: &'static [Role] = &[$(Role::$variant),*];

            /// Stable name used by catalogs and generated code.
            pub fn name(self) -> &'static str {
                match self {
                    $(Role::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Role::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

roles! {
    Annotation => "ANNOTATION",
    AnnotationType => "ANNOTATION_TYPE",
    Argument => "ARGUMENT",
    Body => "BODY",
    Case => "CASE",
    Catch => "CATCH",
    Comment => "COMMENT",
    Condition => "CONDITION",
    DefaultExpression => "DEFAULT_EXPRESSION",
    Else => "ELSE",
    Expression => "EXPRESSION",
    Field => "FIELD",
    Finalizer => "FINALIZER",
    Interface => "INTERFACE",
    Label => "LABEL",
    Method => "METHOD",
    Modifier => "MODIFIER",
    Name => "NAME",
    NestedType => "NESTED_TYPE",
    Parameter => "PARAMETER",
    Parent => "PARENT",
    Statement => "STATEMENT",
    SuperType => "SUPER_TYPE",
    Target => "TARGET",
    Then => "THEN",
    ThrownType => "THROWN_TYPE",
    Type => "TYPE",
    TypeArgument => "TYPE_ARGUMENT",
    TypeParameter => "TYPE_PARAMETER",
    Value => "VALUE",
}

impl Role {
    /// Whether values held under this role are owned by the declaring node.
    ///
    /// `PARENT` is the only back-reference role; traversal never descends
    /// through it.
    pub fn is_containment(self) -> bool {
        !matches!(self, Role::Parent)
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Roles order by their stable name, which keeps generated output sorted
/// independently of enum declaration order.
impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a role name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}
