//! Container-kind classification and value-type normalization.
//!
//! A field's declared type decides how its role is held: a single value, an
//! ordered list, a set, or a keyed map. The handler for the role is typed by
//! the *normalized* item type, which never mentions an unresolved type
//! variable and never uses a primitive.

use std::fmt;

use rolemeta_core::TypeRef;

use crate::error::IllegalContainerKind;

/// How a role's value is held.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ContainerKind {
    Single,
    List,
    Set,
    Map,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 4] = [Self::Single, Self::List, Self::Set, Self::Map];

    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::List => "LIST",
            Self::Set => "SET",
            Self::Map => "MAP",
        }
    }

    /// Abstract handler family implemented by generated handlers of this kind.
    pub fn handler_family(self) -> &'static str {
        match self {
            Self::Single => "SingleHandler",
            Self::List => "ListHandler",
            Self::Set => "SetHandler",
            Self::Map => "MapHandler",
        }
    }

    /// Whether values are held in a collection (everything but `Single`).
    pub fn is_collection(self) -> bool {
        !matches!(self, Self::Single)
    }

    /// Number of type arguments the container shape takes.
    fn arity(self) -> usize {
        match self {
            Self::Single => 0,
            Self::List | Self::Set => 1,
            Self::Map => 2,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generic type names recognized as container shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerShapes {
    list: Vec<String>,
    set: Vec<String>,
    map: Vec<String>,
}

impl Default for ContainerShapes {
    fn default() -> Self {
        Self {
            list: vec!["List".into(), "Collection".into()],
            set: vec!["Set".into()],
            map: vec!["Map".into()],
        }
    }
}

impl ContainerShapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes that recognize nothing: every field is single-valued.
    pub fn none() -> Self {
        Self {
            list: Vec::new(),
            set: Vec::new(),
            map: Vec::new(),
        }
    }

    /// Recognize `name` as an ordered-sequence shape.
    pub fn list(mut self, name: impl Into<String>) -> Self {
        self.list.push(name.into());
        self
    }

    /// Recognize `name` as an unordered-set shape.
    pub fn set(mut self, name: impl Into<String>) -> Self {
        self.set.push(name.into());
        self
    }

    /// Recognize `name` as a key-to-value shape.
    pub fn map(mut self, name: impl Into<String>) -> Self {
        self.map.push(name.into());
        self
    }

    pub fn kind_of(&self, ty: &TypeRef) -> ContainerKind {
        let Some(name) = ty.name() else {
            return ContainerKind::Single;
        };
        let is = |names: &[String]| names.iter().any(|n| n == name);
        if is(&self.list) {
            ContainerKind::List
        } else if is(&self.set) {
            ContainerKind::Set
        } else if is(&self.map) {
            ContainerKind::Map
        } else {
            ContainerKind::Single
        }
    }
}

/// Result of classifying a declared field type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub kind: ContainerKind,
    /// Declared type as written in the catalog.
    pub declared: TypeRef,
    /// Normalized type the handler family is parameterized by: the whole
    /// value for `Single`, the element (or map value) type otherwise.
    pub value_type: TypeRef,
}

/// Classify a declared field type and normalize its value type.
pub fn classify(
    shapes: &ContainerShapes,
    declared: &TypeRef,
) -> Result<Classification, IllegalContainerKind> {
    let kind = shapes.kind_of(declared);
    let value_type = match kind {
        ContainerKind::Single => normalize_single(declared),
        _ => {
            let args = declared.type_args();
            if args.len() != kind.arity() {
                return Err(IllegalContainerKind {
                    ty: declared.to_string(),
                    reason: format!(
                        "{kind} container takes {} type argument(s), found {}",
                        kind.arity(),
                        args.len()
                    ),
                });
            }
            // Map keys are not part of the handler's value type.
            normalize(&args[args.len() - 1])
        }
    };

    Ok(Classification {
        kind,
        declared: declared.clone(),
        value_type,
    })
}

/// Normalize a value type for use in generated signatures.
///
/// Works on a copy:
/// - a wildcard bounded by a type variable loses its bound
/// - a bare type variable becomes an unbounded wildcard
/// - type arguments are normalized recursively
/// - primitives are boxed
///
/// Wildcards bounded by concrete types keep their bound untouched.
pub fn normalize(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Wildcard(bound) => match bound.bounding_type() {
            Some(TypeRef::Variable(_)) => TypeRef::unbounded_wildcard(),
            _ => ty.clone(),
        },
        TypeRef::Variable(_) => TypeRef::unbounded_wildcard(),
        TypeRef::Named { name, args } => TypeRef::Named {
            name: name.clone(),
            args: args.iter().map(normalize).collect(),
        },
        other => other.clone().boxed(),
    }
}

/// [`normalize`], then widen a surviving top-level wildcard to the top type.
///
/// A single-valued accessor needs one concrete type, not an open wildcard.
pub fn normalize_single(ty: &TypeRef) -> TypeRef {
    match normalize(ty) {
        TypeRef::Wildcard(_) => TypeRef::Top,
        other => other,
    }
}
