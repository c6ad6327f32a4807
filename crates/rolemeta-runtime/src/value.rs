//! Values held under roles.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rolemeta_gen::ContainerKind;

use crate::error::AccessError;

/// Handle of a node in a [`crate::Tree`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One item stored under a role.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    /// Owned child node (or the parent, for the `PARENT` role).
    Node(NodeId),
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{id}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Whole content of one role on one node, shaped by its container kind.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FieldValue {
    Single(Option<Value>),
    List(Vec<Value>),
    Set(IndexSet<Value>),
    Map(IndexMap<String, Value>),
}

impl FieldValue {
    pub fn empty(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Single => Self::Single(None),
            ContainerKind::List => Self::List(Vec::new()),
            ContainerKind::Set => Self::Set(IndexSet::new()),
            ContainerKind::Map => Self::Map(IndexMap::new()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Single(_) => ContainerKind::Single,
            Self::List(_) => ContainerKind::List,
            Self::Set(_) => ContainerKind::Set,
            Self::Map(_) => ContainerKind::Map,
        }
    }

    /// Number of items; a present single value counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(v) => usize::from(v.is_some()),
            Self::List(items) => items.len(),
            Self::Set(items) => items.len(),
            Self::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is held (as a map value, for maps).
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Self::Set(items) => items.contains(value),
            _ => self.iter().any(|v| v == value),
        }
    }

    /// Items in storage order; map values in key insertion order.
    pub fn iter(&self) -> Values<'_> {
        match self {
            Self::Single(v) => Values::Single(v.iter()),
            Self::List(items) => Values::List(items.iter()),
            Self::Set(items) => Values::Set(items.iter()),
            Self::Map(entries) => Values::Map(entries.values()),
        }
    }

    /// Node handles among the items.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter_map(Value::as_node)
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(v) => v.as_ref(),
            _ => None,
        }
    }
}

/// Iterator over the items of a [`FieldValue`].
pub enum Values<'a> {
    Single(std::option::Iter<'a, Value>),
    List(std::slice::Iter<'a, Value>),
    Set(indexmap::set::Iter<'a, Value>),
    Map(indexmap::map::Values<'a, String, Value>),
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Single(it) => it.next(),
            Self::List(it) => it.next(),
            Self::Set(it) => it.next(),
            Self::Map(it) => it.next(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Single(Some(value))
    }
}

impl From<NodeId> for FieldValue {
    fn from(id: NodeId) -> Self {
        Self::Single(Some(Value::Node(id)))
    }
}

impl From<Option<Value>> for FieldValue {
    fn from(value: Option<Value>) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<Value>> for FieldValue {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<IndexSet<Value>> for FieldValue {
    fn from(items: IndexSet<Value>) -> Self {
        Self::Set(items)
    }
}

impl From<IndexMap<String, Value>> for FieldValue {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self::Map(entries)
    }
}

macro_rules! try_from_field_value {
    ($target:ty, $variant:ident, $kind:ident) => {
        impl TryFrom<FieldValue> for $target {
            type Error = AccessError;

            fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
                match value {
                    FieldValue::$variant(inner) => Ok(inner),
                    other => Err(AccessError::ValueKind {
                        expected: ContainerKind::$kind,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

try_from_field_value!(Option<Value>, Single, Single);
try_from_field_value!(Vec<Value>, List, List);
try_from_field_value!(IndexSet<Value>, Set, Set);
try_from_field_value!(IndexMap<String, Value>, Map, Map);
