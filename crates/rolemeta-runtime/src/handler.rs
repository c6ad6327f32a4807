//! Dispatchable handlers.
//!
//! A [`Handler`] gives uniform access to one role of every node whose type
//! inherits from the handler's root declaring type. Reads return owned
//! snapshots or borrow the tree; writes keep parent back-references in step
//! with containment:
//! - node values put under a role are attached to the holder (and moved out
//!   of wherever they were held before)
//! - node values taken out of a role are detached
//!
//! Every write validates first, so a failing write leaves the tree as it was.

use rolemeta_core::Role;
use rolemeta_gen::{ContainerKind, NodeTypeId};

use crate::error::AccessError;
use crate::family::OwnedHandlerDecl;
use crate::tree::{Tree, check_distinct};
use crate::value::{FieldValue, NodeId, Value, Values};

const COLLECTIONS: &[ContainerKind] = &[ContainerKind::List, ContainerKind::Set];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handler {
    name: String,
    role: Role,
    target: NodeTypeId,
    target_name: String,
    kind: ContainerKind,
    value_type: String,
    mutable: bool,
}

impl Handler {
    pub(crate) fn new(decl: OwnedHandlerDecl, target: NodeTypeId) -> Self {
        Self {
            name: decl.name,
            role: decl.role,
            target,
            target_name: decl.owner,
            kind: decl.kind,
            value_type: decl.value_type,
            mutable: decl.mutable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Root declaring type the handler is bound to.
    pub fn target(&self) -> NodeTypeId {
        self.target
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Whole value of the role on `node`.
    pub fn get(&self, tree: &Tree, node: NodeId) -> Result<FieldValue, AccessError> {
        self.check_applicable(tree, node)?;
        if self.role == Role::Parent {
            return Ok(FieldValue::Single(tree.parent(node).map(Value::Node)));
        }
        Ok(self.field(tree, node)?.clone())
    }

    pub fn size(&self, tree: &Tree, node: NodeId) -> Result<usize, AccessError> {
        self.check_kind("size", COLLECTIONS)?;
        Ok(self.read(tree, node)?.len())
    }

    pub fn contains(&self, tree: &Tree, node: NodeId, value: &Value) -> Result<bool, AccessError> {
        self.check_kind("contains", COLLECTIONS)?;
        Ok(self.read(tree, node)?.contains(value))
    }

    pub fn iter<'t>(&self, tree: &'t Tree, node: NodeId) -> Result<Values<'t>, AccessError> {
        self.check_kind("iter", COLLECTIONS)?;
        Ok(self.read(tree, node)?.iter())
    }

    pub fn get_key<'t>(
        &self,
        tree: &'t Tree,
        node: NodeId,
        key: &str,
    ) -> Result<Option<&'t Value>, AccessError> {
        self.check_kind("get_key", &[ContainerKind::Map])?;
        match self.read(tree, node)? {
            FieldValue::Map(entries) => Ok(entries.get(key)),
            other => Err(self.mismatch("get_key", other.kind())),
        }
    }

    /// Replace the whole value and return the previous one.
    pub fn set(
        &self,
        tree: &mut Tree,
        node: NodeId,
        value: FieldValue,
    ) -> Result<FieldValue, AccessError> {
        self.check_mutable(tree, node)?;
        self.check_applicable(tree, node)?;
        if value.kind() != self.kind {
            return Err(AccessError::ValueKind {
                expected: self.kind,
                found: value.kind(),
            });
        }

        if self.role == Role::Parent {
            let new_parent = value.as_single().and_then(Value::as_node);
            let old = tree.parent(node);
            tree.set_parent(node, new_parent)?;
            return Ok(FieldValue::Single(old.map(Value::Node)));
        }

        check_distinct(self.role, value.nodes())?;
        for child in value.nodes() {
            tree.check_adoptable(node, child)?;
        }
        let empty = FieldValue::empty(self.kind);
        let old = std::mem::replace(self.field_mut(tree, node)?, empty);
        for child in old.nodes() {
            tree.release(child);
        }
        for child in value.nodes() {
            tree.adopt(node, child);
        }
        *self.field_mut(tree, node)? = value;

        tracing::trace!(handler = %self.name, %node, "set role value");
        Ok(old)
    }

    /// Append to a list, or insert into a set. Returns whether the
    /// collection grew; a node it already holds stays where it is.
    pub fn add(&self, tree: &mut Tree, node: NodeId, value: Value) -> Result<bool, AccessError> {
        self.check_mutable(tree, node)?;
        self.check_kind("add", COLLECTIONS)?;
        self.check_applicable(tree, node)?;
        let held_once = self.kind == ContainerKind::Set || value.as_node().is_some();
        if held_once && self.field(tree, node)?.contains(&value) {
            return Ok(false);
        }
        if let Some(child) = value.as_node() {
            tree.check_adoptable(node, child)?;
            tree.adopt(node, child);
        }

        match self.field_mut(tree, node)? {
            FieldValue::List(items) => {
                items.push(value);
                Ok(true)
            }
            FieldValue::Set(items) => Ok(items.insert(value)),
            other => Err(self.mismatch("add", other.kind())),
        }
    }

    /// Remove the first occurrence of `value`. Returns whether it was held.
    pub fn remove(&self, tree: &mut Tree, node: NodeId, value: &Value) -> Result<bool, AccessError> {
        self.check_mutable(tree, node)?;
        self.check_kind("remove", COLLECTIONS)?;
        self.check_applicable(tree, node)?;

        let removed = match self.field_mut(tree, node)? {
            FieldValue::List(items) => match items.iter().position(|v| v == value) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            },
            FieldValue::Set(items) => items.shift_remove(value),
            other => return Err(self.mismatch("remove", other.kind())),
        };
        if removed && let Some(child) = value.as_node() {
            tree.release(child);
        }
        Ok(removed)
    }

    /// Bind `key` to `value`, returning the value previously bound.
    pub fn put(
        &self,
        tree: &mut Tree,
        node: NodeId,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, AccessError> {
        self.check_mutable(tree, node)?;
        self.check_kind("put", &[ContainerKind::Map])?;
        self.check_applicable(tree, node)?;
        let key = key.into();

        if let FieldValue::Map(entries) = self.field(tree, node)?
            && entries.get(&key) == Some(&value)
        {
            return Ok(Some(value));
        }
        if let Some(child) = value.as_node() {
            tree.check_adoptable(node, child)?;
            tree.adopt(node, child);
        }

        let previous = match self.field_mut(tree, node)? {
            FieldValue::Map(entries) => entries.insert(key, value),
            other => return Err(self.mismatch("put", other.kind())),
        };
        if let Some(child) = previous.as_ref().and_then(Value::as_node) {
            tree.release(child);
        }
        Ok(previous)
    }

    /// Unbind `key`, returning the value it was bound to.
    pub fn remove_key(
        &self,
        tree: &mut Tree,
        node: NodeId,
        key: &str,
    ) -> Result<Option<Value>, AccessError> {
        self.check_mutable(tree, node)?;
        self.check_kind("remove_key", &[ContainerKind::Map])?;
        self.check_applicable(tree, node)?;

        let previous = match self.field_mut(tree, node)? {
            FieldValue::Map(entries) => entries.shift_remove(key),
            other => return Err(self.mismatch("remove_key", other.kind())),
        };
        if let Some(child) = previous.as_ref().and_then(Value::as_node) {
            tree.release(child);
        }
        Ok(previous)
    }

    fn read<'t>(&self, tree: &'t Tree, node: NodeId) -> Result<&'t FieldValue, AccessError> {
        self.check_applicable(tree, node)?;
        self.field(tree, node)
    }

    fn field<'t>(&self, tree: &'t Tree, node: NodeId) -> Result<&'t FieldValue, AccessError> {
        tree.slot(node, self.role)
    }

    fn field_mut<'t>(
        &self,
        tree: &'t mut Tree,
        node: NodeId,
    ) -> Result<&'t mut FieldValue, AccessError> {
        tree.slot_mut(node, self.role)
    }

    fn check_applicable(&self, tree: &Tree, node: NodeId) -> Result<(), AccessError> {
        let node_type = tree.node_type(node);
        if tree.metamodel().is_subtype(node_type, self.target) {
            return Ok(());
        }
        Err(AccessError::NotApplicable {
            handler: self.name.clone(),
            node_type: tree.type_name(node).to_string(),
        })
    }

    fn check_mutable(&self, tree: &Tree, node: NodeId) -> Result<(), AccessError> {
        if self.mutable {
            return Ok(());
        }
        Err(AccessError::UnsupportedMutation {
            handler: self.name.clone(),
            role: self.role,
            node_type: tree.type_name(node).to_string(),
        })
    }

    fn check_kind(
        &self,
        operation: &'static str,
        allowed: &[ContainerKind],
    ) -> Result<(), AccessError> {
        if allowed.contains(&self.kind) {
            return Ok(());
        }
        Err(self.mismatch(operation, self.kind))
    }

    fn mismatch(&self, operation: &'static str, kind: ContainerKind) -> AccessError {
        AccessError::ContainerMismatch {
            operation,
            role: self.role,
            kind,
        }
    }
}
