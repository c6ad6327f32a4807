//! Node arena and the node contract.
//!
//! Nodes live in a [`Tree`] and are addressed by [`NodeId`]. Ownership flows
//! from a node to the node values held under its containment roles; the
//! parent link is a plain back-reference kept in step by handler writes,
//! [`Tree::create_with`] and [`Tree::replace`].
//!
//! A tree is single-writer: mutate it from one thread at a time. Readers may
//! share an unchanging tree freely.

use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use indexmap::IndexMap;
use rolemeta_core::Role;
use rolemeta_gen::{ContainerKind, Metamodel, NodeTypeId};

use crate::error::AccessError;
use crate::handler::Handler;
use crate::registry::Registry;
use crate::value::{FieldValue, NodeId, Value};
use crate::visit::Visitor;

/// Source location of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    node_type: NodeTypeId,
    parent: Option<NodeId>,
    position: Option<SourcePosition>,
    implicit: bool,
    /// One entry per role of the node type except `PARENT`, in role-table
    /// order.
    slots: IndexMap<Role, FieldValue>,
}

/// Where a node is held inside its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Single,
    Index(usize),
    Member,
    Key(String),
}

#[derive(Clone, Debug)]
struct Location {
    parent: NodeId,
    role: Role,
    slot: Slot,
}

pub struct Tree {
    registry: Arc<Registry>,
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn metamodel(&self) -> &Metamodel {
        self.registry.metamodel()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached node of the named type with every role empty.
    pub fn create(&mut self, type_name: &str) -> Result<NodeId, AccessError> {
        let node_type = self
            .metamodel()
            .type_id(type_name)
            .ok_or_else(|| AccessError::UnknownNodeType(type_name.to_string()))?;
        Ok(self.create_of(node_type))
    }

    pub fn create_of(&mut self, node_type: NodeTypeId) -> NodeId {
        let mm = self.registry.metamodel();
        let slots = mm
            .roles_of(node_type)
            .filter(|&role| role != Role::Parent)
            .map(|role| {
                let kind = mm
                    .root_declaring_type(node_type, role)
                    .and_then(|root| mm.descriptor(root, role))
                    .map_or(ContainerKind::Single, |desc| desc.kind);
                (role, FieldValue::empty(kind))
            })
            .collect();

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            node_type,
            parent: None,
            position: None,
            implicit: false,
            slots,
        });
        id
    }

    /// Create a node with roles already filled, the way a front end hands
    /// over parsed nodes.
    ///
    /// Values are stored directly, so roles without a setter can be given
    /// their value here. Node values are moved under the new node. A role
    /// listed twice keeps its last value. Nothing is created on error.
    pub fn create_with(
        &mut self,
        type_name: &str,
        fields: impl IntoIterator<Item = (Role, FieldValue)>,
    ) -> Result<NodeId, AccessError> {
        let fields: IndexMap<Role, FieldValue> = fields.into_iter().collect();
        let id = self.create(type_name)?;
        if let Err(err) = self.check_fields(id, &fields) {
            self.nodes.pop();
            return Err(err);
        }

        for (role, value) in fields {
            for child in value.nodes() {
                self.adopt(id, child);
            }
            *self.slot_mut(id, role)? = value;
        }
        tracing::trace!(node = %id, node_type = type_name, "created node");
        Ok(id)
    }

    fn check_fields(&self, id: NodeId, fields: &IndexMap<Role, FieldValue>) -> Result<(), AccessError> {
        let mut seen = HashSet::new();
        for (&role, value) in fields {
            let expected = self.slot(id, role)?.kind();
            if value.kind() != expected {
                return Err(AccessError::ValueKind {
                    expected,
                    found: value.kind(),
                });
            }
            for child in value.nodes() {
                self.check_adoptable(id, child)?;
                if !seen.insert(child) {
                    return Err(AccessError::DuplicateNode { role, child });
                }
            }
        }
        Ok(())
    }

    pub fn node_type(&self, id: NodeId) -> NodeTypeId {
        self.ensure_node(id).node_type
    }

    pub fn type_name(&self, id: NodeId) -> &str {
        self.metamodel().type_name(self.node_type(id))
    }

    /// Whether the node's type is `type_name` or inherits from it.
    pub fn is_instance_of(&self, id: NodeId, type_name: &str) -> bool {
        let mm = self.metamodel();
        mm.type_id(type_name)
            .is_some_and(|ty| mm.is_subtype(self.node_type(id), ty))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.ensure_node(id).parent
    }

    /// Overwrite the parent back-reference only; containment is untouched.
    ///
    /// The new parent must not be `id` or one of its descendants, so the
    /// parent chain stays acyclic.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), AccessError> {
        if let Some(parent) = parent {
            self.check_adoptable(parent, id)?;
        }
        self.ensure_node_mut(id).parent = parent;
        Ok(())
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Whether `candidate` is a strict ancestor of `id`.
    pub fn has_parent(&self, id: NodeId, candidate: NodeId) -> bool {
        self.ancestors(id).any(|a| a == candidate)
    }

    /// Nearest strict ancestor that is an instance of `type_name`.
    pub fn parent_of_type(&self, id: NodeId, type_name: &str) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.is_instance_of(a, type_name))
    }

    pub fn position(&self, id: NodeId) -> Option<SourcePosition> {
        self.ensure_node(id).position
    }

    pub fn set_position(&mut self, id: NodeId, position: Option<SourcePosition>) {
        self.ensure_node_mut(id).position = position;
    }

    /// Whether the node was synthesized rather than written in source.
    pub fn is_implicit(&self, id: NodeId) -> bool {
        self.ensure_node(id).implicit
    }

    pub fn set_implicit(&mut self, id: NodeId, implicit: bool) {
        self.ensure_node_mut(id).implicit = implicit;
    }

    pub fn handler(&self, id: NodeId, role: Role) -> Result<&Handler, AccessError> {
        self.registry.resolve(self.node_type(id), role)
    }

    pub fn get(&self, id: NodeId, role: Role) -> Result<FieldValue, AccessError> {
        self.handler(id, role)?.get(self, id)
    }

    pub fn size(&self, id: NodeId, role: Role) -> Result<usize, AccessError> {
        self.handler(id, role)?.size(self, id)
    }

    pub fn get_key(&self, id: NodeId, role: Role, key: &str) -> Result<Option<&Value>, AccessError> {
        self.handler(id, role)?.get_key(self, id, key)
    }

    pub fn set(
        &mut self,
        id: NodeId,
        role: Role,
        value: impl Into<FieldValue>,
    ) -> Result<FieldValue, AccessError> {
        let registry = Arc::clone(&self.registry);
        registry
            .resolve(self.node_type(id), role)?
            .set(self, id, value.into())
    }

    pub fn add(&mut self, id: NodeId, role: Role, value: impl Into<Value>) -> Result<bool, AccessError> {
        let registry = Arc::clone(&self.registry);
        registry
            .resolve(self.node_type(id), role)?
            .add(self, id, value.into())
    }

    pub fn remove(&mut self, id: NodeId, role: Role, value: &Value) -> Result<bool, AccessError> {
        let registry = Arc::clone(&self.registry);
        registry
            .resolve(self.node_type(id), role)?
            .remove(self, id, value)
    }

    pub fn put(
        &mut self,
        id: NodeId,
        role: Role,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, AccessError> {
        let registry = Arc::clone(&self.registry);
        registry
            .resolve(self.node_type(id), role)?
            .put(self, id, key, value.into())
    }

    pub fn remove_key(
        &mut self,
        id: NodeId,
        role: Role,
        key: &str,
    ) -> Result<Option<Value>, AccessError> {
        let registry = Arc::clone(&self.registry);
        registry
            .resolve(self.node_type(id), role)?
            .remove_key(self, id, key)
    }

    /// Annotation nodes of `id`; empty when its type has no `ANNOTATION` role.
    pub fn annotations(&self, id: NodeId) -> Vec<NodeId> {
        self.slot(id, Role::Annotation)
            .map(|value| value.nodes().collect())
            .unwrap_or_default()
    }

    pub fn set_annotations(
        &mut self,
        id: NodeId,
        annotations: Vec<NodeId>,
    ) -> Result<(), AccessError> {
        let kind = self.handler(id, Role::Annotation)?.kind();
        let items = annotations.into_iter().map(Value::Node);
        let value = match kind {
            ContainerKind::List => FieldValue::List(items.collect()),
            ContainerKind::Set => FieldValue::Set(items.collect()),
            other => {
                return Err(AccessError::ContainerMismatch {
                    operation: "set_annotations",
                    role: Role::Annotation,
                    kind: other,
                });
            }
        };
        self.set(id, Role::Annotation, value)?;
        Ok(())
    }

    pub fn add_annotation(&mut self, id: NodeId, annotation: NodeId) -> Result<(), AccessError> {
        self.add(id, Role::Annotation, annotation)?;
        Ok(())
    }

    /// First annotation of `id` whose `ANNOTATION_TYPE` names `annotation_type`.
    ///
    /// The annotation type is either a string or a node whose `NAME` is that
    /// string.
    pub fn annotation(&self, id: NodeId, annotation_type: &str) -> Option<NodeId> {
        self.annotations(id)
            .into_iter()
            .find(|&a| self.annotation_type_is(a, annotation_type))
    }

    /// Strict descendants of `id` carrying an `annotation_type` annotation.
    pub fn annotated_children(&self, id: NodeId, annotation_type: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.annotation(n, annotation_type).is_some())
            .collect()
    }

    fn annotation_type_is(&self, annotation: NodeId, annotation_type: &str) -> bool {
        let Ok(value) = self.slot(annotation, Role::AnnotationType) else {
            return false;
        };
        match value.as_single() {
            Some(Value::Str(name)) => name == annotation_type,
            Some(Value::Node(ty)) => self
                .slot(*ty, Role::Name)
                .ok()
                .and_then(FieldValue::as_single)
                .and_then(Value::as_str)
                .is_some_and(|name| name == annotation_type),
            _ => false,
        }
    }

    /// Roles of `id` with their values, in role-table order. `PARENT` is not
    /// stored and never listed.
    pub fn slots(&self, id: NodeId) -> impl Iterator<Item = (Role, &FieldValue)> {
        self.ensure_node(id).slots.iter().map(|(role, value)| (*role, value))
    }

    /// Direct children, in role-table order then storage order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.slots(id)
            .filter(|(role, _)| role.is_containment())
            .flat_map(|(_, value)| value.nodes())
            .collect()
    }

    /// `id` and every node below it, pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = self.children(node);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Every node below `id`, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = self.subtree(id);
        nodes.remove(0);
        nodes
    }

    /// One-line rendering of `id` for diagnostics: the type name followed by
    /// its non-empty roles, nodes rendered recursively.
    ///
    /// ```text
    /// Return(EXPRESSION=Invocation(ARGUMENT=[Literal(VALUE=2), Literal(VALUE=3)]))
    /// ```
    pub fn signature(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_signature(&mut out, id);
        out
    }

    fn write_signature(&self, out: &mut String, id: NodeId) {
        out.push_str(self.type_name(id));
        let mut filled = self.slots(id).filter(|(_, value)| !value.is_empty()).peekable();
        if filled.peek().is_none() {
            return;
        }
        out.push('(');
        for (i, (role, value)) in filled.enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{role}=");
            match value {
                FieldValue::Single(Some(item)) => self.write_item(out, item),
                FieldValue::Single(None) => {}
                FieldValue::List(items) => self.write_items(out, ('[', ']'), items.iter()),
                FieldValue::Set(items) => self.write_items(out, ('{', '}'), items.iter()),
                FieldValue::Map(entries) => {
                    out.push('{');
                    for (j, (key, item)) in entries.iter().enumerate() {
                        if j > 0 {
                            out.push_str(", ");
                        }
                        let _ = write!(out, "{key}: ");
                        self.write_item(out, item);
                    }
                    out.push('}');
                }
            }
        }
        out.push(')');
    }

    fn write_items<'v>(
        &self,
        out: &mut String,
        (open, close): (char, char),
        items: impl Iterator<Item = &'v Value>,
    ) {
        out.push(open);
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_item(out, item);
        }
        out.push(close);
    }

    fn write_item(&self, out: &mut String, item: &Value) {
        match item {
            Value::Node(child) => self.write_signature(out, *child),
            other => {
                let _ = write!(out, "{other}");
            }
        }
    }

    pub fn accept<V: Visitor>(&self, id: NodeId, visitor: &mut V) {
        visitor.visit_node(self, id);
    }

    /// Put `replacement` where `target` is held in its parent.
    ///
    /// - single role: the reference is swapped
    /// - list: the element at the target's index is overwritten
    /// - set: the replacement takes the target's index (a replacement
    ///   already in the same set keeps its own, and the set shrinks)
    /// - map: the target's key is rebound
    ///
    /// Afterwards the target is detached and the replacement's parent is the
    /// target's former parent.
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> Result<(), AccessError> {
        self.ensure_node(replacement);
        if target == replacement {
            return Ok(());
        }
        let parent = self.parent(target).ok_or(AccessError::Detached(target))?;
        let location = self.locate(target).ok_or(AccessError::NotAChild {
            parent,
            child: target,
        })?;

        let registry = Arc::clone(&self.registry);
        let handler = registry.resolve(self.node_type(parent), location.role)?;
        if !handler.is_mutable() {
            return Err(AccessError::UnsupportedMutation {
                handler: handler.name().to_string(),
                role: location.role,
                node_type: self.type_name(parent).to_string(),
            });
        }
        self.check_adoptable(parent, replacement)?;

        let absorbed = location.slot == Slot::Member
            && self
                .locate(replacement)
                .is_some_and(|l| l.parent == parent && l.role == location.role);
        if !absorbed && let Some(held) = self.locate(replacement) {
            self.unlink(held, replacement);
        }
        // Unlinking may have shifted list indices.
        let location = self.locate(target).ok_or(AccessError::NotAChild {
            parent,
            child: target,
        })?;

        match (self.slot_mut(parent, location.role)?, location.slot) {
            (FieldValue::Single(value), Slot::Single) => *value = Some(Value::Node(replacement)),
            (FieldValue::List(items), Slot::Index(index)) => {
                items[index] = Value::Node(replacement);
            }
            (FieldValue::Set(items), Slot::Member) => {
                if let Some(index) = items.get_index_of(&Value::Node(target)) {
                    items.shift_remove_index(index);
                    if !absorbed {
                        items.shift_insert(index, Value::Node(replacement));
                    }
                }
            }
            (FieldValue::Map(entries), Slot::Key(key)) => {
                entries.insert(key, Value::Node(replacement));
            }
            _ => {
                return Err(AccessError::NotAChild {
                    parent,
                    child: target,
                });
            }
        }
        self.ensure_node_mut(target).parent = None;
        self.ensure_node_mut(replacement).parent = Some(parent);

        tracing::trace!(%target, %replacement, %parent, role = %location.role, "replaced node");
        Ok(())
    }

    /// Replace every node of the subtree of `root` matching `predicate` with
    /// the node `make` builds for it. Returns the number of replacements.
    ///
    /// Matches are collected before the first replacement, so nodes created
    /// by `make` are never matched by the same pass. Matches without a
    /// parent (such as a detached `root`) are skipped.
    pub fn replace_matching<P, M>(
        &mut self,
        root: NodeId,
        mut predicate: P,
        mut make: M,
    ) -> Result<usize, AccessError>
    where
        P: FnMut(&Tree, NodeId) -> bool,
        M: FnMut(&mut Tree, NodeId) -> NodeId,
    {
        let matches: Vec<NodeId> = self
            .subtree(root)
            .into_iter()
            .filter(|&node| predicate(self, node))
            .collect();

        let mut replaced = 0;
        for target in matches {
            if self.parent(target).is_none() {
                continue;
            }
            let replacement = make(self, target);
            self.replace(target, replacement)?;
            replaced += 1;
        }

        tracing::debug!(%root, replaced, "replaced matching nodes");
        Ok(replaced)
    }

    /// Copy `id` and its whole subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let original = self.ensure_node(id).clone();
        let copy = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            node_type: original.node_type,
            parent: None,
            position: original.position,
            implicit: original.implicit,
            slots: IndexMap::with_capacity(original.slots.len()),
        });

        for (role, value) in original.slots {
            let value = self.clone_field(value, copy);
            self.ensure_node_mut(copy).slots.insert(role, value);
        }
        copy
    }

    fn clone_field(&mut self, value: FieldValue, parent: NodeId) -> FieldValue {
        match value {
            FieldValue::Single(item) => {
                FieldValue::Single(item.map(|v| self.clone_item(v, parent)))
            }
            FieldValue::List(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|v| self.clone_item(v, parent))
                    .collect(),
            ),
            FieldValue::Set(items) => FieldValue::Set(
                items
                    .into_iter()
                    .map(|v| self.clone_item(v, parent))
                    .collect(),
            ),
            FieldValue::Map(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, self.clone_item(v, parent)))
                    .collect(),
            ),
        }
    }

    fn clone_item(&mut self, value: Value, parent: NodeId) -> Value {
        match value {
            Value::Node(child) => {
                let copy = self.deep_clone(child);
                self.ensure_node_mut(copy).parent = Some(parent);
                Value::Node(copy)
            }
            other => other,
        }
    }

    pub(crate) fn slot(&self, id: NodeId, role: Role) -> Result<&FieldValue, AccessError> {
        let data = self.ensure_node(id);
        data.slots
            .get(&role)
            .ok_or_else(|| AccessError::HandlerNotFound {
                role,
                node_type: self.metamodel().type_name(data.node_type).to_string(),
            })
    }

    pub(crate) fn slot_mut(
        &mut self,
        id: NodeId,
        role: Role,
    ) -> Result<&mut FieldValue, AccessError> {
        self.ensure_node(id);
        let registry = &self.registry;
        let data = &mut self.nodes[id.index()];
        let node_type = data.node_type;
        data.slots
            .get_mut(&role)
            .ok_or_else(|| AccessError::HandlerNotFound {
                role,
                node_type: registry.metamodel().type_name(node_type).to_string(),
            })
    }

    /// Fails if holding `child` under `parent` would make a node its own
    /// ancestor.
    pub(crate) fn check_adoptable(&self, parent: NodeId, child: NodeId) -> Result<(), AccessError> {
        self.ensure_node(child);
        if child == parent || self.has_parent(parent, child) {
            return Err(AccessError::OwnershipCycle { parent, child });
        }
        Ok(())
    }

    /// Move `child` under `parent`: take it out of its current holder and
    /// point its back-reference at `parent`. The caller stores the value.
    pub(crate) fn adopt(&mut self, parent: NodeId, child: NodeId) {
        if let Some(held) = self.locate(child) {
            self.unlink(held, child);
        }
        self.ensure_node_mut(child).parent = Some(parent);
    }

    /// Clear the back-reference of a node taken out of its holder.
    pub(crate) fn release(&mut self, child: NodeId) {
        self.ensure_node_mut(child).parent = None;
    }

    pub(crate) fn node_data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index())
    }

    fn locate(&self, child: NodeId) -> Option<Location> {
        let parent = self.parent(child)?;
        let needle = Value::Node(child);
        self.slots(parent)
            .filter(|(role, _)| role.is_containment())
            .find_map(|(role, value)| {
                let slot = match value {
                    FieldValue::Single(Some(v)) if *v == needle => Slot::Single,
                    FieldValue::Single(_) => return None,
                    FieldValue::List(items) => Slot::Index(items.iter().position(|v| *v == needle)?),
                    FieldValue::Set(items) if items.contains(&needle) => Slot::Member,
                    FieldValue::Set(_) => return None,
                    FieldValue::Map(entries) => Slot::Key(
                        entries
                            .iter()
                            .find(|(_, v)| **v == needle)
                            .map(|(k, _)| k.clone())?,
                    ),
                };
                Some(Location { parent, role, slot })
            })
    }

    fn unlink(&mut self, location: Location, child: NodeId) {
        if let Ok(value) = self.slot_mut(location.parent, location.role) {
            match (value, location.slot) {
                (FieldValue::Single(v), Slot::Single) => *v = None,
                (FieldValue::List(items), Slot::Index(index)) => {
                    items.remove(index);
                }
                (FieldValue::Set(items), Slot::Member) => {
                    items.shift_remove(&Value::Node(child));
                }
                (FieldValue::Map(entries), Slot::Key(key)) => {
                    entries.shift_remove(&key);
                }
                _ => {}
            }
        }
        self.ensure_node_mut(child).parent = None;
    }
}

/// Fails if a node appears more than once among `nodes`.
pub(crate) fn check_distinct(
    role: Role,
    nodes: impl IntoIterator<Item = NodeId>,
) -> Result<(), AccessError> {
    let mut seen = HashSet::new();
    for child in nodes {
        if !seen.insert(child) {
            return Err(AccessError::DuplicateNode { role, child });
        }
    }
    Ok(())
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .field("handlers", &self.registry.len())
            .finish()
    }
}
