//! Tree visitor.
//!
//! # Usage
//!
//! Implement `Visitor` for your struct. Override `visit_*` methods to add logic.
//! Call `walk_*` within your override to continue recursion (or omit it to
//! skip the subtree).
//!
//! ```ignore
//! impl Visitor for CountStatements {
//!     fn visit_role(&mut self, tree: &Tree, node: NodeId, role: Role, value: &FieldValue) {
//!         if role == Role::Statement {
//!             self.count += value.len();
//!         }
//!         walk_role(self, tree, node, role, value);
//!     }
//! }
//! ```

use rolemeta_core::Role;

use crate::tree::Tree;
use crate::value::{FieldValue, NodeId};

pub trait Visitor: Sized {
    fn visit_node(&mut self, tree: &Tree, node: NodeId) {
        walk_node(self, tree, node);
    }

    fn visit_role(&mut self, tree: &Tree, node: NodeId, role: Role, value: &FieldValue) {
        walk_role(self, tree, node, role, value);
    }
}

/// Visit every containment role of `node`, in role-table order.
pub fn walk_node<V: Visitor>(visitor: &mut V, tree: &Tree, node: NodeId) {
    for (role, value) in tree.slots(node) {
        if role.is_containment() {
            visitor.visit_role(tree, node, role, value);
        }
    }
}

pub fn walk_role<V: Visitor>(
    visitor: &mut V,
    tree: &Tree,
    _node: NodeId,
    _role: Role,
    value: &FieldValue,
) {
    for child in value.nodes() {
        visitor.visit_node(tree, child);
    }
}
