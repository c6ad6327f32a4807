//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::tree::{NodeData, Tree};
use crate::value::NodeId;

impl Tree {
    pub(crate) fn ensure_node(&self, id: NodeId) -> &NodeData {
        self.node_data(id).unwrap_or_else(|| {
            panic!("Tree: node {id} not found (node handles must come from the same tree)")
        })
    }

    pub(crate) fn ensure_node_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.node_data_mut(id).unwrap_or_else(|| {
            panic!("Tree: node {id} not found (node handles must come from the same tree)")
        })
    }
}
