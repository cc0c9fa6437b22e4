//! Tree snapshots
//!
//! A [`TreeSnapshot`] is the immutable, serializable picture of a derivation
//! tree that renderers and serializers consume. Renderers never touch the
//! live tree; they hand [`NodeId`]s back to the session instead.

use crate::derivation::{DerivationTree, NodeId, NodeKind};
use serde::Serialize;
use std::collections::HashMap;

/// A snapshot of one node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    /// Node reference to pass back into the session
    #[serde(serialize_with = "serialize_node_id")]
    pub id: NodeId,
    /// Current label
    pub display_name: String,
    /// Grammar name (category or function)
    pub name: String,
    pub kind: NodeKind,
    /// Whether the label has been overridden by a selection
    pub edited: bool,
    pub has_children: bool,
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Snapshot a whole tree from its root
    pub fn from_tree(tree: &DerivationTree) -> Self {
        Self::from_node(tree, tree.root())
    }

    /// Snapshot the subtree under `id`
    ///
    /// An id outside the tree yields an empty placeholder node.
    pub fn from_node(tree: &DerivationTree, id: NodeId) -> Self {
        if !tree.contains(id) {
            return Self::placeholder(id);
        }

        let mut preorder = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            preorder.push(current);
            stack.extend(tree.children(current).iter().rev().copied());
        }

        // Reverse pre-order reaches every child before its parent
        let mut done: HashMap<NodeId, TreeSnapshot> = HashMap::new();
        for &current in preorder.iter().rev() {
            let Some(node) = tree.node(current) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| done.remove(child))
                .collect();
            done.insert(
                current,
                TreeSnapshot {
                    id: current,
                    display_name: node.display_name.clone(),
                    name: node.name.clone(),
                    kind: node.kind,
                    edited: node.is_edited(),
                    has_children: node.has_children(),
                    children,
                },
            );
        }
        done.remove(&id).unwrap_or_else(|| Self::placeholder(id))
    }

    fn placeholder(id: NodeId) -> Self {
        TreeSnapshot {
            id,
            display_name: String::new(),
            name: String::new(),
            kind: NodeKind::Category,
            edited: false,
            has_children: false,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this snapshot
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(snapshot) = stack.pop() {
            total += 1;
            stack.extend(&snapshot.children);
        }
        total
    }
}

impl Drop for TreeSnapshot {
    // Unlink descendants one level at a time instead of dropping them recursively
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

fn serialize_node_id<S>(id: &NodeId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(id.index() as u64)
}
