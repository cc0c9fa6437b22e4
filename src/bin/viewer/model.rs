//! Viewer data model
//!
//! The Model holds the pure application state:
//! - The grammar session (tree labels, alternatives, undo)
//! - Which tree node the cursor is on
//! - Expanded/collapsed state of tree nodes
//! - The alternatives menu, when open
//!
//! Expansion and cursor are presentation state only; they never reach the
//! session. Everything the user actually edits goes through the session
//! with a `NodeId`.

use std::collections::HashSet;
use treevis::{DisplayMode, NodeId, NodeKind, SelectError, Session, TreeSnapshot};

/// Which pane currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Derivation tree has focus
    #[default]
    Tree,
    /// Alternatives menu has focus
    Alternatives,
}

/// A node in the flattened tree representation
///
/// One entry of a depth-first flattening of the snapshot, respecting the
/// expanded/collapsed state. Used by the tree viewer to draw one line per node.
#[derive(Debug, Clone)]
pub struct FlattenedTreeNode {
    pub node_id: NodeId,
    /// Depth in the tree (for indentation)
    pub depth: usize,
    pub label: String,
    pub is_expanded: bool,
    pub has_children: bool,
    pub kind: NodeKind,
    pub edited: bool,
}

/// Alternatives offered for one category node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativesMenu {
    pub node_id: NodeId,
    pub options: Vec<String>,
}

/// The core data model
pub struct Model {
    session: Session,

    /// Node under the tree cursor
    selected: NodeId,

    /// Which tree nodes are expanded (rest are collapsed)
    expanded_nodes: HashSet<NodeId>,

    /// Open alternatives menu, if any
    menu: Option<AlternativesMenu>,

    /// Last message for the status line
    status: String,
}

impl Model {
    /// Create a new model with every node expanded and the cursor on the root
    pub fn new(session: Session) -> Self {
        let root = session.tree().root();
        let expanded_nodes = session.tree().iter().collect();
        Model {
            session,
            selected: root,
            expanded_nodes,
            menu: None,
            status: String::new(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected_node_id(&self) -> NodeId {
        self.selected
    }

    pub fn select_node(&mut self, node_id: NodeId) {
        if self.session.tree().contains(node_id) {
            self.selected = node_id;
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Short description of the display mode for the title bar
    pub fn mode_label(&self) -> String {
        match self.session.mode() {
            DisplayMode::Abstract => "abstract".to_string(),
            DisplayMode::Concrete(id) => match self.session.grammar().concrete(id) {
                Some(concrete) if concrete.language_tag != *id => {
                    format!("{} ({})", id, concrete.language_tag)
                }
                _ => id.clone(),
            },
        }
    }

    pub fn toggle_node_expansion(&mut self, node_id: NodeId) {
        if self.expanded_nodes.contains(&node_id) {
            self.expanded_nodes.remove(&node_id);
        } else {
            self.expanded_nodes.insert(node_id);
        }
    }

    pub fn is_node_expanded(&self, node_id: NodeId) -> bool {
        self.expanded_nodes.contains(&node_id)
    }

    pub fn menu(&self) -> Option<&AlternativesMenu> {
        self.menu.as_ref()
    }

    /// Open the alternatives menu for a node
    ///
    /// Returns false (and leaves the menu closed) when the node has nothing to offer.
    pub fn open_alternatives(&mut self, node_id: NodeId) -> bool {
        let options = self.session.list_alternatives(node_id);
        if options.is_empty() {
            self.set_status("No alternatives for this node");
            self.menu = None;
            return false;
        }
        self.menu = Some(AlternativesMenu { node_id, options });
        true
    }

    pub fn close_alternatives(&mut self) {
        self.menu = None;
    }

    /// Apply a chosen alternative through the session
    pub fn choose_alternative(&mut self, node_id: NodeId, label: &str) {
        match self.session.select(node_id, label) {
            Ok(()) => self.set_status(format!("Selected {}", label)),
            Err(err) => self.report(err),
        }
        self.menu = None;
    }

    pub fn reset_node(&mut self, node_id: NodeId) {
        if self.session.reset(node_id) {
            self.set_status("Restored original label");
        } else {
            self.set_status("Node was never edited");
        }
    }

    pub fn reset_all(&mut self) {
        let count = self.session.reset_all();
        self.set_status(format!("Restored {} node(s)", count));
    }

    /// Move to the next display language: abstract, then each concrete grammar
    pub fn cycle_language(&mut self) {
        let ids: Vec<String> = self
            .session
            .grammar()
            .concrete_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        let next = match self.session.mode() {
            DisplayMode::Abstract => ids.first().cloned(),
            DisplayMode::Concrete(current) => ids
                .iter()
                .position(|id| id == current)
                .and_then(|i| ids.get(i + 1).cloned()),
        };
        match self.session.set_language(next.as_deref()) {
            Ok(()) => {
                self.menu = None;
                let label = self.mode_label();
                self.set_status(format!("Display: {}", label));
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: SelectError) {
        self.set_status(err.to_string());
    }

    /// Depth-first flattening of the current snapshot, respecting expansion
    pub fn flattened_tree(&self) -> Vec<FlattenedTreeNode> {
        let mut nodes = Vec::new();
        let snapshot = self.session.snapshot();
        self.flatten_snapshot_recursive(&snapshot, 0, &mut nodes);
        nodes
    }

    fn flatten_snapshot_recursive(
        &self,
        snapshot: &TreeSnapshot,
        depth: usize,
        nodes: &mut Vec<FlattenedTreeNode>,
    ) {
        let is_expanded = self.is_node_expanded(snapshot.id);
        nodes.push(FlattenedTreeNode {
            node_id: snapshot.id,
            depth,
            label: snapshot.display_name.clone(),
            is_expanded,
            has_children: snapshot.has_children,
            kind: snapshot.kind,
            edited: snapshot.edited,
        });

        if is_expanded {
            for child in &snapshot.children {
                self.flatten_snapshot_recursive(child, depth + 1, nodes);
            }
        }
    }
}
