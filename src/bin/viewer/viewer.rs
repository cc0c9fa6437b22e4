//! Panes and the requests they send to the app
//!
//! Viewers never mutate the model directly. They report what the user asked
//! for as a [`ViewerEvent`] carrying node ids, and the App applies it.

use super::model::Model;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;
use treevis::NodeId;

/// What a pane asks the app to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Move the tree cursor to a node
    SelectNode(NodeId),
    /// Toggle whether a node is expanded
    ToggleNodeExpansion(NodeId),
    /// Show the alternatives for a category node
    OpenAlternatives(NodeId),
    /// Relabel a node with the chosen alternative
    ChooseAlternative(NodeId, String),
    /// Dismiss the alternatives menu
    CloseAlternatives,
    /// Restore a node's original label
    ResetNode(NodeId),
    /// Restore every edited node
    ResetAll,
    /// Switch to the next display language
    CycleLanguage,
    /// Key consumed, nothing to apply
    NoChange,
}

/// A pane of the screen
pub trait Viewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model);

    /// `None` means the pane ignored the key
    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent>;
}
