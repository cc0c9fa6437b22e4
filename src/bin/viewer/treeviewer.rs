//! Tree viewer - displays and navigates the derivation tree
//!
//! One line per visible node, indented by depth. Users move with the arrow
//! keys, fold subtrees with Left/Right, open the alternatives of a category
//! with Enter, and undo edits with `r` / `R`.

use super::model::{FlattenedTreeNode, Model};
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use treevis::formats::treeviz::node_icon;
use treevis::NodeId;

#[derive(Debug)]
pub struct TreeViewer {
    show_icons: bool,
}

impl TreeViewer {
    pub fn new(show_icons: bool) -> Self {
        TreeViewer { show_icons }
    }

    /// Get the next visible node in the flattened tree
    pub fn get_next_visible_node(&self, current_node_id: NodeId, model: &Model) -> Option<NodeId> {
        let flattened = model.flattened_tree();
        let current_index = flattened.iter().position(|n| n.node_id == current_node_id)?;
        flattened.get(current_index + 1).map(|n| n.node_id)
    }

    /// Get the previous visible node in the flattened tree
    pub fn get_previous_visible_node(
        &self,
        current_node_id: NodeId,
        model: &Model,
    ) -> Option<NodeId> {
        let flattened = model.flattened_tree();
        let current_index = flattened.iter().position(|n| n.node_id == current_node_id)?;
        current_index
            .checked_sub(1)
            .map(|index| flattened[index].node_id)
    }

    fn line_text(&self, node: &FlattenedTreeNode) -> String {
        let indent = "  ".repeat(node.depth);
        let fold = if !node.has_children {
            " "
        } else if node.is_expanded {
            "▾"
        } else {
            "▸"
        };
        let mark = if node.edited { " *" } else { "" };
        if self.show_icons {
            let icon = node_icon(node.kind);
            format!("{}{}{} {}{}", indent, fold, icon, node.label, mark)
        } else {
            format!("{}{} {}{}", indent, fold, node.label, mark)
        }
    }
}

impl Default for TreeViewer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Viewer for TreeViewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model) {
        let flattened = model.flattened_tree();
        let selected = model.selected_node_id();

        // Keep the cursor on screen
        let height = area.height as usize;
        let cursor_index = flattened
            .iter()
            .position(|n| n.node_id == selected)
            .unwrap_or(0);
        let scroll_offset = if height > 0 && cursor_index >= height {
            cursor_index + 1 - height
        } else {
            0
        };

        let lines: Vec<Line> = flattened
            .iter()
            .skip(scroll_offset)
            .take(height)
            .map(|node| {
                let text = self.line_text(node);
                if node.node_id == selected {
                    Line::from(text).style(
                        Style::default()
                            .bg(Color::Blue)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if node.edited {
                    Line::from(text).style(Style::default().fg(Color::Yellow))
                } else if !node.is_expanded && node.has_children {
                    Line::from(text)
                        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
                } else {
                    Line::from(text)
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent> {
        let current_node_id = model.selected_node_id();

        let event = match key.code {
            KeyCode::Up => match self.get_previous_visible_node(current_node_id, model) {
                Some(prev) => ViewerEvent::SelectNode(prev),
                None => ViewerEvent::NoChange,
            },
            KeyCode::Down => match self.get_next_visible_node(current_node_id, model) {
                Some(next) => ViewerEvent::SelectNode(next),
                None => ViewerEvent::NoChange,
            },
            KeyCode::Left | KeyCode::Right => ViewerEvent::ToggleNodeExpansion(current_node_id),
            KeyCode::Enter => ViewerEvent::OpenAlternatives(current_node_id),
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                ViewerEvent::ResetNode(current_node_id)
            }
            KeyCode::Char('R') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                ViewerEvent::ResetAll
            }
            KeyCode::Char('l') if key.modifiers.is_empty() => ViewerEvent::CycleLanguage,
            _ => ViewerEvent::NoChange,
        };
        Some(event)
    }
}
