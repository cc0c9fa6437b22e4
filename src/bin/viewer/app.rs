//! Key routing for the viewer
//!
//! Quit keys are handled here. Every other key goes to the focused pane, and
//! the [`ViewerEvent`] it returns is applied to the [`Model`]. While the
//! alternatives menu is open it owns the keyboard.

use super::alternatives::AlternativesViewer;
use super::model::{Focus, Model};
use super::treeviewer::TreeViewer;
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::KeyEvent;

/// Presentation options taken from the settings
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub tree_width: u16,
    pub show_icons: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            tree_width: 40,
            show_icons: true,
        }
    }
}

pub struct App {
    pub model: Model,
    pub tree_viewer: TreeViewer,
    pub alternatives_viewer: AlternativesViewer,
    pub focus: Focus,
    pub should_quit: bool,
    pub options: ViewOptions,
}

impl App {
    pub fn new(model: Model, options: ViewOptions) -> Self {
        App {
            model,
            tree_viewer: TreeViewer::new(options.show_icons),
            alternatives_viewer: AlternativesViewer::new(),
            focus: Focus::default(),
            should_quit: false,
            options,
        }
    }

    /// Returns true when the screen needs redrawing
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        use crossterm::event::{KeyCode, KeyModifiers};

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return true;
            }
            _ => {}
        }

        let event = match self.focus {
            Focus::Tree => self.tree_viewer.handle_key(key, &self.model),
            Focus::Alternatives => self.alternatives_viewer.handle_key(key, &self.model),
        };

        match event {
            Some(ViewerEvent::NoChange) => self.focus == Focus::Alternatives,
            Some(event) => self.process_viewer_event(event),
            None => false,
        }
    }

    fn process_viewer_event(&mut self, event: ViewerEvent) -> bool {
        match event {
            ViewerEvent::SelectNode(node_id) => self.model.select_node(node_id),
            ViewerEvent::ToggleNodeExpansion(node_id) => self.model.toggle_node_expansion(node_id),
            ViewerEvent::OpenAlternatives(node_id) => {
                if self.model.open_alternatives(node_id) {
                    self.alternatives_viewer.reset_cursor();
                    self.focus = Focus::Alternatives;
                }
            }
            ViewerEvent::ChooseAlternative(node_id, label) => {
                self.model.choose_alternative(node_id, &label);
                self.focus = Focus::Tree;
            }
            ViewerEvent::CloseAlternatives => {
                self.model.close_alternatives();
                self.focus = Focus::Tree;
            }
            ViewerEvent::ResetNode(node_id) => self.model.reset_node(node_id),
            ViewerEvent::ResetAll => self.model.reset_all(),
            ViewerEvent::CycleLanguage => self.model.cycle_language(),
            ViewerEvent::NoChange => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treevis::{Grammar, Session};

    fn app() -> App {
        let grammar = Grammar::from_json_str(
            r#"{"abstract":{"startcat":"S","funs":{"A":{"args":[],"cat":"S"}}}}"#,
        )
        .unwrap();
        App::new(Model::new(Session::new(grammar)), ViewOptions::default())
    }

    #[test]
    fn test_app_creation() {
        let app = app();
        assert_eq!(app.focus, Focus::Tree);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_enter_opens_menu_and_focuses_it() {
        let mut app = app();
        app.handle_key(KeyEvent::from(crossterm::event::KeyCode::Enter));
        assert_eq!(app.focus, Focus::Alternatives);
        assert_eq!(app.model.menu().unwrap().options, vec!["A"]);
    }
}
