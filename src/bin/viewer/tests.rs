//! Test infrastructure for the viewer
//!
//! Provides:
//! - TestApp: wrapper that drives the application against a test backend
//! - Render helpers: getting the drawn screen as text

use super::app::{App, ViewOptions};
use super::model::{Focus, Model};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::{Backend, TestBackend};
use ratatui::Terminal;
use treevis::{Grammar, NodeId, Session};

const FOODS: &str = include_str!("../../../tests/fixtures/foods.json");

/// Test application wrapper with test backend
pub struct TestApp {
    app: App,
    terminal: Terminal<TestBackend>,
}

impl TestApp {
    /// Create a test app over the Foods fixture grammar
    pub fn new() -> Self {
        Self::with_grammar(FOODS)
    }

    pub fn with_grammar(source: &str) -> Self {
        let grammar = Grammar::from_json_str(source).expect("Failed to load test grammar");
        let app = App::new(Model::new(Session::new(grammar)), ViewOptions::default());

        let backend = TestBackend::new(100, 30);
        let terminal = Terminal::new(backend).expect("Failed to create terminal");

        TestApp { app, terminal }
    }

    /// Send a keyboard event and return the rendered output
    pub fn send_key(&mut self, code: KeyCode) -> String {
        self.send_key_with_modifiers(code, KeyModifiers::empty())
    }

    pub fn send_key_with_modifiers(&mut self, code: KeyCode, modifiers: KeyModifiers) -> String {
        let key = KeyEvent::new(code, modifiers);
        let _ = self.app.handle_key(key);
        self.render()
    }

    /// Render the current application state and return output
    pub fn render(&mut self) -> String {
        use super::ui;

        self.terminal
            .draw(|frame| {
                ui::render(frame, &self.app, "foods.json");
            })
            .expect("Failed to draw");

        self.terminal_output()
    }

    fn terminal_output(&self) -> String {
        let backend = self.terminal.backend();
        let size = backend.size().unwrap();
        let mut output = String::new();

        for y in 0..size.height {
            for x in 0..size.width {
                if let Some(cell) = backend.buffer().cell((x, y)) {
                    output.push_str(cell.symbol());
                } else {
                    output.push(' ');
                }
            }
            output.push('\n');
        }

        output
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn selected_node_id(&self) -> NodeId {
        self.app.model.selected_node_id()
    }

    pub fn label(&self, node_id: NodeId) -> String {
        self.app
            .model
            .session()
            .tree()
            .node(node_id)
            .unwrap()
            .display_name
            .clone()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_initial_render_shows_tree_and_title() {
    let mut app = TestApp::new();
    let output = app.render();
    assert!(output.contains("treevis:: foods.json [abstract]"));
    assert!(output.contains("Comment"));
    assert!(output.contains("Pred"));
    assert!(output.contains("Tree [FOCUSED]"));
}

#[test]
fn test_down_moves_cursor() {
    let mut app = TestApp::new();
    let root = app.selected_node_id();
    app.send_key(KeyCode::Down);
    let pred = app.selected_node_id();
    assert_ne!(root, pred);
    assert_eq!(app.label(pred), "Pred");

    app.send_key(KeyCode::Up);
    assert_eq!(app.selected_node_id(), root);
}

#[test]
fn test_up_at_top_stays() {
    let mut app = TestApp::new();
    let root = app.selected_node_id();
    app.send_key(KeyCode::Up);
    assert_eq!(app.selected_node_id(), root);
}

#[test]
fn test_select_alternative_and_reset() {
    let mut app = TestApp::new();
    // Comment -> Pred -> Item
    app.send_key(KeyCode::Down);
    app.send_key(KeyCode::Down);
    let item = app.selected_node_id();
    assert_eq!(app.label(item), "Item");

    let output = app.send_key(KeyCode::Enter);
    assert_eq!(app.app().focus, Focus::Alternatives);
    assert!(output.contains("> This"));
    assert!(output.contains("  That"));

    app.send_key(KeyCode::Down);
    let output = app.send_key(KeyCode::Enter);
    assert_eq!(app.app().focus, Focus::Tree);
    assert_eq!(app.label(item), "That");
    assert!(output.contains("Selected That"));

    app.send_key(KeyCode::Char('r'));
    assert_eq!(app.label(item), "Item");
}

#[test]
fn test_escape_closes_menu_without_change() {
    let mut app = TestApp::new();
    app.send_key(KeyCode::Enter);
    assert_eq!(app.app().focus, Focus::Alternatives);
    app.send_key(KeyCode::Esc);
    assert_eq!(app.app().focus, Focus::Tree);
    assert_eq!(app.label(app.selected_node_id()), "Comment");
}

#[test]
fn test_language_cycle_and_concrete_selection() {
    let mut app = TestApp::new();
    let output = app.send_key(KeyCode::Char('l'));
    assert!(output.contains("[FoodsEng (en-US)]"));

    // Comment alternatives in English realize Pred as "Item is Quality"
    app.send_key(KeyCode::Enter);
    app.send_key(KeyCode::Enter);
    assert_eq!(app.label(app.selected_node_id()), "Item is Quality");
}

#[test]
fn test_quit_keys() {
    let mut app = TestApp::new();
    app.send_key(KeyCode::Char('q'));
    assert!(app.app().should_quit);

    let mut app = TestApp::new();
    app.send_key_with_modifiers(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.app().should_quit);
}

#[test]
fn test_narrow_terminal_message() {
    let grammar = Grammar::from_json_str(FOODS).unwrap();
    let app = App::new(Model::new(Session::new(grammar)), ViewOptions::default());
    let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
    terminal
        .draw(|frame| super::ui::render(frame, &app, "foods.json"))
        .unwrap();
    let first_line: String = (0..30u16)
        .map(|x| terminal.backend().buffer().cell((x, 0)).unwrap().symbol().to_string())
        .collect();
    assert!(first_line.starts_with("Terminal too narrow"));
}
