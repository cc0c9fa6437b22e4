//! Alternatives viewer - the menu of functions that can realize a category

use super::model::Model;
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

#[derive(Debug, Default)]
pub struct AlternativesViewer {
    /// Highlighted entry of the open menu
    cursor: usize,
}

impl AlternativesViewer {
    pub fn new() -> Self {
        AlternativesViewer { cursor: 0 }
    }

    /// Start at the top whenever a menu is (re)opened
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }
}

impl Viewer for AlternativesViewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model) {
        let Some(menu) = model.menu() else {
            let hint = Paragraph::new("Enter on a category lists its alternatives")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, area);
            return;
        };

        let lines: Vec<Line> = menu
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                if index == self.cursor {
                    Line::from(format!("> {}", option)).style(
                        Style::default()
                            .bg(Color::Blue)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::from(format!("  {}", option))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent> {
        let Some(menu) = model.menu() else {
            return Some(ViewerEvent::CloseAlternatives);
        };

        let event = match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                ViewerEvent::NoChange
            }
            KeyCode::Down => {
                if self.cursor + 1 < menu.options.len() {
                    self.cursor += 1;
                }
                ViewerEvent::NoChange
            }
            KeyCode::Enter => match menu.options.get(self.cursor) {
                Some(option) => ViewerEvent::ChooseAlternative(menu.node_id, option.clone()),
                None => ViewerEvent::CloseAlternatives,
            },
            KeyCode::Esc => ViewerEvent::CloseAlternatives,
            _ => ViewerEvent::NoChange,
        };
        Some(event)
    }
}
