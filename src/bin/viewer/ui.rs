//! Screen layout
//!
//! ```text
//! treevis:: foods.json [FoodsEng (en-US)]      <- title, one row
//! ┌Tree [FOCUSED]──────┐┌Alternatives────────┐
//! │▾◇ Comment          ││> This              │
//! │  ▾ƒ Pred           ││  That              │
//! └────────────────────┘└────────────────────┘
//! Selected That                                 <- status, one row
//! ```

use super::app::App;
use super::model::Focus;
use super::viewer::Viewer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Narrower than this and the two panes stop being readable
const MIN_WIDTH: u16 = 50;
const KEY_HINTS: &str =
    "↑↓ move  ←→ fold  ⏎ alternatives  r reset  R reset all  l language  q quit";

pub fn render(frame: &mut Frame, app: &App, file_name: &str) {
    let screen = frame.area();
    if screen.width < MIN_WIDTH {
        let warning = Paragraph::new(format!(
            "Terminal too narrow: {} < {} chars",
            screen.width, MIN_WIDTH
        ))
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        frame.render_widget(warning, screen);
        return;
    }

    let [title, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(screen);

    draw_title(frame, title, app, file_name);
    draw_panes(frame, body, app);
    draw_status(frame, status, app);
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App, file_name: &str) {
    let text = format!("treevis:: {} [{}]", file_name, app.model.mode_label());
    let style = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_panes(frame: &mut Frame, area: Rect, app: &App) {
    let [tree, alternatives] = Layout::horizontal([
        Constraint::Length(app.options.tree_width),
        Constraint::Min(1),
    ])
    .areas(area);

    let inner = framed(frame, tree, "Tree", app.focus == Focus::Tree);
    app.tree_viewer.render(frame, inner, &app.model);

    let inner = framed(
        frame,
        alternatives,
        "Alternatives",
        app.focus == Focus::Alternatives,
    );
    app.alternatives_viewer.render(frame, inner, &app.model);
}

/// Draw a bordered pane and hand back the area inside the border
fn framed(frame: &mut Frame, area: Rect, name: &str, focused: bool) -> Rect {
    let title = if focused {
        format!("{} [FOCUSED]", name)
    } else {
        name.to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let message = match app.model.status() {
        "" => KEY_HINTS,
        status => status,
    };
    let style = Style::default().fg(Color::White).bg(Color::DarkGray);
    frame.render_widget(Paragraph::new(message).style(style), area);
}
