//! Viewer entry point, called from the `view` subcommand
use crossterm::event::{self, Event, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use treevis::Session;

use super::app::{App, ViewOptions};
use super::model::Model;
use super::ui;

/// Run the viewer over an already-loaded session
pub fn run_viewer(session: Session, options: ViewOptions, file_name: &str) -> io::Result<()> {
    let mut app = App::new(Model::new(session), options);

    // Setup terminal
    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, file_name);

    // Restore terminal
    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    file_name: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, app, file_name);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(key, app) {
                        return Ok(());
                    }
                }
                // The next draw() picks up the new dimensions
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App) -> bool {
    // Windows reports releases too
    if key.kind != event::KeyEventKind::Press {
        return false;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return false;
    }
    app.handle_key(key);
    app.should_quit
}
