use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::types::{Mode, ScrollDirection};

pub struct InputHandler;

impl InputHandler {
    /// Returns true when the app should quit.
    pub async fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return Ok(true);
        }

        Self::handle_key_press(app, key).await;
        Ok(false)
    }

    async fn handle_key_press(app: &mut App, key: KeyEvent) {
        // Scrolling works in every mode except while recording
        if app.mode != Mode::Recording {
            match key.code {
                KeyCode::Up => return app.handle_scroll(ScrollDirection::Up, 1),
                KeyCode::Down => return app.handle_scroll(ScrollDirection::Down, 1),
                KeyCode::PageUp => return app.handle_scroll(ScrollDirection::PageUp, 10),
                KeyCode::PageDown => return app.handle_scroll(ScrollDirection::PageDown, 10),
                KeyCode::Home => return app.handle_scroll(ScrollDirection::Home, 0),
                KeyCode::End => return app.handle_scroll(ScrollDirection::End, 0),
                _ => {}
            }
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Self::toggle_recording(app),
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => app.new_chat().await,
            (KeyCode::Enter, _) if app.mode == Mode::Idle => app.submit_input().await,
            (KeyCode::Esc, _) => app.cancel_recording(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT)
                if app.can_edit_input() =>
            {
                app.input.push(c);
            }
            (KeyCode::Backspace, _) if app.can_edit_input() => {
                app.input.pop();
            }
            _ => {}
        }
    }

    fn toggle_recording(app: &mut App) {
        if app.can_start_recording() {
            app.start_recording();
        } else if app.can_stop_recording() {
            app.stop_recording();
        }
    }
}
