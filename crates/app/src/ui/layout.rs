use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct MainLayout {
    pub output: Rect,
    pub help: Rect,
    pub input: Rect,
}

pub struct LayoutManager;

impl LayoutManager {
    pub fn create_main_layout(area: Rect) -> MainLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Transcript
                Constraint::Length(7), // Help pane
                Constraint::Length(1), // Input line
            ])
            .split(area);

        MainLayout {
            output: chunks[0],
            help: chunks[1],
            input: chunks[2],
        }
    }
}
