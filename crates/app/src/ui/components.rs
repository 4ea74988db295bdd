use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::styles::Styles;
use crate::app::App;
use crate::types::Mode;

pub struct OutputPane;

impl OutputPane {
    pub fn render(frame: &mut Frame, area: &Rect, app: &App) {
        let visible = Self::visible_lines(app, area.height as usize);
        let items: Vec<ListItem> = visible
            .iter()
            .map(|line| {
                let style = Styles::for_output_line(line);
                ListItem::new(Line::from(line.as_str())).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .style(Styles::default());

        frame.render_widget(list, *area);
    }

    /// The window of transcript lines ending `scroll_offset` lines above
    /// the bottom.
    fn visible_lines(app: &App, height: usize) -> Vec<String> {
        let total = app.output.len();
        let end = total.saturating_sub(app.scroll_offset);
        let start = end.saturating_sub(height);
        app.output[start..end].to_vec()
    }
}

pub struct HelpPane;

impl HelpPane {
    pub fn render(frame: &mut Frame, area: &Rect, _app: &App) {
        let widget = Paragraph::new(Self::create_help_content())
            .block(
                Block::default()
                    .title(" Shortcuts ")
                    .borders(Borders::ALL)
                    .style(Styles::help_title()),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(widget, *area);
    }

    fn create_help_content() -> Vec<Line<'static>> {
        vec![
            Self::help_line("Enter", "Send question"),
            Self::help_line("Ctrl+R", "Toggle voice input"),
            Self::help_line("Ctrl+N", "New chat (reload emails)"),
            Self::help_line("Esc", "Cancel recording"),
            Self::help_line("Ctrl+C", "Quit"),
        ]
    }

    fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:<10}", key), Styles::help_key()),
            Span::styled(desc, Styles::help_desc()),
        ])
    }
}

pub struct InputLine;

impl InputLine {
    pub fn render(frame: &mut Frame, area: &Rect, app: &App) {
        let spans = Self::create_status_spans(app, area.width as usize);
        let widget = Paragraph::new(Line::from(spans))
            .style(Styles::default())
            .alignment(Alignment::Left);

        frame.render_widget(widget, *area);
    }

    fn create_status_spans(app: &App, width: usize) -> Vec<Span<'_>> {
        let mut spans = vec![Span::raw(format!("> {}", app.input))];

        // Measured in chars, not bytes: the input can hold non-ASCII text.
        let input_len = 2 + app.input.chars().count();
        let mode_display = format!("[mode: {}]", Self::mode_text(&app.mode));
        let (rec_indicator, rec_len) = Self::recording_indicator(app);

        let right_len = mode_display.chars().count() + rec_len;
        let spacing = width.saturating_sub(input_len + right_len);

        spans.push(Span::raw(" ".repeat(spacing)));
        spans.push(Span::styled(mode_display, Styles::mode_indicator()));
        if !rec_indicator.is_empty() {
            spans.push(Span::styled(rec_indicator, Styles::recording_indicator()));
        }

        spans
    }

    fn mode_text(mode: &Mode) -> &'static str {
        match mode {
            Mode::Idle => "Idle",
            Mode::Recording => "Recording",
            Mode::Transcribing => "Transcribing",
            Mode::Answering => "Answering",
        }
    }

    fn recording_indicator(app: &App) -> (String, usize) {
        if app.mode == Mode::Recording {
            let dot = if app.recording.blink_state { "●" } else { "○" };
            let indicator = format!("  [REC {} {}]", dot, app.get_recording_time());
            // The REC dot is a multi-byte glyph one column wide.
            let len = indicator.chars().count();
            (indicator, len)
        } else {
            (String::new(), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_indicator_measures_glyphs_not_bytes() {
        let mut app = App::new();
        app.mode = Mode::Recording;
        let (indicator, width) = InputLine::recording_indicator(&app);
        assert_eq!(width, indicator.chars().count());
        assert!(indicator.len() > width);
    }

    #[test]
    fn status_line_stays_right_aligned_with_non_ascii_input() {
        let mut app = App::new();
        app.input = "café?".to_string();
        let spans = InputLine::create_status_spans(&app, 40);
        let total: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        assert_eq!(total, 40);
    }
}
