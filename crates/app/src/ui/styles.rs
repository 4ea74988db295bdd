use ratatui::style::{Color, Modifier, Style};

use crate::constants::prefixes;

pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn mode_indicator() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn recording_indicator() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub fn help_desc() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn help_title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn for_output_line(line: &str) -> Style {
        if line.starts_with(prefixes::ASR) {
            Style::default().fg(Color::Cyan)
        } else if line.starts_with(prefixes::SYS) {
            Style::default().fg(Color::Yellow)
        } else if line.starts_with(prefixes::BOT) {
            Style::default().fg(Color::Green)
        } else if line.starts_with(prefixes::WARN) {
            Style::default().fg(Color::Red)
        } else if line.starts_with(prefixes::YOU) {
            Style::default().fg(Color::Blue)
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_render_red() {
        let style = Styles::for_output_line("WARN> Failed to load emails: boom");
        assert_eq!(style.fg, Some(Color::Red));
    }

    #[test]
    fn unprefixed_lines_use_the_default() {
        let style = Styles::for_output_line("plain line");
        assert_eq!(style.fg, Some(Color::White));
    }
}
