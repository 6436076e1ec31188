//! Status bar: bottom line with input mode and the keys of the current screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Route;
use crate::theme::{C_MODE_INSERT, C_MODE_NORMAL, C_MUTED, C_SEPARATOR, C_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into a form field; letter keys are text, not commands.
    Insert,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Insert => C_MODE_INSERT,
        }
    }
}

/// Key hints for a screen.
pub fn key_hints(route: &Route, delete_pending: bool) -> &'static str {
    match route {
        Route::Dashboard => " ↑↓/jk select  Enter open  s/S sort  a add  r refresh  ? help  q quit",
        Route::Channel(_) if delete_pending => " d yes, delete  Esc cancel",
        Route::Channel(_) => " m/M metric  d delete  y copy ID  r refresh  Esc back  ? help  q quit",
        Route::AddChannel => " Tab switch field  Enter add  Esc cancel  Ctrl+C quit",
    }
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, route: &Route, delete_pending: bool) {
    let keys_color = if delete_pending { C_WARNING } else { C_MUTED };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(key_hints(route, delete_pending), Style::default().fg(keys_color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_delete_prompt() {
        let route = Route::Channel("UCa".into());
        assert!(key_hints(&route, false).contains("d delete"));
        assert!(key_hints(&route, true).contains("Esc cancel"));
        assert!(key_hints(&Route::AddChannel, false).contains("Tab"));
    }
}
