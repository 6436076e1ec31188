//! HelpOverlay component: centered popup listing the keys of every screen.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !state.show_help {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // everything else is swallowed while the overlay is open
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !state.show_help {
            return;
        }

        let popup = centered_rect(64, 30, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" dashboard"),
            help_row("↑ / ↓  or  j / k", "move selection"),
            help_row("pg up / pg dn", "jump 10 cards"),
            help_row("g / G", "jump first / last"),
            help_row("enter", "open channel details"),
            help_row("s / S", "cycle sort forward / backward"),
            help_row("a", "add a channel"),
            Line::from(""),
            section(" channel details"),
            help_row("m / M", "cycle chart metric"),
            help_row("d", "delete (press again to confirm)"),
            help_row("esc", "cancel delete, else go back"),
            Line::from(""),
            section(" add channel"),
            help_row("tab / shift-tab", "switch field"),
            help_row("enter", "add channel"),
            help_row("esc", "back to dashboard"),
            Line::from(""),
            section(" everywhere"),
            help_row("r", "reload from the API"),
            help_row("y", "copy channel ID"),
            help_row("?", "toggle this help overlay"),
            help_row("q / Ctrl+C", "quit (only Ctrl+C while typing)"),
            Line::from(""),
            Line::from(Span::styled(" press ? or esc to close", Style::default().fg(C_MUTED))),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(Color::Rgb(18, 18, 26))),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(r.height)),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use tubestats_proto::collection::ChannelCollection;
    use tubestats_proto::protocol::Metric;

    #[test]
    fn test_open_overlay_swallows_keys() {
        let mut state = AppState::new(
            ChannelCollection::new(Metric::SubscriberCount),
            "http://localhost:8000/".into(),
        );
        let mut overlay = HelpOverlay::new();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        assert!(overlay.handle_key(key('?'), &state).is_empty());
        state.show_help = true;
        assert!(overlay.handle_key(key('d'), &state).is_empty());
        assert!(matches!(
            overlay.handle_key(key('?'), &state).as_slice(),
            [Action::ToggleHelp]
        ));
    }

    #[test]
    fn test_centered_rect_fits_small_terminals() {
        let area = Rect::new(0, 0, 80, 10);
        let popup = centered_rect(64, 30, area);
        assert!(popup.height <= area.height);
    }
}
