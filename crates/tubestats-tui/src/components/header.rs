//! Header component: app title, navigation tabs and the API endpoint.
//!
//! Not focusable; draws to a 2-row area (title row + separator).

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId, Route},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::status_bar::draw_separator,
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let endpoint = format!("{} ", state.api_url);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(endpoint.chars().count() as u16),
            ])
            .split(rows[0]);

        frame.render_widget(Paragraph::new(build_title_row(&state.route)), cols[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(endpoint, Style::default().fg(C_MUTED))),
            cols[1],
        );
        if area.height > 1 {
            draw_separator(frame, rows[1]);
        }
    }
}

fn build_title_row(route: &Route) -> Line<'static> {
    let mut spans = vec![
        Span::styled(" ▶ ", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(
            "YouTube Stats Tracker",
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    for tab in [Route::Dashboard, Route::AddChannel] {
        spans.push(tab_span(&tab, route));
        spans.push(Span::raw(" "));
    }
    if matches!(route, Route::Channel(_)) {
        spans.push(tab_span(route, route));
    }
    Line::from(spans)
}

fn tab_span(tab: &Route, active: &Route) -> Span<'static> {
    let is_active = std::mem::discriminant(tab) == std::mem::discriminant(active);
    if is_active {
        Span::styled(
            format!("[{}]", tab.label()),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {} ", tab.label()), Style::default().fg(C_SECONDARY))
    }
}
