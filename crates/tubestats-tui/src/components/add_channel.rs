//! AddChannel component: URL + ID form. A pasted channel URL fills the ID
//! field when it carries an ID.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use tubestats_proto::resolve::resolve_channel_id;

use crate::{
    action::{Action, ComponentId, Route},
    app_state::AppState,
    component::Component,
    focus::FocusRing,
    theme::{style_error, style_muted, style_secondary, C_ACCENT, C_PRIMARY, C_WARNING},
    widgets::{
        pane_chrome::pane_chrome,
        text_field::{FieldAction, TextField},
    },
};

pub const SUBMITTING_TEXT: &str = "Adding...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Id,
}

pub struct AddChannel {
    url: TextField,
    id: TextField,
    focus: FocusRing<Field>,
}

impl AddChannel {
    pub fn new() -> Self {
        Self {
            url: TextField::new("https://www.youtube.com/channel/..."),
            id: TextField::new("UCxxx..."),
            focus: FocusRing::new(vec![Field::Url, Field::Id]),
        }
    }

    pub fn reset(&mut self) {
        self.url.clear();
        self.id.clear();
        self.focus.set(Field::Url);
    }

    fn on_url_changed(&mut self, url: &str) {
        if let Some(id) = resolve_channel_id(url).into_channel_id() {
            debug!("add form: url resolved to {}", id);
            self.id.set_value(&id);
        }
    }

    fn field(&mut self, which: Field) -> &mut TextField {
        match which {
            Field::Url => &mut self.url,
            Field::Id => &mut self.id,
        }
    }
}

impl Component for AddChannel {
    fn id(&self) -> ComponentId {
        ComponentId::AddChannel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || state.add_status.is_submitting() {
            return vec![];
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus.next();
                return vec![];
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus.prev();
                return vec![];
            }
            _ => {}
        }

        let Some(focused) = self.focus.current() else {
            return vec![];
        };
        match self.field(focused).handle_key(key) {
            FieldAction::Submitted => vec![Action::SubmitAdd(self.id.text().to_string())],
            FieldAction::Cancelled => vec![Action::Navigate(Route::Dashboard)],
            FieldAction::Changed(value) => match focused {
                Field::Url => {
                    self.on_url_changed(&value);
                    vec![]
                }
                Field::Id => vec![Action::AddFormEdited],
            },
            FieldAction::None => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Navigate(Route::AddChannel) = action {
            self.reset();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("Add YouTube Channel", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // url label
                Constraint::Length(1), // url field
                Constraint::Length(1), // url hint
                Constraint::Length(1),
                Constraint::Length(1), // id label
                Constraint::Length(1), // id field
                Constraint::Length(1), // id hint
                Constraint::Length(1),
                Constraint::Length(1), // error
                Constraint::Length(1), // submit
                Constraint::Length(1),
                Constraint::Min(0), // help
            ])
            .split(inner);

        let url_focused = self.focus.is_focused(Field::Url);
        let id_focused = self.focus.is_focused(Field::Id);
        let submitting = state.add_status.is_submitting();

        label(frame, rows[0], "YouTube Channel URL (optional):", url_focused);
        self.url.draw(frame, rows[1], focused && url_focused && !submitting);
        hint(frame, rows[2], "Enter a YouTube channel URL to automatically extract the channel ID");

        label(frame, rows[4], "YouTube Channel ID:", id_focused);
        self.id.draw(frame, rows[5], focused && id_focused && !submitting);
        hint(frame, rows[6], "Enter the YouTube channel ID (starts with UC...)");

        if let Some(err) = state.add_status.error() {
            frame.render_widget(Paragraph::new(Span::styled(format!(" {}", err), style_error())), rows[8]);
        }

        let submit = if submitting {
            Span::styled(format!(" {}", SUBMITTING_TEXT), Style::default().fg(C_WARNING))
        } else {
            Span::styled(
                " Enter: Add Channel   Esc: Cancel",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )
        };
        frame.render_widget(Paragraph::new(submit), rows[9]);

        let help = vec![
            Line::from(Span::styled(" How to find a YouTube Channel ID:", style_secondary())),
            Line::from(Span::styled("  1. Go to the YouTube channel page", style_muted())),
            Line::from(Span::styled("  2. Look at the URL in your browser", style_muted())),
            Line::from(Span::styled(
                "  3. If the URL contains \"/channel/\", the ID comes right after that",
                style_muted(),
            )),
            Line::from(Span::styled(
                "  4. Or view the channel page source and search for \"channelId\"",
                style_muted(),
            )),
        ];
        frame.render_widget(Paragraph::new(help).wrap(Wrap { trim: false }), rows[11]);
    }
}

fn label(frame: &mut Frame, area: Rect, text: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        style_secondary()
    };
    frame.render_widget(Paragraph::new(Span::styled(format!(" {}", text), style)), area);
}

fn hint(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(Paragraph::new(Span::styled(format!(" {}", text), style_muted())), area);
}
