//! ChannelList component: the Dashboard: tracked channels as cards.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use tubestats_proto::protocol::ChannelSummary;
use tubestats_proto::view::{Failure, LoadState};

use crate::{
    action::{Action, ComponentId, Route},
    app_state::AppState,
    component::Component,
    format,
    theme::{style_error, style_muted, C_ACCENT, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub const LOADING_TEXT: &str = "Loading YouTube statistics...";
pub const EMPTY_TEXT: &str = "No YouTube channels added yet. Add a channel to start tracking.";

/// Each card is a title row plus a stats row.
const CARD_ROWS: usize = 2;

pub struct ChannelList {
    pub list: ScrollableList<ChannelSummary>,
    list_state: ListState,
}

impl ChannelList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
        }
    }

    /// Pull the latest listing from state, keeping the selected channel
    /// selected when it is still present.
    pub fn sync(&mut self, state: &AppState) {
        let selected = self.list.selected_item().map(|c| c.channel_id.clone());
        self.list.set_items(state.collection.channels().to_vec(), |c| {
            Some(&c.channel_id) == selected.as_ref()
        });
    }

    fn render_card(channel: &ChannelSummary, is_selected: bool) -> ListItem<'static> {
        let title_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let marker = if is_selected { "▌" } else { " " };

        let title = Line::from(vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::raw(" "),
            Span::styled(channel.title.clone(), title_style),
        ]);
        let stats = Line::from(vec![
            Span::raw("   "),
            stat_span("Subscribers", channel.subscriber_count),
            stat_span("Videos", channel.video_count),
            stat_span("Views", channel.view_count),
            Span::styled(
                format!("Last updated: {}", format::date_time(channel.last_updated)),
                style_muted(),
            ),
        ]);

        let item = ListItem::new(vec![title, stats]);
        if is_selected {
            item.style(Style::default().bg(C_SELECTION_BG))
        } else {
            item
        }
    }
}

fn stat_span(label: &str, value: u64) -> Span<'static> {
    Span::styled(
        format!("{} {}   ", label, format::thousands(value)),
        Style::default().fg(C_SECONDARY),
    )
}

impl Component for ChannelList {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        let criterion = state.collection.criterion();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => {
                if let Some(c) = self.list.selected_item() {
                    return vec![Action::Navigate(Route::Channel(c.channel_id.clone()))];
                }
            }
            KeyCode::Char('s') => return vec![Action::SetSort(criterion.next())],
            KeyCode::Char('S') => return vec![Action::SetSort(criterion.prev())],
            KeyCode::Char('a') => return vec![Action::Navigate(Route::AddChannel)],
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Char('y') => {
                if let Some(c) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(c.channel_id.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge_text = format!("sorted by {} ↓", state.collection.criterion().label());
        let block = pane_chrome(
            "YouTube Channel Statistics",
            focused,
            Some(Badge {
                text: &badge_text,
                color: C_SECONDARY,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = match state.collection.state() {
            LoadState::Loading => Some(Span::styled(format!("  {}", LOADING_TEXT), style_muted())),
            LoadState::Failed(Failure::Message(msg)) => Some(Span::styled(format!("  {}", msg), style_error())),
            LoadState::Failed(Failure::NotFound) => Some(Span::styled("  Not found", style_error())),
            LoadState::Loaded(channels) if channels.is_empty() => {
                Some(Span::styled(format!("  {}", EMPTY_TEXT), style_muted()))
            }
            LoadState::Loaded(_) => None,
        };
        if let Some(span) = message {
            frame.render_widget(Paragraph::new(Line::from(span)).wrap(Wrap { trim: false }), inner);
            return;
        }

        let visible_cards = (inner.height as usize / CARD_ROWS).max(1);
        self.list.ensure_visible(visible_cards);
        let selected = self.list.selected;
        let items: Vec<ListItem> = self
            .list
            .visible_items(visible_cards)
            .map(|(idx, c)| Self::render_card(c, idx == selected))
            .collect();

        self.list_state
            .select(Some(selected.saturating_sub(self.list.scroll_offset)));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tubestats_proto::collection::ChannelCollection;
    use tubestats_proto::protocol::Metric;

    fn channel(id: &str) -> ChannelSummary {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        ChannelSummary {
            channel_id: id.into(),
            title: id.into(),
            description: String::new(),
            subscriber_count: 1,
            view_count: 1,
            video_count: 1,
            published_at: t,
            last_updated: t,
        }
    }

    fn state_with(ids: &[&str]) -> AppState {
        let mut collection = ChannelCollection::new(Metric::SubscriberCount);
        let ticket = collection.begin_load();
        collection.apply(ticket, Ok(ids.iter().map(|id| channel(id)).collect()));
        AppState::new(collection, "http://localhost:8000/".into())
    }

    fn press(list: &mut ChannelList, code: KeyCode, state: &AppState) -> Vec<Action> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    #[test]
    fn test_enter_opens_selected_channel() {
        let state = state_with(&["UCa", "UCb"]);
        let mut list = ChannelList::new();
        list.sync(&state);
        press(&mut list, KeyCode::Down, &state);
        let actions = press(&mut list, KeyCode::Enter, &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::Navigate(Route::Channel(id))] if id == "UCb"
        ));
    }

    #[test]
    fn test_sort_keys_cycle_criterion() {
        let state = state_with(&[]);
        let mut list = ChannelList::new();
        assert!(matches!(
            press(&mut list, KeyCode::Char('s'), &state).as_slice(),
            [Action::SetSort(Metric::ViewCount)]
        ));
        assert!(matches!(
            press(&mut list, KeyCode::Char('S'), &state).as_slice(),
            [Action::SetSort(Metric::VideoCount)]
        ));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let state = state_with(&[]);
        let mut list = ChannelList::new();
        list.sync(&state);
        assert!(press(&mut list, KeyCode::Enter, &state).is_empty());
    }
}
