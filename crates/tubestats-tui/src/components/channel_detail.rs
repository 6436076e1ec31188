//! ChannelDetail component: one channel's record, stats and history chart.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use tubestats_proto::confirm::DeleteState;
use tubestats_proto::history::{ChartSeries, History, Series};
use tubestats_proto::protocol::{ChannelSummary, Metric};
use tubestats_proto::view::{Failure, LoadState};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    format,
    theme::{
        metric_color, style_error, style_muted, style_secondary, style_title, C_MUTED,
        C_PANEL_BORDER, C_PRIMARY, C_WARNING,
    },
    widgets::pane_chrome::pane_chrome,
};

pub const LOADING_TEXT: &str = "Loading channel details...";
pub const NOT_FOUND_TEXT: &str = "Channel not found";
pub const NO_HISTORY_TEXT: &str = "No historical data available yet. Data will be collected over time.";
pub const CONFIRM_TEXT: &str = "Are you sure? d = Yes, Delete / Esc = Cancel";

pub struct ChannelDetail;

impl ChannelDetail {
    pub fn new() -> Self {
        Self
    }
}

impl Component for ChannelDetail {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelDetail
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let Some(detail) = state.detail.as_ref() else {
            return vec![];
        };
        // the request is out; wait for its answer
        if detail.guard().state() == DeleteState::Deleting {
            return vec![];
        }
        let loaded = detail.state().loaded().is_some();
        match key.code {
            KeyCode::Esc if detail.guard().is_pending() => vec![Action::CancelDelete],
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => vec![Action::Back],
            KeyCode::Char('m') => vec![Action::SetMetric(detail.metric().next())],
            KeyCode::Char('M') => vec![Action::SetMetric(detail.metric().prev())],
            KeyCode::Char('d') if loaded => vec![Action::RequestDelete],
            KeyCode::Char('y') => vec![Action::CopyToClipboard(detail.channel_id().to_string())],
            KeyCode::Char('r') => vec![Action::Refresh],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(detail) = state.detail.as_ref() else {
            return;
        };

        let combined = detail.state();
        let title = combined
            .loaded()
            .map(|(c, _)| c.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("Channel");
        let block = pane_chrome(title, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (channel, history) = match combined {
            LoadState::Loading => {
                draw_message(frame, inner, Span::styled(LOADING_TEXT, style_muted()));
                return;
            }
            LoadState::Failed(Failure::NotFound) => {
                draw_message(frame, inner, Span::styled(NOT_FOUND_TEXT, style_error()));
                return;
            }
            LoadState::Failed(Failure::Message(msg)) => {
                draw_message(frame, inner, Span::styled(msg, style_error()));
                return;
            }
            LoadState::Loaded(pair) => pair,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // title, description, meta
                Constraint::Length(3), // stat boxes
                Constraint::Length(1), // delete prompt
                Constraint::Min(6),    // chart
            ])
            .split(inner);

        draw_info(frame, rows[0], channel);
        draw_stats(frame, rows[1], channel);
        draw_delete_prompt(frame, rows[2], detail.guard().state());
        draw_history(frame, rows[3], history, detail.metric());
    }
}

fn draw_message(frame: &mut Frame, area: Rect, span: Span<'_>) {
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(vec![Span::raw("  "), span]),
            Line::from(""),
            Line::from(Span::styled("  Esc back  r retry", style_muted())),
        ])
        .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_info(frame: &mut Frame, area: Rect, channel: &ChannelSummary) {
    let description = channel.description.lines().next().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(format!(" {}", channel.title), style_title())),
        Line::from(Span::styled(
            format!(" {}", format::truncate(description, area.width.saturating_sub(2) as usize)),
            style_secondary(),
        )),
        Line::from(vec![
            Span::styled(" ID: ", style_muted()),
            Span::styled(channel.channel_id.clone(), style_secondary()),
        ]),
        Line::from(vec![
            Span::styled(" Created: ", style_muted()),
            Span::styled(format::date(channel.published_at), style_secondary()),
            Span::styled("   Last Updated: ", style_muted()),
            Span::styled(format::date_time(channel.last_updated), style_secondary()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_stats(frame: &mut Frame, area: Rect, channel: &ChannelSummary) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    let boxes = [
        ("Subscribers", channel.subscriber_count, Metric::SubscriberCount),
        ("Videos", channel.video_count, Metric::VideoCount),
        ("Total Views", channel.view_count, Metric::ViewCount),
    ];
    for ((label, value, metric), col) in boxes.into_iter().zip(cols.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_PANEL_BORDER))
            .title(Span::styled(format!(" {} ", label), style_muted()));
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", format::thousands(value)),
                Style::default()
                    .fg(metric_color(metric))
                    .add_modifier(Modifier::BOLD),
            ))
            .block(block),
            *col,
        );
    }
}

fn draw_delete_prompt(frame: &mut Frame, area: Rect, delete: DeleteState) {
    let span = match delete {
        DeleteState::PendingConfirm => Span::styled(
            format!(" {}", CONFIRM_TEXT),
            Style::default().fg(C_WARNING).add_modifier(Modifier::BOLD),
        ),
        DeleteState::Deleting => Span::styled(" Deleting…", Style::default().fg(C_WARNING)),
        DeleteState::Idle | DeleteState::Deleted => Span::styled(" d delete channel", style_muted()),
    };
    frame.render_widget(Paragraph::new(Line::from(span)), area);
}

fn draw_history(frame: &mut Frame, area: Rect, history: &History, metric: Metric) {
    let tabs: Vec<Span> = Metric::ALL
        .iter()
        .map(|&m| {
            if m == metric {
                Span::styled(
                    format!("[{}] ", m.label()),
                    Style::default().fg(metric_color(m)).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {}  ", m.label()), style_muted())
            }
        })
        .collect();
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(C_PANEL_BORDER))
        .title(Line::from(
            std::iter::once(Span::styled(" Historical Data  ", style_title()))
                .chain(tabs)
                .collect::<Vec<_>>(),
        ));

    match history.series(metric) {
        Series::NoHistory => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", NO_HISTORY_TEXT), style_muted()))
                    .wrap(Wrap { trim: false }),
                inner,
            );
        }
        Series::Points(series) => draw_chart(frame, area, block, &series),
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, block: Block<'_>, series: &ChartSeries) {
    let data = series.xy();
    let color = metric_color(series.metric);
    let dataset = Dataset::default()
        .name(series.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let [y_min, y_max] = series.y_bounds();
    let y_labels: Vec<String> = [y_min, (y_min + y_max) / 2.0, y_max]
        .iter()
        .map(|v| format::thousands(v.round() as u64))
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(block.title_bottom(Line::from(Span::styled(
            format!(" {} ", series.title()),
            Style::default().fg(C_MUTED),
        ))))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(C_MUTED))
                .bounds(series.x_bounds())
                .labels(series.axis_labels()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(C_MUTED))
                .bounds([y_min, y_max])
                .labels(y_labels),
        )
        .style(Style::default().fg(C_PRIMARY));
    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratatui::crossterm::event::KeyModifiers;
    use tubestats_proto::collection::ChannelCollection;
    use tubestats_proto::detail::DetailView;
    use tubestats_proto::view::ViewToken;

    fn loaded_state() -> AppState {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let token = ViewToken::default();
        let mut detail = DetailView::new("UCa", Metric::SubscriberCount, token);
        detail.apply_channel(
            token,
            Ok(ChannelSummary {
                channel_id: "UCa".into(),
                title: "A".into(),
                description: String::new(),
                subscriber_count: 1,
                view_count: 1,
                video_count: 1,
                published_at: t,
                last_updated: t,
            }),
        );
        detail.apply_history(token, Ok(Vec::new()));
        let mut state = AppState::new(
            ChannelCollection::new(Metric::SubscriberCount),
            "http://localhost:8000/".into(),
        );
        state.detail = Some(detail);
        state
    }

    fn press(state: &AppState, code: KeyCode) -> Vec<Action> {
        ChannelDetail::new().handle_key(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    #[test]
    fn test_esc_cancels_pending_delete_before_going_back() {
        let mut state = loaded_state();
        assert!(matches!(press(&state, KeyCode::Esc).as_slice(), [Action::Back]));

        state.detail.as_mut().unwrap().guard_mut().request_delete();
        assert!(matches!(press(&state, KeyCode::Esc).as_slice(), [Action::CancelDelete]));
        assert!(matches!(press(&state, KeyCode::Char('d')).as_slice(), [Action::RequestDelete]));
    }

    #[test]
    fn test_keys_ignored_while_deleting() {
        let mut state = loaded_state();
        let guard = state.detail.as_mut().unwrap().guard_mut();
        guard.request_delete();
        guard.request_delete();
        assert!(press(&state, KeyCode::Char('d')).is_empty());
        assert!(press(&state, KeyCode::Esc).is_empty());
    }

    #[test]
    fn test_metric_keys_cycle() {
        let state = loaded_state();
        assert!(matches!(
            press(&state, KeyCode::Char('m')).as_slice(),
            [Action::SetMetric(Metric::ViewCount)]
        ));
        assert!(matches!(
            press(&state, KeyCode::Char('M')).as_slice(),
            [Action::SetMetric(Metric::VideoCount)]
        ));
    }
}
