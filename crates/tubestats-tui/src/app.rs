//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from the key reader
//!   and from background API requests.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Every API result comes back tagged with the ticket or view token it was
//!   issued under, so answers meant for a screen that is gone get dropped.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use tubestats_proto::api::ChannelApi;
use tubestats_proto::collection::{self, AddChannelError, ChannelCollection, FetchTicket};
use tubestats_proto::config::UiConfig;
use tubestats_proto::confirm::{DeleteStep, DELETE_FAILED};
use tubestats_proto::detail::DetailView;
use tubestats_proto::error::ApiError;
use tubestats_proto::protocol::{ChannelSummary, MetricSnapshot};
use tubestats_proto::view::ViewToken;

use crate::{
    action::{Action, Route},
    app_state::{AppState, SubmitStatus},
    component::Component,
    components::{
        add_channel::AddChannel,
        channel_detail::{ChannelDetail, NOT_FOUND_TEXT}, channel_list::ChannelList,
        header::Header, help_overlay::HelpOverlay,
    },
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

pub const ADDED_TEXT: &str = "Channel added successfully!";
pub const DELETED_TEXT: &str = "Channel deleted successfully";

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Listed(FetchTicket, Result<Vec<ChannelSummary>, ApiError>),
    ChannelLoaded(ViewToken, Result<ChannelSummary, ApiError>),
    HistoryLoaded(ViewToken, Result<Vec<MetricSnapshot>, ApiError>),
    Added(Result<ChannelSummary, AddChannelError>),
    Deleted(ViewToken, String, Result<(), ApiError>),
}

pub struct App {
    api: Arc<dyn ChannelApi>,
    state: AppState,
    ui: UiConfig,
    /// Token of the most recently opened detail view.
    token: ViewToken,

    header: Header,
    channel_list: ChannelList,
    channel_detail: ChannelDetail,
    add_channel: AddChannel,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
    /// Read requests for the current screen; aborted on navigation.
    loads: Vec<JoinHandle<()>>,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn ChannelApi>, api_url: String, ui: UiConfig) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let state = AppState::new(ChannelCollection::new(ui.default_sort), api_url);
        Self {
            api,
            state,
            ui,
            token: ViewToken::default(),
            header: Header::new(),
            channel_list: ChannelList::new(),
            channel_detail: ChannelDetail::new(),
            add_channel: AddChannel::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            tx,
            rx: Some(rx),
            loads: Vec::new(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut rx) = self.rx.take() else {
            anyhow::bail!("event loop already started");
        };

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        self.start_list_load();

        // Toast expiry + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    // Drain whatever else is queued before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                }

                _ = toast_tick.tick() => {
                    self.toast.tick();
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        for handle in self.loads.drain(..) {
            handle.abort();
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("tubestats exiting");

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                let actions = self.handle_key(key);
                for a in actions {
                    self.dispatch(a);
                }
            }
            AppMessage::Event(_) => {}

            AppMessage::Listed(ticket, result) => {
                if self.state.collection.apply(ticket, result) {
                    self.channel_list.sync(&self.state);
                }
            }

            AppMessage::ChannelLoaded(token, result) => {
                if let Some(detail) = self.state.detail.as_mut() {
                    detail.apply_channel(token, result);
                }
            }

            AppMessage::HistoryLoaded(token, result) => {
                if let Some(detail) = self.state.detail.as_mut() {
                    detail.apply_history(token, result);
                }
            }

            AppMessage::Added(result) => self.on_added(result),

            AppMessage::Deleted(token, channel_id, result) => {
                self.on_deleted(token, channel_id, result)
            }
        }
    }

    fn on_added(&mut self, result: Result<ChannelSummary, AddChannelError>) {
        match result {
            Ok(channel) => {
                info!("added channel {}", channel.channel_id);
                self.state.add_status = SubmitStatus::Idle;
                self.toast.success(ADDED_TEXT);
                if self.state.route == Route::AddChannel {
                    self.dispatch(Action::Navigate(Route::Channel(channel.channel_id)));
                }
            }
            Err(e) => {
                warn!("add channel failed: {}", e);
                let message = e.user_message();
                if self.state.route != Route::AddChannel {
                    self.toast.error(message.clone());
                }
                self.state.add_status = SubmitStatus::Failed(message);
            }
        }
    }

    fn on_deleted(&mut self, token: ViewToken, channel_id: String, result: Result<(), ApiError>) {
        let current = self
            .state
            .detail
            .as_mut()
            .filter(|d| d.token() == token);
        let still_viewing = current.is_some();
        if let Some(detail) = current {
            detail.guard_mut().finish(&result);
        }

        match result {
            Ok(()) => {
                info!("deleted channel {}", channel_id);
                self.toast
                    .resolve_spinner(Severity::Success, DELETED_TEXT, Duration::from_secs(3));
                self.state.collection.forget(&channel_id);
                self.channel_list.sync(&self.state);
                if still_viewing {
                    self.dispatch(Action::Navigate(Route::Dashboard));
                }
            }
            Err(e) if e.is_not_found() => {
                warn!("delete of {}: channel already gone", channel_id);
                self.toast.resolve_spinner(
                    Severity::Error,
                    e.user_message(NOT_FOUND_TEXT),
                    Duration::from_secs(5),
                );
                self.state.collection.forget(&channel_id);
                self.channel_list.sync(&self.state);
                if let Some(detail) = self.state.detail.as_mut().filter(|d| d.token() == token) {
                    detail.mark_missing();
                }
            }
            Err(e) => {
                warn!("delete of {} failed: {}", channel_id, e);
                self.toast.resolve_spinner(
                    Severity::Error,
                    e.user_message(DELETE_FAILED),
                    Duration::from_secs(5),
                );
            }
        }
    }

    // ── Key routing ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                if self.state.input_mode == InputMode::Normal {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('?') if self.state.input_mode == InputMode::Normal => {
                return vec![Action::ToggleHelp];
            }
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.state.show_help {
            return self.help_overlay.handle_key(key, &self.state);
        }

        let target: &mut dyn Component = match self.state.route {
            Route::Dashboard => &mut self.channel_list,
            Route::Channel(_) => &mut self.channel_detail,
            Route::AddChannel => &mut self.add_channel,
        };
        let actions = target.handle_key(key, &self.state);
        if !actions.is_empty() {
            trace!("{:?}: {:?} -> {:?}", target.id(), key.code, actions);
        }
        actions
    }

    // ── Action dispatch ──────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first (e.g. the add form resets itself).
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.channel_list.on_action(&action, s));
            out.extend(self.channel_detail.on_action(&action, s));
            out.extend(self.add_channel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Navigation ───────────────────────────────────────────────────
            Action::Navigate(route) => self.navigate(route),
            Action::Back => self.navigate(Route::Dashboard),

            // ── Dashboard ────────────────────────────────────────────────────
            Action::SetSort(criterion) => {
                if let Some(ticket) = self.state.collection.set_criterion(criterion) {
                    self.channel_list.sync(&self.state);
                    self.spawn_list(ticket);
                }
            }
            Action::Refresh => match self.state.route.clone() {
                Route::Dashboard => self.start_list_load(),
                Route::Channel(id) => self.navigate(Route::Channel(id)),
                Route::AddChannel => {}
            },

            // ── Channel detail ───────────────────────────────────────────────
            Action::SetMetric(metric) => {
                if let Some(detail) = self.state.detail.as_mut() {
                    detail.set_metric(metric);
                }
            }
            Action::RequestDelete => self.request_delete(),
            Action::CancelDelete => {
                if let Some(detail) = self.state.detail.as_mut() {
                    detail.guard_mut().cancel();
                }
            }

            // ── Add channel ──────────────────────────────────────────────────
            Action::SubmitAdd(raw) => self.submit_add(&raw),
            Action::AddFormEdited => {
                if self.state.add_status.error().is_some() {
                    self.state.add_status = SubmitStatus::Idle;
                }
            }

            // ── UI ───────────────────────────────────────────────────────────
            Action::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => self.toast.push(format!("copied: {}", text), Severity::Info, Duration::from_secs(2)),
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            // ── System ───────────────────────────────────────────────────────
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        for handle in self.loads.drain(..) {
            handle.abort();
        }

        match &route {
            Route::Dashboard => {
                self.state.detail = None;
                self.start_list_load();
            }
            Route::Channel(id) => {
                self.token = self.token.next();
                match self.state.detail.as_mut() {
                    Some(detail) => detail.switch_to(id.clone(), self.ui.default_metric, self.token),
                    None => {
                        self.state.detail =
                            Some(DetailView::new(id.clone(), self.ui.default_metric, self.token))
                    }
                }
                self.spawn_detail(id.clone(), self.token);
            }
            Route::AddChannel => {
                self.state.detail = None;
                self.state.add_status = SubmitStatus::Idle;
            }
        }

        debug!("route: {:?} -> {:?}", self.state.route, route);
        self.state.route = route;
        self.sync_input_mode();
    }

    fn request_delete(&mut self) {
        let Some(detail) = self.state.detail.as_mut() else {
            return;
        };
        if detail.state().loaded().is_none() {
            return;
        }
        let token = detail.token();
        match detail.guard_mut().request_delete() {
            DeleteStep::Armed | DeleteStep::Ignored => {}
            DeleteStep::Execute(channel_id) => {
                self.toast.spinner("Deleting channel…");
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_channel(&channel_id).await;
                    let _ = tx.send(AppMessage::Deleted(token, channel_id, result)).await;
                });
            }
        }
    }

    fn submit_add(&mut self, raw: &str) {
        if self.state.add_status.is_submitting() {
            return;
        }
        let channel_id = match collection::normalize_channel_id(raw) {
            Ok(id) => id,
            Err(e) => {
                self.state.add_status = SubmitStatus::Failed(e.user_message());
                return;
            }
        };
        self.state.add_status = SubmitStatus::Submitting;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = collection::add_channel(api.as_ref(), &channel_id).await;
            let _ = tx.send(AppMessage::Added(result)).await;
        });
    }

    // ── Background reads ─────────────────────────────────────────────────────

    fn start_list_load(&mut self) {
        let ticket = self.state.collection.begin_load();
        self.channel_list.sync(&self.state);
        self.spawn_list(ticket);
    }

    fn spawn_list(&mut self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.track(tokio::spawn(async move {
            let result = api.list_channels(ticket.criterion).await;
            let _ = tx.send(AppMessage::Listed(ticket, result)).await;
        }));
    }

    fn spawn_detail(&mut self, channel_id: String, token: ViewToken) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let id = channel_id.clone();
        self.track(tokio::spawn(async move {
            let result = api.get_channel(&id).await;
            let _ = tx.send(AppMessage::ChannelLoaded(token, result)).await;
        }));

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.track(tokio::spawn(async move {
            let result = api.channel_history(&channel_id).await;
            let _ = tx.send(AppMessage::HistoryLoaded(token, result)).await;
        }));
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.loads.retain(|h| !h.is_finished());
        self.loads.push(handle);
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = match self.state.route {
            Route::AddChannel => InputMode::Insert,
            _ => InputMode::Normal,
        };
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: header | body | statusbar ──────────────────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], false, &self.state);

        let focused = !self.state.show_help;
        match self.state.route {
            Route::Dashboard => self.channel_list.draw(frame, outer[1], focused, &self.state),
            Route::Channel(_) => self.channel_detail.draw(frame, outer[1], focused, &self.state),
            Route::AddChannel => self.add_channel.draw(frame, outer[1], focused, &self.state),
        }

        status_bar::draw_keys_bar(
            frame,
            outer[2],
            self.state.input_mode,
            &self.state.route,
            self.state.delete_pending(),
        );

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tubestats_proto::confirm::DeleteState;
    use tubestats_proto::protocol::{Metric, SortCriterion};
    use tubestats_proto::view::{Failure, LoadState};

    #[derive(Default)]
    struct StubApi {
        channels: Mutex<Vec<ChannelSummary>>,
        deletes: AtomicUsize,
        creates: AtomicUsize,
        fail_delete: Mutex<Option<ApiError>>,
    }

    fn channel(id: &str, subs: u64) -> ChannelSummary {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        ChannelSummary {
            channel_id: id.into(),
            title: id.into(),
            description: String::new(),
            subscriber_count: subs,
            view_count: subs,
            video_count: subs,
            published_at: t,
            last_updated: t,
        }
    }

    #[async_trait]
    impl ChannelApi for StubApi {
        async fn list_channels(&self, _sort_by: SortCriterion) -> Result<Vec<ChannelSummary>, ApiError> {
            Ok(self.channels.lock().unwrap().clone())
        }

        async fn create_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let created = channel(channel_id, 0);
            self.channels.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn get_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
            self.channels
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.channel_id == channel_id)
                .cloned()
                .ok_or(ApiError::NotFound { detail: None })
        }

        async fn channel_history(&self, _channel_id: &str) -> Result<Vec<MetricSnapshot>, ApiError> {
            Ok(Vec::new())
        }

        async fn delete_channel(&self, channel_id: &str) -> Result<(), ApiError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_delete.lock().unwrap().clone() {
                return Err(err);
            }
            self.channels.lock().unwrap().retain(|c| c.channel_id != channel_id);
            Ok(())
        }
    }

    fn app_with(api: Arc<StubApi>) -> App {
        let ui = UiConfig {
            default_sort: Metric::SubscriberCount,
            default_metric: Metric::SubscriberCount,
        };
        App::new(api, "http://localhost:8000/".into(), ui)
    }

    /// Feed every message that arrives within a short quiet window.
    async fn settle(app: &mut App) {
        let mut rx = app.rx.take().unwrap();
        while let Ok(Some(msg)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            app.handle_message(msg);
        }
        app.rx = Some(rx);
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_message(AppMessage::Event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))));
    }

    #[tokio::test]
    async fn test_delete_needs_two_presses_then_returns_to_dashboard() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        let mut app = app_with(api.clone());

        app.dispatch(Action::Navigate(Route::Channel("UCa".into())));
        settle(&mut app).await;
        assert!(app.state.detail.as_ref().unwrap().state().loaded().is_some());

        key(&mut app, KeyCode::Char('d'));
        settle(&mut app).await;
        assert_eq!(api.deletes.load(Ordering::SeqCst), 0);
        assert!(app.state.delete_pending());

        key(&mut app, KeyCode::Char('d'));
        settle(&mut app).await;
        assert_eq!(api.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(app.state.route, Route::Dashboard);
        assert!(app.state.collection.channels().is_empty());
    }

    #[tokio::test]
    async fn test_stale_detail_results_are_dropped() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        api.channels.lock().unwrap().push(channel("UCb", 7));
        let mut app = app_with(api);

        app.dispatch(Action::Navigate(Route::Channel("UCa".into())));
        let old = app.token;
        app.dispatch(Action::Navigate(Route::Channel("UCb".into())));

        // A late answer for the first view must not land in the second.
        app.handle_message(AppMessage::ChannelLoaded(old, Ok(channel("UCa", 5))));
        assert!(app.state.detail.as_ref().unwrap().channel().is_loading());

        settle(&mut app).await;
        let detail = app.state.detail.as_ref().unwrap();
        assert_eq!(detail.channel_id(), "UCb");
        assert_eq!(detail.guard().state(), DeleteState::Idle);
        assert!(matches!(detail.channel(), LoadState::Loaded(c) if c.channel_id == "UCb"));
    }

    #[tokio::test]
    async fn test_blank_add_fails_without_request() {
        let api = Arc::new(StubApi::default());
        let mut app = app_with(api.clone());
        app.dispatch(Action::Navigate(Route::AddChannel));
        assert_eq!(app.state.input_mode, InputMode::Insert);

        key(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        assert_eq!(api.creates.load(Ordering::SeqCst), 0);
        assert_eq!(app.state.add_status.error(), Some(collection::EMPTY_ID));
    }

    #[tokio::test]
    async fn test_added_channel_opens_its_detail() {
        let api = Arc::new(StubApi::default());
        let mut app = app_with(api.clone());
        app.dispatch(Action::Navigate(Route::AddChannel));

        app.dispatch(Action::SubmitAdd("  UCnew ".into()));
        assert!(app.state.add_status.is_submitting());
        settle(&mut app).await;

        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(app.state.route, Route::Channel("UCnew".into()));
        assert_eq!(app.state.add_status, SubmitStatus::Idle);
    }

    #[tokio::test]
    async fn test_q_quits_only_outside_text_entry() {
        let mut app = app_with(Arc::new(StubApi::default()));
        app.dispatch(Action::Navigate(Route::AddChannel));
        key(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        app.dispatch(Action::Navigate(Route::Dashboard));
        key(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    async fn open_and_confirm_delete(app: &mut App, id: &str) {
        app.dispatch(Action::Navigate(Route::Channel(id.into())));
        settle(app).await;
        key(app, KeyCode::Char('d'));
        key(app, KeyCode::Char('d'));
        settle(app).await;
    }

    #[tokio::test]
    async fn test_rejected_delete_shows_api_reason() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        *api.fail_delete.lock().unwrap() = Some(ApiError::Rejected {
            status: 409,
            detail: Some("Channel is locked by an active job".into()),
        });
        let mut app = app_with(api.clone());

        open_and_confirm_delete(&mut app, "UCa").await;

        assert_eq!(api.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(app.toast.messages(), vec!["Channel is locked by an active job"]);
        let detail = app.state.detail.as_ref().unwrap();
        assert_eq!(detail.guard().state(), DeleteState::Idle);
        assert!(detail.state().loaded().is_some());
    }

    #[tokio::test]
    async fn test_rejected_delete_without_reason_uses_fallback() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        *api.fail_delete.lock().unwrap() = Some(ApiError::Transport("connection reset".into()));
        let mut app = app_with(api);

        open_and_confirm_delete(&mut app, "UCa").await;

        assert_eq!(app.toast.messages(), vec![DELETE_FAILED]);
    }

    #[tokio::test]
    async fn test_delete_of_missing_channel_shows_not_found() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        *api.fail_delete.lock().unwrap() = Some(ApiError::NotFound { detail: None });
        let mut app = app_with(api);

        open_and_confirm_delete(&mut app, "UCa").await;

        assert_eq!(app.toast.messages(), vec![NOT_FOUND_TEXT]);
        let detail = app.state.detail.as_ref().unwrap();
        assert_eq!(detail.state().failure(), Some(&Failure::NotFound));
        assert_eq!(detail.guard().state(), DeleteState::Idle);
    }

    #[tokio::test]
    async fn test_dashboard_keys_ignore_channels_from_previous_listing() {
        let api = Arc::new(StubApi::default());
        api.channels.lock().unwrap().push(channel("UCa", 5));
        let mut app = app_with(api);

        app.dispatch(Action::Navigate(Route::Dashboard));
        settle(&mut app).await;
        assert_eq!(app.channel_list.list.items.len(), 1);

        // reload in flight: nothing is drawn, so nothing may be opened
        app.dispatch(Action::Refresh);
        assert!(app.state.collection.state().is_loading());
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.state.route, Route::Dashboard);
    }
}
