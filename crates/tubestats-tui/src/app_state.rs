//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use tubestats_proto::collection::ChannelCollection;
use tubestats_proto::detail::DetailView;

use crate::action::Route;
use crate::widgets::status_bar::InputMode;

/// Progress of the add-channel form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

impl SubmitStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

pub struct AppState {
    pub route: Route,
    /// Base URL of the stats API, shown in the header.
    pub api_url: String,

    // ── Dashboard ───────────────────────────────────────────────────────────
    pub collection: ChannelCollection,

    // ── Channel detail ──────────────────────────────────────────────────────
    /// Present while a channel route is showing.
    pub detail: Option<DetailView>,

    // ── Add channel ─────────────────────────────────────────────────────────
    pub add_status: SubmitStatus,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub show_help: bool,
}

impl AppState {
    pub fn new(collection: ChannelCollection, api_url: String) -> Self {
        Self {
            route: Route::Dashboard,
            api_url,
            collection,
            detail: None,
            add_status: SubmitStatus::Idle,
            input_mode: InputMode::Normal,
            show_help: false,
        }
    }

    /// Whether the delete confirmation prompt is showing.
    pub fn delete_pending(&self) -> bool {
        self.detail
            .as_ref()
            .map(|d| d.guard().is_pending())
            .unwrap_or(false)
    }
}
