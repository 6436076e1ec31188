//! Action enum: user intents produced by components and dispatched by the App.

use tubestats_proto::protocol::Metric;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    ChannelList,
    ChannelDetail,
    AddChannel,
    HelpOverlay,
}

/// Which screen is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Channel(String),
    AddChannel,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Channel(_) => "Channel",
            Self::AddChannel => "Add Channel",
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    Navigate(Route),
    Back,

    // ── Dashboard ────────────────────────────────────────────────────────────
    SetSort(Metric),
    Refresh,

    // ── Channel detail ───────────────────────────────────────────────────────
    SetMetric(Metric),
    RequestDelete,
    CancelDelete,

    // ── Add channel ──────────────────────────────────────────────────────────
    SubmitAdd(String),
    /// The ID field was edited; stale validation errors go away.
    AddFormEdited,

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
