//! State of the channel detail view: the channel record, its history, the
//! chart metric and the delete guard, all scoped to one viewed channel.

use tracing::{debug, warn};

use crate::api::ChannelApi;
use crate::confirm::DeleteGuard;
use crate::error::ApiError;
use crate::history::{History, Series};
use crate::protocol::{ChannelSummary, Metric, MetricSnapshot};
use crate::view::{Failure, LoadState, ViewToken};

pub const DETAIL_FAILED: &str = "Failed to load channel details. Please try again later.";

pub struct DetailView {
    token: ViewToken,
    channel_id: String,
    channel: LoadState<ChannelSummary>,
    history: LoadState<History>,
    metric: Metric,
    guard: DeleteGuard,
}

impl DetailView {
    pub fn new(channel_id: impl Into<String>, metric: Metric, token: ViewToken) -> Self {
        let channel_id = channel_id.into();
        Self {
            token,
            guard: DeleteGuard::new(channel_id.clone()),
            channel_id,
            channel: LoadState::Loading,
            history: LoadState::Loading,
            metric,
        }
    }

    /// Point the view at another channel. Nothing of the previous channel
    /// survives: both loads restart, the delete guard returns to Idle and the
    /// metric goes back to `metric`.
    pub fn switch_to(&mut self, channel_id: impl Into<String>, metric: Metric, token: ViewToken) {
        let channel_id = channel_id.into();
        debug!("detail view {} -> {}", self.channel_id, channel_id);
        self.guard.channel_changed(channel_id.clone());
        self.channel_id = channel_id;
        self.token = token;
        self.channel = LoadState::Loading;
        self.history = LoadState::Loading;
        self.metric = metric;
    }

    pub fn token(&self) -> ViewToken {
        self.token
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn channel(&self) -> &LoadState<ChannelSummary> {
        &self.channel
    }

    pub fn history(&self) -> &LoadState<History> {
        &self.history
    }

    /// Loading while either fetch is outstanding, Failed if either failed,
    /// Loaded once both arrived. A missing channel wins over other failures.
    pub fn state(&self) -> LoadState<(&ChannelSummary, &History)> {
        self.channel.as_ref().join(self.history.as_ref())
    }

    pub fn apply_channel(&mut self, token: ViewToken, result: Result<ChannelSummary, ApiError>) -> bool {
        if token != self.token {
            debug!("dropping stale channel detail");
            return false;
        }
        self.channel = match result {
            Ok(channel) => LoadState::Loaded(channel),
            Err(e) => LoadState::Failed(failure(&self.channel_id, "channel", &e)),
        };
        true
    }

    pub fn apply_history(&mut self, token: ViewToken, result: Result<Vec<MetricSnapshot>, ApiError>) -> bool {
        if token != self.token {
            debug!("dropping stale channel history");
            return false;
        }
        self.history = match result {
            Ok(snapshots) => LoadState::Loaded(History::from_snapshots(snapshots)),
            Err(e) => LoadState::Failed(failure(&self.channel_id, "history", &e)),
        };
        true
    }

    /// Fetch both halves concurrently and apply them.
    pub async fn load(&mut self, api: &dyn ChannelApi) {
        let token = self.token;
        let (channel, history) = tokio::join!(
            api.get_channel(&self.channel_id),
            api.channel_history(&self.channel_id)
        );
        self.apply_channel(token, channel);
        self.apply_history(token, history);
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The channel is gone from the API; show it as not found.
    pub fn mark_missing(&mut self) {
        self.channel = LoadState::Failed(Failure::NotFound);
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    /// Chart data for the selected metric, once the history is in.
    pub fn series(&self) -> Option<Series> {
        self.history.loaded().map(|h| h.series(self.metric))
    }

    pub fn guard(&self) -> &DeleteGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut DeleteGuard {
        &mut self.guard
    }
}

fn failure(channel_id: &str, what: &str, err: &ApiError) -> Failure {
    warn!("loading {} of {} failed: {}", what, channel_id, err);
    if err.is_not_found() {
        Failure::NotFound
    } else {
        Failure::Message(DETAIL_FAILED.to_string())
    }
}
