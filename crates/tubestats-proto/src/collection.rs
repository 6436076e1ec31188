//! The tracked-channel listing and the add/delete workflows that feed it.
//!
//! Ordering belongs to the API: the manager only remembers which criterion is
//! selected and what the last fetch for it returned.

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ChannelApi;
use crate::error::ApiError;
use crate::protocol::{ChannelSummary, SortCriterion};
use crate::view::{Failure, LoadState};

pub const LIST_FAILED: &str = "Failed to load YouTube channels. Please try again later.";
pub const EMPTY_ID: &str = "Please enter a valid YouTube channel ID";
pub const ADD_FAILED: &str = "Failed to add channel. Please check the channel ID and try again.";

/// Issued when a listing fetch starts; the result must be handed back with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub criterion: SortCriterion,
}

pub struct ChannelCollection {
    criterion: SortCriterion,
    state: LoadState<Vec<ChannelSummary>>,
    generation: u64,
}

impl ChannelCollection {
    pub fn new(criterion: SortCriterion) -> Self {
        Self {
            criterion,
            state: LoadState::Loading,
            generation: 0,
        }
    }

    pub fn criterion(&self) -> SortCriterion {
        self.criterion
    }

    pub fn state(&self) -> &LoadState<Vec<ChannelSummary>> {
        &self.state
    }

    pub fn channels(&self) -> &[ChannelSummary] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// Enter Loading and hand out the ticket for the new fetch. Any fetch
    /// still in flight becomes stale.
    pub fn begin_load(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
            criterion: self.criterion,
        }
    }

    /// Select a criterion; returns a ticket when that requires a new fetch.
    pub fn set_criterion(&mut self, criterion: SortCriterion) -> Option<FetchTicket> {
        if criterion == self.criterion {
            return None;
        }
        debug!("sort criterion {:?} -> {:?}", self.criterion, criterion);
        self.criterion = criterion;
        Some(self.begin_load())
    }

    /// Store a fetch result. Returns false (and changes nothing) when the
    /// ticket is not the latest one issued.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<ChannelSummary>, ApiError>) -> bool {
        if ticket.generation != self.generation {
            debug!("dropping stale channel listing (generation {})", ticket.generation);
            return false;
        }
        self.state = match result {
            Ok(channels) => LoadState::Loaded(channels),
            Err(e) => {
                warn!("channel listing failed: {}", e);
                LoadState::Failed(Failure::Message(LIST_FAILED.to_string()))
            }
        };
        true
    }

    /// Fetch for the current criterion and store the result.
    pub async fn refresh(&mut self, api: &dyn ChannelApi) {
        let ticket = self.begin_load();
        let result = api.list_channels(ticket.criterion).await;
        self.apply(ticket, result);
    }

    /// Delete through the API; on success the channel also leaves the held
    /// listing right away.
    pub async fn delete(&mut self, api: &dyn ChannelApi, channel_id: &str) -> Result<(), ApiError> {
        api.delete_channel(channel_id).await?;
        self.forget(channel_id);
        Ok(())
    }

    /// Drop a channel from the held listing without a refetch.
    pub fn forget(&mut self, channel_id: &str) {
        if let LoadState::Loaded(channels) = &mut self.state {
            channels.retain(|c| c.channel_id != channel_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddChannelError {
    #[error("channel ID is empty")]
    EmptyId,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AddChannelError {
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyId => EMPTY_ID.to_string(),
            Self::Api(e) => e.user_message(ADD_FAILED),
        }
    }
}

/// Trimmed ID ready to submit, or `EmptyId`.
pub fn normalize_channel_id(raw: &str) -> Result<String, AddChannelError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AddChannelError::EmptyId);
    }
    Ok(id.to_string())
}

/// Start tracking a channel. Blank input never reaches the API.
pub async fn add_channel(api: &dyn ChannelApi, raw_id: &str) -> Result<ChannelSummary, AddChannelError> {
    let id = normalize_channel_id(raw_id)?;
    match api.create_channel(&id).await {
        Ok(channel) => Ok(channel),
        Err(e) => {
            warn!("adding channel {} failed: {}", id, e);
            Err(AddChannelError::Api(e))
        }
    }
}
