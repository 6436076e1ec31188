//! Two-step delete guard for the viewed channel.

use tracing::{debug, warn};

use crate::api::ChannelApi;
use crate::error::ApiError;

pub const DELETE_FAILED: &str = "Failed to delete channel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    PendingConfirm,
    /// The delete request is in flight.
    Deleting,
    /// Terminal; the caller must leave the view.
    Deleted,
}

/// What the caller should do after `request_delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStep {
    /// First request; ask the user to confirm.
    Armed,
    /// Confirmed. Delete this channel and report back through `finish`.
    Execute(String),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct DeleteGuard {
    channel_id: String,
    state: DeleteState,
}

impl DeleteGuard {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            state: DeleteState::Idle,
        }
    }

    pub fn state(&self) -> DeleteState {
        self.state
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn is_pending(&self) -> bool {
        self.state == DeleteState::PendingConfirm
    }

    pub fn request_delete(&mut self) -> DeleteStep {
        match self.state {
            DeleteState::Idle => {
                self.state = DeleteState::PendingConfirm;
                debug!("delete armed for {}", self.channel_id);
                DeleteStep::Armed
            }
            DeleteState::PendingConfirm => {
                self.state = DeleteState::Deleting;
                debug!("delete confirmed for {}", self.channel_id);
                DeleteStep::Execute(self.channel_id.clone())
            }
            DeleteState::Deleting | DeleteState::Deleted => DeleteStep::Ignored,
        }
    }

    /// Back out of a pending confirmation. Returns whether anything changed.
    pub fn cancel(&mut self) -> bool {
        if self.state == DeleteState::PendingConfirm {
            self.state = DeleteState::Idle;
            return true;
        }
        false
    }

    /// The view now shows `channel_id`; always lands in Idle.
    pub fn channel_changed(&mut self, channel_id: impl Into<String>) {
        self.channel_id = channel_id.into();
        self.state = DeleteState::Idle;
    }

    /// Report the outcome of an executed delete.
    pub fn finish(&mut self, result: &Result<(), ApiError>) {
        if self.state != DeleteState::Deleting {
            return;
        }
        self.state = match result {
            Ok(()) => DeleteState::Deleted,
            Err(e) => {
                warn!("delete of {} failed: {}", self.channel_id, e);
                DeleteState::Idle
            }
        };
    }

    /// `request_delete` that also performs the delete when confirmed.
    pub async fn request_delete_with(&mut self, api: &dyn ChannelApi) -> Result<DeleteStep, ApiError> {
        let step = self.request_delete();
        if let DeleteStep::Execute(id) = &step {
            let result = api.delete_channel(id).await;
            self.finish(&result);
            result?;
        }
        Ok(step)
    }
}
