#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tubestats_proto::api::ChannelApi;
use tubestats_proto::error::ApiError;
use tubestats_proto::protocol::{ChannelSummary, MetricSnapshot, SortCriterion};

/// In-memory stand-in for the stats API. Counts every call so tests can
/// assert which requests were (not) made.
#[derive(Default)]
pub struct FakeApi {
    channels: Mutex<Vec<ChannelSummary>>,
    history: Mutex<HashMap<String, Vec<MetricSnapshot>>>,
    pub fail_list: Mutex<Option<ApiError>>,
    pub fail_delete: Mutex<Option<ApiError>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

pub fn channel(id: &str, subs: u64, views: u64, videos: u64) -> ChannelSummary {
    let t = Utc.with_ymd_and_hms(2015, 6, 1, 0, 0, 0).unwrap();
    ChannelSummary {
        channel_id: id.to_string(),
        title: format!("Channel {id}"),
        description: String::new(),
        subscriber_count: subs,
        view_count: views,
        video_count: videos,
        published_at: t,
        last_updated: t,
    }
}

pub fn snapshot(day: u32, subs: u64) -> MetricSnapshot {
    MetricSnapshot {
        timestamp: Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap(),
        subscriber_count: subs,
        view_count: subs * 100,
        video_count: 1,
    }
}

impl FakeApi {
    pub fn with_channels(channels: Vec<ChannelSummary>) -> Self {
        let api = Self::default();
        *api.channels.lock().unwrap() = channels;
        api
    }

    pub fn set_history(&self, channel_id: &str, snapshots: Vec<MetricSnapshot>) {
        self.history
            .lock()
            .unwrap()
            .insert(channel_id.to_string(), snapshots);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn find(&self, channel_id: &str) -> Option<ChannelSummary> {
        self.channels
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.channel_id == channel_id)
            .cloned()
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound {
        detail: Some("Channel not found".to_string()),
    }
}

#[async_trait]
impl ChannelApi for FakeApi {
    async fn list_channels(&self, sort_by: SortCriterion) -> Result<Vec<ChannelSummary>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_list.lock().unwrap().clone() {
            return Err(err);
        }
        let mut channels = self.channels.lock().unwrap().clone();
        channels.sort_by_key(|c| std::cmp::Reverse(sort_by.of_channel(c)));
        Ok(channels)
    }

    async fn create_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.find(channel_id).is_some() {
            return Err(ApiError::Rejected {
                status: 400,
                detail: Some("Channel already tracked".to_string()),
            });
        }
        let created = channel(channel_id, 0, 0, 0);
        self.channels.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.find(channel_id).ok_or_else(not_found)
    }

    async fn channel_history(&self, channel_id: &str) -> Result<Vec<MetricSnapshot>, ApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.find(channel_id).is_none() {
            return Err(not_found());
        }
        Ok(self
            .history
            .lock()
            .unwrap()
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_delete.lock().unwrap().clone() {
            return Err(err);
        }
        let mut channels = self.channels.lock().unwrap();
        let before = channels.len();
        channels.retain(|c| c.channel_id != channel_id);
        if channels.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
