//! Stats API client.
//!
//! `ChannelApi` is the contract the rest of the crate programs against;
//! `HttpApi` speaks it over HTTP/JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::protocol::{ChannelSummary, CreateChannelRequest, ErrorBody, MetricSnapshot, SortCriterion};

#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Tracked channels, descending by `sort_by`.
    async fn list_channels(&self, sort_by: SortCriterion) -> Result<Vec<ChannelSummary>, ApiError>;

    /// Start tracking `channel_id`. The API rejects unknown and already
    /// tracked IDs with a reason.
    async fn create_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError>;

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError>;

    /// Snapshots in no particular order.
    async fn channel_history(&self, channel_id: &str) -> Result<Vec<MetricSnapshot>, ApiError>;

    async fn delete_channel(&self, channel_id: &str) -> Result<(), ApiError>;
}

pub struct HttpApi {
    client: Client,
    base_url: Url,
    list_limit: u32,
    history_limit: u32,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(config.base_url.trim())?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot have paths appended: {}", base_url);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url,
            list_limit: config.list_limit,
            history_limit: config.history_limit,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/seg/seg...`; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn channel_url(&self, channel_id: &str) -> Url {
        self.endpoint(&["channels", channel_id])
    }
}

#[async_trait]
impl ChannelApi for HttpApi {
    async fn list_channels(&self, sort_by: SortCriterion) -> Result<Vec<ChannelSummary>, ApiError> {
        let mut url = self.endpoint(&["channels", ""]);
        url.query_pairs_mut()
            .append_pair("sort_by", sort_by.query_name())
            .append_pair("skip", "0")
            .append_pair("limit", &self.list_limit.to_string());
        debug!(url = %url, "GET channels");
        let resp = self.client.get(url).send().await.map_err(transport)?;
        read_json(resp).await
    }

    async fn create_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
        let url = self.endpoint(&["channels", ""]);
        debug!(url = %url, channel_id, "POST channel");
        let body = CreateChannelRequest {
            channel_id: channel_id.to_string(),
        };
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelSummary, ApiError> {
        let url = self.channel_url(channel_id);
        debug!(url = %url, "GET channel");
        let resp = self.client.get(url).send().await.map_err(transport)?;
        read_json(resp).await
    }

    async fn channel_history(&self, channel_id: &str) -> Result<Vec<MetricSnapshot>, ApiError> {
        let mut url = self.endpoint(&["channels", channel_id, "history"]);
        url.query_pairs_mut()
            .append_pair("limit", &self.history_limit.to_string());
        debug!(url = %url, "GET history");
        let resp = self.client.get(url).send().await.map_err(transport)?;
        read_json(resp).await
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<(), ApiError> {
        let url = self.channel_url(channel_id);
        debug!(url = %url, "DELETE channel");
        let resp = self.client.delete(url).send().await.map_err(transport)?;
        if resp.status().is_success() {
            return Ok(());
        }
        Err(rejection(resp).await)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    warn!("stats API request failed: {}", err);
    ApiError::from(err)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.status().is_success() {
        return Err(rejection(resp).await);
    }
    resp.json::<T>().await.map_err(|e| {
        warn!("stats API returned an undecodable body: {}", e);
        ApiError::Decode(e.to_string())
    })
}

async fn rejection(resp: Response) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let err = error_from_body(status, &body);
    warn!("stats API answered {}: {}", status, err);
    err
}

fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.reason());
    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound { detail }
    } else {
        ApiError::Rejected {
            status: status.as_u16(),
            detail,
        }
    }
}
