use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked channel as the stats API reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSummary {
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(with = "api_time")]
    pub published_at: DateTime<Utc>,
    #[serde(with = "api_time")]
    pub last_updated: DateTime<Utc>,
}

/// One recorded measurement of a channel's metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    #[serde(with = "api_time")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub video_count: u64,
}

/// The three channel statistics. Used both as the listing sort criterion and
/// as the chart metric selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    SubscriberCount,
    ViewCount,
    VideoCount,
}

/// Listing order; always descending by the chosen metric.
pub type SortCriterion = Metric;

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::SubscriberCount, Metric::ViewCount, Metric::VideoCount];

    /// Name used in the `sort_by` query parameter.
    pub fn query_name(self) -> &'static str {
        match self {
            Self::SubscriberCount => "subscriber_count",
            Self::ViewCount => "view_count",
            Self::VideoCount => "video_count",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SubscriberCount => "Subscribers",
            Self::ViewCount => "Views",
            Self::VideoCount => "Videos",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::SubscriberCount => Self::ViewCount,
            Self::ViewCount => Self::VideoCount,
            Self::VideoCount => Self::SubscriberCount,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::SubscriberCount => Self::VideoCount,
            Self::ViewCount => Self::SubscriberCount,
            Self::VideoCount => Self::ViewCount,
        }
    }

    pub fn of_snapshot(self, snapshot: &MetricSnapshot) -> u64 {
        match self {
            Self::SubscriberCount => snapshot.subscriber_count,
            Self::ViewCount => snapshot.view_count,
            Self::VideoCount => snapshot.video_count,
        }
    }

    pub fn of_channel(self, channel: &ChannelSummary) -> u64 {
        match self {
            Self::SubscriberCount => channel.subscriber_count,
            Self::ViewCount => channel.view_count,
            Self::VideoCount => channel.video_count,
        }
    }
}

/// Body of `POST /channels/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub channel_id: String,
}

/// Error body returned by the API on rejection: `{"detail": ...}`.
///
/// `detail` is usually a string; request-validation failures send a list of
/// objects instead, which carries no user-facing reason.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn reason(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Timestamps arrive either as RFC 3339 or as naive ISO-8601 (no offset).
/// Naive values are taken as UTC.
pub mod api_time {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
