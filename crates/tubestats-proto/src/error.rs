use thiserror::Error;

/// Failure of one request against the stats API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 404: the channel is not (or no longer) tracked.
    #[error("not found{}", reason_suffix(.detail))]
    NotFound { detail: Option<String> },
    /// Any other non-2xx answer.
    #[error("rejected with HTTP {status}{}", reason_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
    /// Connection refused, DNS failure, timeout...
    #[error("request failed: {0}")]
    Transport(String),
    /// 2xx answer whose body did not decode.
    #[error("unexpected response: {0}")]
    Decode(String),
}

fn reason_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ApiError {
    /// The reason the API gave, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotFound { detail } | Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Text for the user: the API's own reason verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
