//! Channel ID extraction from pasted YouTube URLs.
//!
//! Matchers run in a fixed order and the first one that decides wins. Only
//! `/channel/<ID>` paths and a `channel=` query parameter carry an ID; vanity
//! (`/c/...`) and legacy (`/user/...`) paths cannot be mapped without a
//! lookup, so they stop evaluation.

use tracing::debug;
use url::Url;

/// What resolving a URL produced. "Unresolvable" is an ordinary outcome:
/// the caller falls back to manual ID entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Channel(String),
    Unresolvable,
}

impl Resolution {
    pub fn into_channel_id(self) -> Option<String> {
        match self {
            Self::Channel(id) => Some(id),
            Self::Unresolvable => None,
        }
    }
}

/// Verdict of a single matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(String),
    /// The URL is recognised but can never yield an ID; stop here.
    Rejected,
    NotApplicable,
}

type Matcher = fn(&Url) -> MatchOutcome;

/// Evaluated top to bottom.
const MATCHERS: &[(&str, Matcher)] = &[
    ("channel-path", match_channel_path),
    ("vanity-path", match_vanity_path),
    ("channel-query", match_channel_query),
];

const CHANNEL_PREFIX: &str = "/channel/";
const VANITY_PREFIXES: &[&str] = &["/c/", "/user/"];

pub fn resolve_channel_id(input: &str) -> Resolution {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(e) => {
            debug!("resolve: not a URL ({}): {:?}", e, input);
            return Resolution::Unresolvable;
        }
    };

    for (name, matcher) in MATCHERS {
        match matcher(&url) {
            MatchOutcome::Matched(id) => {
                debug!("resolve: {} matched {:?}", name, id);
                return Resolution::Channel(id);
            }
            MatchOutcome::Rejected => {
                debug!("resolve: {} rejected {}", name, url);
                return Resolution::Unresolvable;
            }
            MatchOutcome::NotApplicable => {}
        }
    }
    Resolution::Unresolvable
}

fn match_channel_path(url: &Url) -> MatchOutcome {
    let Some(rest) = url.path().strip_prefix(CHANNEL_PREFIX) else {
        return MatchOutcome::NotApplicable;
    };
    let id = rest.split('/').next().unwrap_or_default();
    if id.is_empty() {
        MatchOutcome::Rejected
    } else {
        MatchOutcome::Matched(id.to_string())
    }
}

fn match_vanity_path(url: &Url) -> MatchOutcome {
    if VANITY_PREFIXES.iter().any(|p| url.path().starts_with(p)) {
        MatchOutcome::Rejected
    } else {
        MatchOutcome::NotApplicable
    }
}

fn match_channel_query(url: &Url) -> MatchOutcome {
    match url.query_pairs().find(|(key, _)| key == "channel") {
        Some((_, value)) if !value.is_empty() => MatchOutcome::Matched(value.into_owned()),
        Some(_) => MatchOutcome::Rejected,
        None => MatchOutcome::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(input: &str) -> Option<String> {
        resolve_channel_id(input).into_channel_id()
    }

    #[test]
    fn test_channel_path_returns_id_verbatim() {
        for (url, id) in [
            ("https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw", "UC_x5XG1OV2P6uZZ5FSM9Ttw"),
            ("https://youtube.com/channel/UCabc", "UCabc"),
            ("http://m.youtube.com/channel/not-a-real-format", "not-a-real-format"),
            ("https://www.youtube.com/channel/UCabc/videos", "UCabc"),
            ("https://www.youtube.com/channel/UCabc?channel=UCother", "UCabc"),
        ] {
            assert_eq!(resolved(url).as_deref(), Some(id), "{url}");
        }
    }

    #[test]
    fn test_vanity_and_legacy_paths_are_unresolvable() {
        for url in [
            "https://www.youtube.com/c/GoogleDevelopers",
            "https://www.youtube.com/user/GoogleDevelopers",
            "https://www.youtube.com/c/Name?channel=UCsneaky",
            "https://www.youtube.com/user/Name/videos?channel=UCsneaky",
        ] {
            assert_eq!(resolve_channel_id(url), Resolution::Unresolvable, "{url}");
        }
    }

    #[test]
    fn test_channel_query_parameter() {
        assert_eq!(
            resolved("https://www.youtube.com/watch?v=dQw4w9WgXcQ&channel=UCxyz").as_deref(),
            Some("UCxyz")
        );
        assert_eq!(
            resolved("https://www.youtube.com/watch?channel=UC%2Bplus").as_deref(),
            Some("UC+plus")
        );
    }

    #[test]
    fn test_malformed_and_unsupported_inputs() {
        for input in [
            "",
            "   ",
            "not a url",
            "youtube.com/channel/UCabc",
            "://broken",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/@handle",
            "https://www.youtube.com/channel/",
            "https://www.youtube.com/watch?channel=",
        ] {
            assert_eq!(resolve_channel_id(input), Resolution::Unresolvable, "{input:?}");
        }
    }

    #[test]
    fn test_matcher_outcomes() {
        let url = Url::parse("https://www.youtube.com/c/Name").unwrap();
        assert_eq!(match_channel_path(&url), MatchOutcome::NotApplicable);
        assert_eq!(match_vanity_path(&url), MatchOutcome::Rejected);
        assert_eq!(match_channel_query(&url), MatchOutcome::NotApplicable);
    }
}
