//! Settings for a fetch session.

use crate::error::ConfigError;
use eyre::Context;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// The most ids the `commentThreads.list` and `videos.list` endpoints accept in one `id` filter.
pub const MAX_BATCH_SIZE: usize = 50;

const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(MAX_BATCH_SIZE).unwrap();

/// `commentThreads.list` allows up to 100 results per page.
pub const MAX_COMMENT_PAGE_SIZE: u32 = 100;

/// `playlistItems.list` allows up to 50 results per page.
pub const MAX_PLAYLIST_PAGE_SIZE: u32 = 50;

const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
const BASE_URL_VAR: &str = "YOUTUBE_API_BASE_URL";
const DELAY_VAR: &str = "YOUTUBE_API_DELAY_MS";

/// Developer key for the Data API.
///
/// Opaque to us: it is only ever handed to the HTTP client as the `key` query parameter.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// never print the key
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_key: ApiKey,
    /// Root of the Data API, without a trailing slash.
    pub base_url: String,
    /// `maxResults` when walking a video's comment threads.
    pub comment_page_size: u32,
    /// `maxResults` when walking an uploads playlist.
    pub playlist_page_size: u32,
    /// How many ids go into one batched `list` call.
    pub batch_size: NonZeroUsize,
    /// Pause taken by the default rate limiter between calls.
    pub delay: Duration,
}

impl FetchConfig {
    /// A configuration with the default limits and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            comment_page_size: MAX_COMMENT_PAGE_SIZE,
            playlist_page_size: MAX_PLAYLIST_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            delay: Duration::from_secs(1),
        }
    }

    /// Reads `YOUTUBE_API_KEY`, and optionally `YOUTUBE_API_BASE_URL` and
    /// `YOUTUBE_API_DELAY_MS`, from the process environment.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(delay) = lookup(DELAY_VAR) {
            let millis: u64 = delay
                .parse()
                .with_context(|| format!("parse {DELAY_VAR} value '{delay}' as milliseconds"))?;
            config.delay = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the limits against what the API accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        check_range(
            "comment_page_size",
            self.comment_page_size as usize,
            MAX_COMMENT_PAGE_SIZE as usize,
        )?;
        check_range(
            "playlist_page_size",
            self.playlist_page_size as usize,
            MAX_PLAYLIST_PAGE_SIZE as usize,
        )?;
        check_range("batch_size", self.batch_size.get(), MAX_BATCH_SIZE)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::OutOfRange { name, max, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_api_limits() {
        let config = FetchConfig::from_lookup(lookup(&[("YOUTUBE_API_KEY", "k")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.comment_page_size, 100);
        assert_eq!(config.playlist_page_size, 50);
        assert_eq!(config.batch_size.get(), 50);
        assert_eq!(config.delay, Duration::from_secs(1));
    }

    #[test]
    fn overrides_from_environment() {
        let config = FetchConfig::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "k"),
            ("YOUTUBE_API_BASE_URL", "http://127.0.0.1:8080/youtube/v3/"),
            ("YOUTUBE_API_DELAY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/youtube/v3");
        assert_eq!(config.delay, Duration::ZERO);
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = FetchConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingApiKey)
        );

        let err = FetchConfig::from_lookup(lookup(&[("YOUTUBE_API_KEY", "")])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn bad_delay_is_rejected() {
        let result = FetchConfig::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "k"),
            ("YOUTUBE_API_DELAY_MS", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn limits_above_api_ceiling_are_rejected() {
        let mut config = FetchConfig::new("k");
        config.batch_size = NonZeroUsize::new(51).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "batch_size",
                max: 50,
                value: 51
            })
        );

        let mut config = FetchConfig::new("k");
        config.playlist_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_hides_key() {
        let config = FetchConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
