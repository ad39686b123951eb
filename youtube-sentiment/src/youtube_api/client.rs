//! The API capability and its HTTP implementation.

use crate::config::{ApiKey, FetchConfig};
use eyre::Context;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use tracing::instrument;

/// The list endpoints this crate reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Channels,
    CommentThreads,
    PlaylistItems,
    Videos,
}

impl Resource {
    /// Path segment of the endpoint, relative to the API root.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Channels => "channels",
            Resource::CommentThreads => "commentThreads",
            Resource::PlaylistItems => "playlistItems",
            Resource::Videos => "videos",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One `list` call: which resource, which parts, which filters, and which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub resource: Resource,
    /// Comma-separated resource parts to include, e.g. `"snippet,replies"`.
    pub part: &'static str,
    pub filters: Vec<(&'static str, String)>,
    pub max_results: Option<u32>,
    pub page_token: Option<String>,
}

impl ListRequest {
    pub fn new(resource: Resource, part: &'static str) -> Self {
        Self {
            resource,
            part,
            filters: Vec::new(),
            max_results: None,
            page_token: None,
        }
    }

    pub fn filter(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.filters.push((name, value.into()));
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    /// Query parameters for this request, not including credentials.
    pub fn query_params(&self) -> Vec<(&str, String)> {
        let mut params = vec![("part", self.part.to_string())];
        params.extend(self.filters.iter().map(|(k, v)| (*k, v.clone())));
        if let Some(max_results) = self.max_results {
            params.push(("maxResults", max_results.to_string()));
        }
        if let Some(ref token) = self.page_token {
            params.push(("pageToken", token.clone()));
        }
        params
    }
}

/// Access to the YouTube Data API `list` endpoints.
///
/// This is the only way the rest of the crate talks to YouTube, so tests can substitute a
/// scripted implementation. Implementations are called strictly one request at a time.
pub trait YouTubeApi: Sync {
    /// Executes one `list` request and returns the raw JSON response.
    fn list(&self, request: &ListRequest) -> impl Future<Output = eyre::Result<Value>> + Send;

    /// The request for the page after `response`, or `None` if `response` was the last page.
    fn list_next(&self, previous: &ListRequest, response: &Value) -> Option<ListRequest> {
        let token = response.get("nextPageToken")?.as_str()?;
        if token.is_empty() {
            return None;
        }
        Some(previous.clone().page_token(token))
    }
}

/// Client for the YouTube Data API v3, authenticated with a developer API key.
///
/// Only public data is read, so no OAuth token is involved. The key is attached to every
/// request as the `key` query parameter and is otherwise left alone.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    api_key: ApiKey,
    /// API root, e.g. `https://www.googleapis.com/youtube/v3`
    base_url: String,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(api_key: ApiKey, base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            reqwest::Client::new(),
        )
    }

    /// Makes a GET request to the API with common error handling.
    ///
    /// Adds the API key to the query and turns non-success status codes into errors that
    /// carry the response body, which is where YouTube explains quota and key problems.
    /// The request URL contains the key, so it is stripped from every error and never
    /// logged.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn make_request(
        &self,
        resource: Resource,
        query_params: &[(&str, String)],
    ) -> eyre::Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, resource.path());

        let response = self
            .client
            .get(&url)
            .query(query_params)
            .query(&[("key", self.api_key.expose())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send GET request to YouTube API: {}", url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                resource,
                status_code,
                error_text
            ));
        }

        Ok(response)
    }
}

impl YouTubeApi for YouTubeClient {
    async fn list(&self, request: &ListRequest) -> eyre::Result<Value> {
        let response = self
            .make_request(request.resource, &request.query_params())
            .await?;

        response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("parse YouTube {} API response as JSON", request.resource))
    }
}
