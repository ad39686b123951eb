//! Fetch sessions: listings, batching and table assembly put together.

use crate::batch::{batches, join_ids};
use crate::config::{FetchConfig, MAX_BATCH_SIZE};
use crate::error::ConfigError;
use crate::table::{Record, Table};
use crate::throttle::{FixedDelay, RateLimiter};
use crate::youtube_api::client::{ListRequest, Resource, YouTubeApi, YouTubeClient};
use crate::youtube_api::comments::{CommentRecord, comment_thread_id};
use crate::youtube_api::playlist_items::playlist_video_id;
use crate::youtube_api::types::{Paginated, paginate, take_items};
use crate::youtube_api::videos::VideoRecord;
use crate::youtube_api::{ResolvedChannel, resolve_handle};
use eyre::Context;
use serde::Serialize;
use std::future::Future;
use tracing::instrument;

/// A table produced by one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetched {
    pub table: Table,
    /// `false` if the id listing feeding the table was cut short, in which case rows are
    /// missing even though nothing failed outright.
    pub complete: bool,
}

/// Everything a fetch needs: API access, pacing, and limits.
///
/// Calls are made one at a time, in order. Nothing is cached; a [`ResolvedChannel`] is
/// produced by [`Fetcher::resolve_channel`] and passed back in by the caller.
#[derive(Debug)]
pub struct Fetcher<A, L = FixedDelay> {
    api: A,
    limiter: L,
    config: FetchConfig,
}

impl Fetcher<YouTubeClient, FixedDelay> {
    /// A fetcher talking to the real API with the configured key and delay.
    pub fn from_config(config: FetchConfig) -> eyre::Result<Self> {
        config.validate().context("validate fetch configuration")?;
        Ok(Self::new(
            YouTubeClient::from_config(&config),
            FixedDelay::new(config.delay),
            config,
        ))
    }
}

impl<A: YouTubeApi, L: RateLimiter> Fetcher<A, L> {
    pub fn new(api: A, limiter: L, config: FetchConfig) -> Self {
        Self {
            api,
            limiter,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Lists the ids of every comment thread on a video.
    #[instrument(skip(self))]
    pub async fn comment_thread_ids(&self, video_id: &str) -> Paginated<String> {
        let request = ListRequest::new(Resource::CommentThreads, "id")
            .filter("videoId", video_id)
            .max_results(self.config.comment_page_size);
        let ids = Paginated::collect(paginate(&self.api, request), comment_thread_id).await;
        self.limiter.wait_before_next_call().await;

        tracing::debug!(
            thread_count = ids.items.len(),
            complete = ids.complete,
            "listed comment threads"
        );
        ids
    }

    /// Fetches every comment thread on a video as a comments table.
    ///
    /// Thread ids are listed first, then fetched in batches with their replies.
    #[instrument(skip(self))]
    pub async fn fetch_comments(&self, video_id: &str) -> eyre::Result<Fetched> {
        let ids = self.comment_thread_ids(video_id).await;
        let table = self
            .fetch_in_batches::<CommentRecord, _, _>(&ids.items, |batch| {
                self.fetch_comment_batch(batch)
            })
            .await
            .with_context(|| format!("fetch comments for video {video_id}"))?;

        tracing::info!(rows = table.len(), complete = ids.complete, "fetched comments");
        Ok(Fetched {
            table,
            complete: ids.complete,
        })
    }

    /// Fetches one batch of comment threads, with replies, as a comments table.
    pub async fn fetch_comment_batch(&self, thread_ids: &[String]) -> eyre::Result<Table> {
        let request = ListRequest::new(Resource::CommentThreads, "snippet,replies")
            .filter("id", join_ids(thread_ids))
            .max_results(self.batch_max_results()?);
        let items = self.list_items(&request).await?;

        let records = items
            .into_iter()
            .map(CommentRecord::from_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table::from_records(records))
    }

    /// Looks up the ids behind a channel handle.
    #[instrument(skip(self))]
    pub async fn resolve_channel(&self, handle: &str) -> eyre::Result<ResolvedChannel> {
        let channel = resolve_handle(&self.api, handle).await?;
        self.limiter.wait_before_next_call().await;
        Ok(channel)
    }

    /// Lists the ids of every video in the channel's uploads playlist.
    #[instrument(skip(self), fields(playlist_id = %channel.uploads_playlist_id))]
    pub async fn uploaded_video_ids(&self, channel: &ResolvedChannel) -> Paginated<String> {
        let request = ListRequest::new(Resource::PlaylistItems, "snippet")
            .filter("playlistId", channel.uploads_playlist_id.as_str())
            .max_results(self.config.playlist_page_size);
        let ids = Paginated::collect(paginate(&self.api, request), playlist_video_id).await;
        self.limiter.wait_before_next_call().await;

        tracing::debug!(
            video_count = ids.items.len(),
            complete = ids.complete,
            "listed uploaded videos"
        );
        ids
    }

    /// Fetches statistics for every upload on the channel as a videos table.
    #[instrument(skip(self), fields(handle = %channel.handle))]
    pub async fn fetch_videos(&self, channel: &ResolvedChannel) -> eyre::Result<Fetched> {
        let ids = self.uploaded_video_ids(channel).await;
        let table = self
            .fetch_in_batches::<VideoRecord, _, _>(&ids.items, |batch| {
                self.fetch_video_batch(batch)
            })
            .await
            .with_context(|| format!("fetch videos for channel {}", channel.handle))?;

        tracing::info!(rows = table.len(), complete = ids.complete, "fetched videos");
        Ok(Fetched {
            table,
            complete: ids.complete,
        })
    }

    /// Fetches one batch of videos as a videos table. Items that aren't videos are dropped.
    pub async fn fetch_video_batch(&self, video_ids: &[String]) -> eyre::Result<Table> {
        let request = ListRequest::new(Resource::Videos, "id,snippet,statistics")
            .filter("id", join_ids(video_ids))
            .max_results(self.batch_max_results()?);
        let items = self.list_items(&request).await?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            if let Some(record) = VideoRecord::from_item(item)? {
                records.push(record);
            }
        }
        Ok(Table::from_records(records))
    }

    /// Runs `fetch_batch` over `ids` in order and folds the results into one table.
    ///
    /// The first failing batch aborts the whole fetch.
    async fn fetch_in_batches<'s, R, F, Fut>(
        &'s self,
        ids: &'s [String],
        fetch_batch: F,
    ) -> eyre::Result<Table>
    where
        R: Record,
        F: Fn(&'s [String]) -> Fut,
        Fut: Future<Output = eyre::Result<Table>>,
    {
        let mut table = Table::empty(R::SCHEMA);
        for (i, batch) in batches(ids, self.config.batch_size).enumerate() {
            let rows = fetch_batch(batch)
                .await
                .with_context(|| format!("fetch batch {i} ({} ids)", batch.len()))?;
            tracing::debug!(batch = i, ids = batch.len(), rows = rows.len(), "fetched batch");
            self.limiter.wait_before_next_call().await;
            table.concat(rows)?;
        }
        Ok(table)
    }

    /// `maxResults` for a batched call. `new` does not validate the config, so the batch size
    /// is checked against the API ceiling here.
    fn batch_max_results(&self) -> Result<u32, ConfigError> {
        let size = self.config.batch_size.get();
        u32::try_from(size)
            .ok()
            .filter(|_| size <= MAX_BATCH_SIZE)
            .ok_or(ConfigError::OutOfRange {
                name: "batch_size",
                max: MAX_BATCH_SIZE,
                value: size,
            })
    }

    async fn list_items(&self, request: &ListRequest) -> eyre::Result<Vec<serde_json::Value>> {
        let mut response = self.api.list(request).await?;
        take_items(&mut response, request)
    }
}
