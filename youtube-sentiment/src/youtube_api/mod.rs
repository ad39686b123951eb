//! YouTube Data API v3 client library.
//!
//! This module covers the read-only `list` endpoints needed to collect comments and video
//! metadata for a channel, and the flattening of their nested JSON into table rows.
//!
//! # Core Concepts: Listings vs Batches
//!
//! Two kinds of `list` calls are made, and they fail differently:
//!
//! ## Listings - walking a cursor
//! - **What**: every comment thread id on a video, every video id in an uploads playlist
//! - **How**: [`types::paginate`] follows `nextPageToken` until it runs out
//! - **Failure**: best-effort. A failed page ends the walk and [`types::Paginated`] keeps what
//!   was gathered, with `complete` set to `false`
//!
//! ## Batches - looking up known ids
//! - **What**: full `snippet`/`statistics`/`replies` data for up to 50 ids per call
//! - **How**: the ids are joined into one `id` filter, see [`crate::batch`]
//! - **Failure**: strict. A failed call or a malformed item aborts the whole fetch
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_sentiment::youtube_api::{YouTubeClient, resolve_handle};
//! use youtube_sentiment::FetchConfig;
//!
//! # async fn example() -> eyre::Result<()> {
//! let config = FetchConfig::from_env()?;
//! let client = YouTubeClient::from_config(&config);
//! let channel = resolve_handle(&client, "@LylaMev").await?;
//! println!("uploads live in {}", channel.uploads_playlist_id);
//! # Ok(())
//! # }
//! ```

pub mod channels;
pub mod client;
pub mod comments;
pub mod playlist_items;
pub mod types;
pub mod videos;

pub use client::{ListRequest, Resource, YouTubeApi, YouTubeClient};
pub use types::{Paginated, PagedStream, paginate};

pub use channels::{ResolvedChannel, resolve_handle};
pub use comments::{CommentRecord, comment_thread_id};
pub use playlist_items::playlist_video_id;
pub use videos::VideoRecord;
