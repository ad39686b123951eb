//! Collects YouTube comments and video statistics as flat tables for sentiment analysis.
//!
//! A [`Fetcher`] lists ids with cursor pagination, looks them up in batches of up to 50, and
//! flattens each nested API item into a row of a fixed-schema [`Table`]:
//!
//! * [`Fetcher::fetch_comments`] gives one row per comment thread on a video, with the thread's
//!   replies nested as a list column.
//! * [`Fetcher::fetch_videos`] gives one row per upload on a channel, found through the
//!   channel's uploads playlist after [`Fetcher::resolve_channel`] has looked up its handle.
//!
//! Listings are best-effort and report whether they finished; everything else fails loudly.

pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod table;
pub mod throttle;
pub mod youtube_api;

#[cfg(test)]
mod mock;

pub use config::{ApiKey, FetchConfig};
pub use error::{ConfigError, FlattenError, ResolveError, TableError};
pub use fetch::{Fetched, Fetcher};
pub use table::{Cell, Column, ColumnType, Record, Schema, Table};
pub use throttle::{FixedDelay, RateLimiter};
pub use youtube_api::{CommentRecord, ResolvedChannel, VideoRecord};
