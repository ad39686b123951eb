//! YouTube Videos API types and flattening.

use crate::error::FlattenError;
use crate::table::{Cell, Column, Record, Schema};
use crate::youtube_api::types::count_as_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const VIDEO_KIND: &str = "youtube#video";

/// A `video` resource as returned with `part=id,snippet,statistics`.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    pub snippet: VideoSnippet,
    pub statistics: VideoStatistics,
}

/// Basic details about the video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub title: String,
    pub description: String,
    /// Keyword tags. The API leaves the field out entirely when a video has none.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Statistics about the video.
///
/// All four counts are required: a video that hides its like count, or a response from an API
/// version without `favoriteCount`, fails to flatten.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount", deserialize_with = "count_as_text")]
    pub view_count: String,
    #[serde(rename = "likeCount", deserialize_with = "count_as_text")]
    pub like_count: String,
    /// Deprecated by YouTube and always `0`, but still part of the table.
    #[serde(rename = "favoriteCount", deserialize_with = "count_as_text")]
    pub favorite_count: String,
    #[serde(rename = "commentCount", deserialize_with = "count_as_text")]
    pub comment_count: String,
}

/// One row of the videos table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub published_dt: String,
    pub video_title: String,
    pub video_description: String,
    /// `None` when the API sent no tags at all.
    pub video_tags: Option<Vec<String>>,
    pub view_cnt: String,
    pub like_cnt: String,
    pub fave_cnt: String,
    pub comment_cnt: String,
}

impl VideoRecord {
    /// Flattens one raw item from a `videos.list` response.
    ///
    /// Returns `Ok(None)` for items that aren't videos.
    pub fn from_item(item: Value) -> Result<Option<Self>, FlattenError> {
        if item.get("kind").and_then(Value::as_str) != Some(VIDEO_KIND) {
            return Ok(None);
        }
        let video: Video =
            serde_json::from_value(item).map_err(|source| FlattenError::InvalidItem {
                kind: VIDEO_KIND,
                source,
            })?;
        Ok(Some(Self::from(video)))
    }
}

impl From<Video> for VideoRecord {
    fn from(video: Video) -> Self {
        let Video {
            id,
            snippet,
            statistics,
        } = video;
        Self {
            video_id: id,
            published_dt: snippet.published_at,
            video_title: snippet.title,
            video_description: snippet.description,
            video_tags: snippet.tags,
            view_cnt: statistics.view_count,
            like_cnt: statistics.like_count,
            fave_cnt: statistics.favorite_count,
            comment_cnt: statistics.comment_count,
        }
    }
}

impl Record for VideoRecord {
    const SCHEMA: Schema = &[
        Column::text("video_id"),
        Column::text("published_dt"),
        Column::text("video_title"),
        Column::text("video_description"),
        Column::text_list("video_tags"),
        Column::text("view_cnt"),
        Column::text("like_cnt"),
        Column::text("fave_cnt"),
        Column::text("comment_cnt"),
    ];

    fn into_row(self) -> Vec<Cell> {
        vec![
            self.video_id.into(),
            self.published_dt.into(),
            self.video_title.into(),
            self.video_description.into(),
            self.video_tags.into(),
            self.view_cnt.into(),
            self.like_cnt.into(),
            self.fave_cnt.into(),
            self.comment_cnt.into(),
        ]
    }
}
