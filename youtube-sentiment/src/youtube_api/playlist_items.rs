//! YouTube PlaylistItems API types.

use crate::youtube_api::videos::VIDEO_KIND;
use serde::Deserialize;
use serde_json::Value;

/// A `playlistItem` resource as returned with `part=snippet`.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemSnippet {
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
}

/// What the playlist entry points at.
#[derive(Debug, Deserialize)]
pub struct ResourceId {
    pub kind: String,
    /// Only set when `kind` is `youtube#video`.
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Picks the video id out of a playlist item, skipping entries that aren't videos.
pub fn playlist_video_id(item: Value) -> eyre::Result<Option<String>> {
    let item: PlaylistItem = serde_json::from_value(item)?;
    let ResourceId { kind, video_id } = item.snippet.resource_id;
    if kind != VIDEO_KIND {
        return Ok(None);
    }
    video_id
        .map(Some)
        .ok_or_else(|| eyre::eyre!("playlist item of kind {VIDEO_KIND} without a videoId"))
}
