//! YouTube Channels API types and handle resolution.

use crate::error::{FlattenError, ResolveError};
use crate::youtube_api::client::{ListRequest, Resource, YouTubeApi};
use crate::youtube_api::types::take_items;
use eyre::Context;
use serde::{Deserialize, Serialize};

const CHANNEL_KIND: &str = "youtube#channel";

/// A `channel` resource as returned with `part=id,contentDetails`.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Deserialize)]
pub struct Channel {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: String,
    #[serde(rename = "contentDetails")]
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: RelatedPlaylists,
}

/// Playlists YouTube maintains for every channel.
#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    /// The playlist of every public upload on the channel.
    pub uploads: String,
}

/// A channel handle together with the ids looked up for it.
///
/// Resolved once per session and handed to every operation that needs the channel, so a
/// handle is never looked up twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedChannel {
    pub handle: String,
    pub channel_id: String,
    pub uploads_playlist_id: String,
}

/// Looks up the channel behind `handle` with a single `channels.list` call.
///
/// Handles are unique per channel, so any answer other than exactly one channel is an error:
/// [`ResolveError::Ambiguous`] for several, [`ResolveError::NotFound`] for none.
pub async fn resolve_handle<A: YouTubeApi>(api: &A, handle: &str) -> eyre::Result<ResolvedChannel> {
    let request =
        ListRequest::new(Resource::Channels, "id,contentDetails").filter("forHandle", handle);
    let mut response = api
        .list(&request)
        .await
        .with_context(|| format!("look up channel for handle {handle}"))?;

    // a handle nobody owns comes back without an items array at all
    let items = if response.get("items").is_some() {
        take_items(&mut response, &request)?
    } else {
        Vec::new()
    };

    let item = match <[_; 1]>::try_from(items) {
        Ok([item]) => item,
        Err(items) if items.is_empty() => {
            return Err(ResolveError::NotFound {
                handle: handle.to_string(),
            }
            .into());
        }
        Err(items) => {
            return Err(ResolveError::Ambiguous {
                handle: handle.to_string(),
                count: items.len(),
            }
            .into());
        }
    };

    let channel: Channel =
        serde_json::from_value(item).map_err(|source| FlattenError::InvalidItem {
            kind: CHANNEL_KIND,
            source,
        })?;

    tracing::debug!(
        handle,
        channel_id = channel.id,
        uploads_playlist_id = channel.content_details.related_playlists.uploads,
        "resolved channel handle"
    );

    Ok(ResolvedChannel {
        handle: handle.to_string(),
        channel_id: channel.id,
        uploads_playlist_id: channel.content_details.related_playlists.uploads,
    })
}
