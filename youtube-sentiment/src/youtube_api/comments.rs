//! YouTube CommentThreads API types and flattening.

use crate::error::FlattenError;
use crate::table::{Cell, Column, Record, Schema};
use crate::youtube_api::types::count_as_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const COMMENT_THREAD_KIND: &str = "youtube#commentThread";

/// A `commentThread` resource: a top-level comment and the replies to it.
///
/// Only the parts requested with `part=snippet,replies` are modelled.
///
/// See: <https://developers.google.com/youtube/v3/docs/commentThreads#resource>
#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
    /// Absent when the thread has no replies.
    #[serde(default)]
    pub replies: Option<CommentThreadReplies>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Comment,
    /// The total number of replies, which may exceed the replies included in the resource.
    #[serde(rename = "totalReplyCount")]
    pub total_reply_count: u64,
}

/// The replies included with a thread. YouTube may include fewer than `totalReplyCount`.
#[derive(Debug, Deserialize)]
pub struct CommentThreadReplies {
    pub comments: Vec<Reply>,
}

/// A reply `comment` resource, of which only the text is kept.
#[derive(Debug, Deserialize)]
pub struct Reply {
    pub snippet: ReplySnippet,
}

#[derive(Debug, Deserialize)]
pub struct ReplySnippet {
    #[serde(rename = "textDisplay")]
    pub text_display: String,
}

/// A `comment` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/comments#resource>
#[derive(Debug, Deserialize)]
pub struct Comment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
pub struct CommentSnippet {
    /// The comment's text as displayed, possibly with HTML markup.
    #[serde(rename = "textDisplay")]
    pub text_display: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(rename = "authorDisplayName")]
    pub author_display_name: String,
    #[serde(rename = "likeCount", deserialize_with = "count_as_text")]
    pub like_count: String,
}

/// One row of the comments table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub comment: String,
    pub comment_dt: String,
    pub user_name: String,
    pub like_cnt: String,
    pub reply_cnt: String,
    /// Reply texts in the order the API returned them.
    pub replies: Vec<String>,
}

impl CommentRecord {
    /// Flattens one raw `commentThread` item.
    pub fn from_item(item: Value) -> Result<Self, FlattenError> {
        let thread: CommentThread =
            serde_json::from_value(item).map_err(|source| FlattenError::InvalidItem {
                kind: COMMENT_THREAD_KIND,
                source,
            })?;
        Ok(Self::from(thread))
    }
}

impl From<CommentThread> for CommentRecord {
    fn from(thread: CommentThread) -> Self {
        let CommentThread { snippet, replies } = thread;
        let top = snippet.top_level_comment.snippet;

        let replies = match replies {
            Some(replies) if snippet.total_reply_count > 0 => replies
                .comments
                .into_iter()
                .map(|reply| reply.snippet.text_display)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            comment: top.text_display,
            comment_dt: top.published_at,
            user_name: top.author_display_name,
            like_cnt: top.like_count,
            reply_cnt: snippet.total_reply_count.to_string(),
            replies,
        }
    }
}

impl Record for CommentRecord {
    const SCHEMA: Schema = &[
        Column::text("comment"),
        Column::text("comment_dt"),
        Column::text("user_name"),
        Column::text("like_cnt"),
        Column::text("reply_cnt"),
        Column::text_list("replies"),
    ];

    fn into_row(self) -> Vec<Cell> {
        vec![
            self.comment.into(),
            self.comment_dt.into(),
            self.user_name.into(),
            self.like_cnt.into(),
            self.reply_cnt.into(),
            self.replies.into(),
        ]
    }
}

/// Picks the thread id out of an item from an `id`-only `commentThreads.list` page.
///
/// Items of any other kind are skipped.
pub fn comment_thread_id(item: Value) -> eyre::Result<Option<String>> {
    if item.get("kind").and_then(Value::as_str) != Some(COMMENT_THREAD_KIND) {
        return Ok(None);
    }
    match item.get("id").and_then(Value::as_str) {
        Some(id) => Ok(Some(id.to_string())),
        None => Err(eyre::eyre!("{COMMENT_THREAD_KIND} item without an id: {item}")),
    }
}
