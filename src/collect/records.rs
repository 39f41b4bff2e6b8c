// Parsed record types and their dedup keys.
//
// Conversion from the raw API shapes happens here. Required fields missing
// -> ParseError (the collector drops the record and warns). Optional fields
// missing -> explicit absent value. Count strings that fail to parse
// coerce to 0 rather than dropping the record.

use chrono::{DateTime, Utc};

use crate::youtube::fetchers::ThreadComment;
use crate::youtube::types::{SearchItem, VideoItem};

use super::collector::{Keyed, ParseError};

fn parse_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<DateTime<Utc>, ParseError> {
    let value = value.ok_or(ParseError::MissingField(field))?;
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ParseError::BadTimestamp { field, value })
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// A video surfaced by the search endpoint — just enough to drive the
/// detail fetch. Keyed by video id.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
}

impl TryFrom<SearchItem> for SearchHit {
    type Error = ParseError;

    fn try_from(item: SearchItem) -> Result<Self, ParseError> {
        let video_id = item
            .id
            .and_then(|id| id.video_id)
            .ok_or(ParseError::MissingField("id.videoId"))?;
        let snippet = item.snippet.ok_or(ParseError::MissingField("snippet"))?;

        Ok(Self {
            video_id,
            title: snippet.title.unwrap_or_default(),
            published_at: parse_timestamp("snippet.publishedAt", snippet.published_at)?,
        })
    }
}

impl Keyed for SearchHit {
    fn dedup_key(&self) -> &str {
        &self.video_id
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Full video metadata from the videos endpoint. Keyed by video id —
/// globally unique in the output, so a collision across pages just means
/// the same video came back twice and the later copy wins.
#[derive(Debug, Clone)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// `None` when the uploader set no tags. Exported as an empty field.
    pub tags: Option<Vec<String>>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub favorite_count: u64,
}

impl TryFrom<VideoItem> for VideoRecord {
    type Error = ParseError;

    fn try_from(item: VideoItem) -> Result<Self, ParseError> {
        let video_id = item.id.ok_or(ParseError::MissingField("id"))?;
        let snippet = item.snippet.ok_or(ParseError::MissingField("snippet"))?;
        let stats = item.statistics.unwrap_or_default();

        Ok(Self {
            video_id,
            title: snippet.title.unwrap_or_default(),
            description: snippet.description.unwrap_or_default(),
            channel_id: snippet.channel_id.unwrap_or_default(),
            channel_title: snippet.channel_title.unwrap_or_default(),
            published_at: parse_timestamp("snippet.publishedAt", snippet.published_at)?,
            // Tags come from this item's own snippet, never from a batch sibling.
            tags: snippet.tags,
            view_count: parse_count(stats.view_count.as_deref()),
            like_count: parse_count(stats.like_count.as_deref()),
            comment_count: parse_count(stats.comment_count.as_deref()),
            favorite_count: parse_count(stats.favorite_count.as_deref()),
        })
    }
}

impl Keyed for VideoRecord {
    fn dedup_key(&self) -> &str {
        &self.video_id
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// One comment, top-level or reply.
///
/// Keyed by display text: two comments with identical text collapse to one
/// row. That is the dataset's documented dedup rule — the comment id is
/// deliberately not part of the key.
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub video_id: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: u64,
    pub reply_count: u64,
    pub text: String,
}

impl TryFrom<ThreadComment> for CommentRecord {
    type Error = ParseError;

    fn try_from(item: ThreadComment) -> Result<Self, ParseError> {
        let snippet = item.snippet;
        let text = snippet
            .text_display
            .ok_or(ParseError::MissingField("snippet.textDisplay"))?;
        let published_at = parse_timestamp("snippet.publishedAt", snippet.published_at)?;
        // An edit timestamp is only present after an edit; fall back to
        // the publish instant.
        let updated_at = match snippet.updated_at {
            Some(value) => parse_timestamp("snippet.updatedAt", Some(value))?,
            None => published_at,
        };

        Ok(Self {
            video_id: snippet.video_id.or(item.video_id).unwrap_or_default(),
            author: snippet.author_display_name.unwrap_or_default(),
            published_at,
            updated_at,
            like_count: snippet.like_count.unwrap_or(0),
            reply_count: item.reply_count,
            text,
        })
    }
}

impl Keyed for CommentRecord {
    fn dedup_key(&self) -> &str {
        &self.text
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}
