// Serde shapes for the listing endpoints we page through.
//
// Everything beyond the page token is optional here: the collector decides
// per record which missing fields are fatal (drop the record) and which
// become an explicit absent value. Count fields under `statistics` arrive
// as JSON strings, not numbers — coercion happens at record-parse time.

use serde::Deserialize;

// -- search.list --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: Option<SearchItemId>,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: Option<String>,
    pub published_at: Option<String>,
}

// -- videos.list --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub id: Option<String>,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    /// Absent when the uploader set no tags.
    pub tags: Option<Vec<String>>,
}

/// Counters as the API sends them: strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
    pub favorite_count: Option<String>,
}

// -- commentThreads.list --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadsResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub snippet: Option<CommentThreadSnippet>,
    pub replies: Option<CommentReplies>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub video_id: Option<String>,
    pub total_reply_count: Option<u64>,
    pub top_level_comment: Option<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentReplies {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub video_id: Option<String>,
    pub author_display_name: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    /// Unlike video statistics, comment like counts are real JSON numbers.
    pub like_count: Option<u64>,
    pub text_display: Option<String>,
}
