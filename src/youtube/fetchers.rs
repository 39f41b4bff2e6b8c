// Fetcher adapters — one per listing endpoint we page through.
//
// Each adapter owns the endpoint's query parameters and implements the
// collector's PageFetcher/BatchFetcher seam, so the collector never sees
// URLs or API quirks.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::collect::collector::{BatchFetcher, Page, PageFetcher};

use super::client::{YouTubeClient, MAX_PAGE_SIZE};
use super::error::ApiError;
use super::types::{
    CommentSnippet, CommentThreadsResponse, SearchItem, SearchResponse, VideoItem,
    VideoListResponse,
};

/// Immutable parameters for one video search; only the cursor advances
/// between requests.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub channel_id: String,
    pub published_after: DateTime<Utc>,
    pub published_before: DateTime<Utc>,
    /// Optional narrowing term. The API accepts `|` for OR and `-` for NOT.
    pub search_term: Option<String>,
    pub page_size: u32,
}

impl SearchQuery {
    /// Page size clamped to the provider maximum.
    pub fn clamped_page_size(&self) -> u32 {
        self.page_size.min(MAX_PAGE_SIZE)
    }
}

/// Pages through `search.list` for videos on a channel in a date range.
pub struct SearchFetcher<'a> {
    pub client: &'a YouTubeClient,
    pub query: &'a SearchQuery,
}

#[async_trait]
impl PageFetcher for SearchFetcher<'_> {
    type Item = SearchItem;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<SearchItem>, ApiError> {
        let page_size = self.query.clamped_page_size().to_string();
        let after = rfc3339(self.query.published_after);
        let before = rfc3339(self.query.published_before);

        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("order", "date"),
            ("channelId", &self.query.channel_id),
            ("publishedAfter", &after),
            ("publishedBefore", &before),
            ("maxResults", &page_size),
        ];
        if let Some(ref term) = self.query.search_term {
            params.push(("q", term));
        }
        if let Some(c) = cursor {
            params.push(("pageToken", c));
        }

        let resp: SearchResponse = self.client.get("search", &params).await?;
        Ok(Page {
            items: resp.items,
            next_cursor: resp.next_page_token,
        })
    }
}

/// Batch-fetches full video metadata via `videos.list`.
pub struct VideoDetailsFetcher<'a> {
    pub client: &'a YouTubeClient,
}

#[async_trait]
impl BatchFetcher for VideoDetailsFetcher<'_> {
    type Item = VideoItem;

    async fn fetch_batch(
        &self,
        ids: &[String],
        cursor: Option<&str>,
    ) -> Result<Page<VideoItem>, ApiError> {
        let joined = ids.join(",");
        let page_size = MAX_PAGE_SIZE.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet,statistics"),
            ("id", &joined),
            ("maxResults", &page_size),
        ];
        if let Some(c) = cursor {
            params.push(("pageToken", c));
        }

        let resp: VideoListResponse = self.client.get("videos", &params).await?;
        Ok(Page {
            items: resp.items,
            next_cursor: resp.next_page_token,
        })
    }
}

/// One comment lifted out of a thread — the top-level comment or a reply.
///
/// The thread's reply count travels with the top-level comment only;
/// replies carry 0. `video_id` is the thread's, used when the comment
/// snippet omits its own.
#[derive(Debug, Clone)]
pub struct ThreadComment {
    pub snippet: CommentSnippet,
    pub reply_count: u64,
    pub video_id: Option<String>,
}

/// Pages through `commentThreads.list` for one video, flattening each
/// thread into its top-level comment plus any replies the API inlines.
pub struct CommentThreadsFetcher<'a> {
    pub client: &'a YouTubeClient,
    pub video_id: &'a str,
}

#[async_trait]
impl PageFetcher for CommentThreadsFetcher<'_> {
    type Item = ThreadComment;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<ThreadComment>, ApiError> {
        let page_size = MAX_PAGE_SIZE.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet,replies"),
            ("videoId", self.video_id),
            ("maxResults", &page_size),
        ];
        if let Some(c) = cursor {
            params.push(("pageToken", c));
        }

        let resp: CommentThreadsResponse = self.client.get("commentThreads", &params).await?;

        let mut items = Vec::new();
        for thread in resp.items {
            let Some(thread_snippet) = thread.snippet else {
                continue;
            };
            let video_id = thread_snippet.video_id.clone();
            let reply_count = thread_snippet.total_reply_count.unwrap_or(0);

            if let Some(top) = thread_snippet.top_level_comment {
                if let Some(snippet) = top.snippet {
                    items.push(ThreadComment {
                        snippet,
                        reply_count,
                        video_id: video_id.clone(),
                    });
                }
            }

            if let Some(replies) = thread.replies {
                for reply in replies.comments {
                    if let Some(snippet) = reply.snippet {
                        items.push(ThreadComment {
                            snippet,
                            reply_count: 0,
                            video_id: video_id.clone(),
                        });
                    }
                }
            }
        }

        Ok(Page {
            items,
            next_cursor: resp.next_page_token,
        })
    }
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
