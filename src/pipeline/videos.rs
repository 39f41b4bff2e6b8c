// Video harvest: search for ids in a date range, batch-fetch details,
// filter by title, sort by publish time.

use anyhow::Result;
use tracing::{info, warn};

use crate::collect::collector::{
    collect, collect_details_for_ids, CollectOptions, Collection, FailedChunk,
};
use crate::collect::records::{SearchHit, VideoRecord};
use crate::youtube::client::YouTubeClient;
use crate::youtube::fetchers::{SearchFetcher, SearchQuery, VideoDetailsFetcher};

/// Result of a full video harvest.
pub struct VideoHarvest {
    /// Detail records, deduplicated by id, ascending publish time.
    pub records: Vec<VideoRecord>,
    /// Unique ids the search surfaced (before detail fetch and filtering).
    pub search_hits: usize,
    pub search_pages: usize,
    pub failed_chunks: Vec<FailedChunk>,
}

/// Run the harvest. `title_filter`, when set, keeps only videos whose
/// title mentions the term (case-insensitive) — channel search results
/// include shorts and side content the topic dataset should not carry.
pub async fn run(
    client: &YouTubeClient,
    query: &SearchQuery,
    title_filter: Option<&str>,
    max_pages: Option<usize>,
) -> Result<VideoHarvest> {
    println!("Searching for videos...");

    let fetcher = SearchFetcher { client, query };
    let options = CollectOptions {
        max_pages,
        cancel: None,
    };
    let search: Collection<SearchHit> = collect(&fetcher, &options).await?;

    info!(
        hits = search.records.len(),
        pages = search.pages_fetched,
        "Search complete"
    );
    println!(
        "  {} videos found across {} page(s)",
        search.records.len(),
        search.pages_fetched
    );

    let ids: Vec<String> = search
        .records
        .iter()
        .map(|hit| hit.video_id.clone())
        .collect();

    println!("Fetching video details...");
    let details_fetcher = VideoDetailsFetcher { client };
    let details = collect_details_for_ids::<_, VideoRecord>(&details_fetcher, &ids).await;

    for chunk in &details.failed_chunks {
        warn!(chunk = chunk.index, error = %chunk.error, "Detail chunk failed");
    }

    let mut records: Vec<VideoRecord> = details.records.into_values().collect();
    records.sort_by_key(|r| r.published_at);

    let records = match title_filter {
        Some(term) => {
            let needle = term.to_lowercase();
            let before = records.len();
            let kept: Vec<VideoRecord> = records
                .into_iter()
                .filter(|r| r.title.to_lowercase().contains(&needle))
                .collect();
            info!(
                kept = kept.len(),
                dropped = before - kept.len(),
                filter = %term,
                "Applied title filter"
            );
            kept
        }
        None => records,
    };

    Ok(VideoHarvest {
        records,
        search_hits: ids.len(),
        search_pages: search.pages_fetched,
        failed_chunks: details.failed_chunks,
    })
}
