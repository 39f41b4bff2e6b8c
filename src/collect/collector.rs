// The paginated collector.
//
// Drives cursor-based pagination against a listing endpoint, merging each
// page into a single keyed accumulator (last write wins), and chunks large
// id lists into provider-sized detail batches. Fetches are awaited strictly
// one at a time — there is no overlap, so the only ordering that matters is
// the final sort by published timestamp.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::youtube::error::ApiError;

/// Provider-imposed ceiling on ids per detail request.
pub const BATCH_CAP: usize = 50;

/// One page of raw items from a cursor-paginated listing endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Opaque token for the next page; `None` (or empty) means exhausted.
    pub next_cursor: Option<String>,
}

/// A single page fetch against a cursor-paginated listing endpoint.
#[async_trait]
pub trait PageFetcher {
    type Item: Send;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<Self::Item>, ApiError>;
}

/// One detail request for a batch of at most [`BATCH_CAP`] ids.
///
/// Detail endpoints may themselves paginate within a batch, hence the
/// per-batch cursor.
#[async_trait]
pub trait BatchFetcher {
    type Item: Send;

    async fn fetch_batch(
        &self,
        ids: &[String],
        cursor: Option<&str>,
    ) -> Result<Page<Self::Item>, ApiError>;
}

/// Gives a parsed record its dedup key and sort timestamp.
pub trait Keyed {
    fn dedup_key(&self) -> &str;
    fn published_at(&self) -> DateTime<Utc>;
}

/// Why a record failed to parse out of a raw page item.
///
/// Only required fields produce these; optional fields parse to an
/// explicit absent value instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unparseable timestamp in `{field}`: {value}")]
    BadTimestamp { field: &'static str, value: String },
}

/// A page fetch failed. `cursor` is the cursor of the failing request, so
/// a caller-supplied policy can resume from it; the collector itself never
/// retries.
#[derive(Debug, Error)]
#[error("collection failed at cursor {cursor:?}: {source}")]
pub struct CollectionError {
    #[source]
    pub source: ApiError,
    pub cursor: Option<String>,
}

/// Cooperative cancellation flag, checked between page fetches — never
/// mid-request.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for [`collect`].
#[derive(Default)]
pub struct CollectOptions {
    /// Stop after this many pages even if a cursor remains. Optional
    /// safety valve; `None` drains the source.
    pub max_pages: Option<usize>,
    /// Checked between page fetches.
    pub cancel: Option<CancelToken>,
}

/// How a collection run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The source returned a page with no next cursor.
    Complete,
    /// Cancelled between pages; `resume_cursor` continues where we stopped.
    Cancelled { resume_cursor: Option<String> },
    /// The `max_pages` valve tripped before the source was exhausted.
    PageLimit { resume_cursor: Option<String> },
}

/// Result of a collection run: deduplicated records in ascending published
/// order, plus how the run ended.
#[derive(Debug)]
pub struct Collection<R> {
    pub records: Vec<R>,
    pub outcome: Outcome,
    pub pages_fetched: usize,
}

/// Drain a cursor-paginated listing into a deduplicated, time-ordered
/// sequence of records.
///
/// Every item the source returns is visited exactly once by the merge
/// step. Items that fail to parse (required field missing) are dropped
/// with a warning; duplicate dedup keys collapse, last write wins. The
/// final sequence is stable-sorted by published timestamp ascending, with
/// first-seen key order as the tiebreak, so repeated runs against the same
/// source produce identical output.
pub async fn collect<F, R>(
    fetcher: &F,
    options: &CollectOptions,
) -> Result<Collection<R>, CollectionError>
where
    F: PageFetcher,
    R: Keyed + TryFrom<F::Item, Error = ParseError>,
{
    let mut accumulator: HashMap<String, R> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0usize;

    let outcome = loop {
        if let Some(token) = &options.cancel {
            if token.is_cancelled() {
                break Outcome::Cancelled {
                    resume_cursor: cursor,
                };
            }
        }
        if let Some(max) = options.max_pages {
            if pages_fetched >= max {
                break Outcome::PageLimit {
                    resume_cursor: cursor,
                };
            }
        }

        let page = fetcher
            .fetch_page(cursor.as_deref())
            .await
            .map_err(|source| CollectionError {
                source,
                cursor: cursor.clone(),
            })?;
        pages_fetched += 1;

        for item in page.items {
            match R::try_from(item) {
                Ok(record) => upsert(&mut accumulator, &mut order, record),
                Err(err) => warn!(error = %err, "Dropping record"),
            }
        }

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => break Outcome::Complete,
            Some(next) => {
                debug!(page = pages_fetched, "Advancing to next page");
                cursor = Some(next);
            }
        }
    };

    Ok(Collection {
        records: into_sorted(accumulator, order),
        outcome,
        pages_fetched,
    })
}

/// A detail chunk whose fetch failed. Sibling chunks are unaffected.
#[derive(Debug)]
pub struct FailedChunk {
    /// Zero-based position of the chunk in the original id sequence.
    pub index: usize,
    pub ids: Vec<String>,
    pub error: CollectionError,
}

/// Result of a detail collection: the merged id-keyed mapping plus any
/// chunks that failed.
#[derive(Debug)]
pub struct DetailCollection<R> {
    pub records: HashMap<String, R>,
    pub failed_chunks: Vec<FailedChunk>,
}

/// Fetch detail records for an id list that may exceed the provider's
/// per-request maximum.
///
/// Ids are partitioned into contiguous chunks of at most [`BATCH_CAP`],
/// preserving input order; each chunk's cursor chain is drained fully
/// before the next chunk starts. A chunk that fails is recorded and
/// skipped — it never aborts its siblings. An id with no matching remote
/// record is simply absent from the output.
pub async fn collect_details_for_ids<F, R>(fetcher: &F, ids: &[String]) -> DetailCollection<R>
where
    F: BatchFetcher,
    R: Keyed + TryFrom<F::Item, Error = ParseError>,
{
    let mut records: HashMap<String, R> = HashMap::new();
    let mut failed_chunks = Vec::new();

    for (index, chunk) in ids.chunks(BATCH_CAP).enumerate() {
        if let Err(error) = drain_chunk(fetcher, chunk, &mut records).await {
            warn!(
                chunk = index,
                error = %error,
                "Detail chunk failed; continuing with remaining chunks"
            );
            failed_chunks.push(FailedChunk {
                index,
                ids: chunk.to_vec(),
                error,
            });
        }
    }

    DetailCollection {
        records,
        failed_chunks,
    }
}

/// Drain all pages for one id chunk, merging records by dedup key.
async fn drain_chunk<F, R>(
    fetcher: &F,
    chunk: &[String],
    records: &mut HashMap<String, R>,
) -> Result<(), CollectionError>
where
    F: BatchFetcher,
    R: Keyed + TryFrom<F::Item, Error = ParseError>,
{
    let mut cursor: Option<String> = None;

    loop {
        let page = fetcher
            .fetch_batch(chunk, cursor.as_deref())
            .await
            .map_err(|source| CollectionError {
                source,
                cursor: cursor.clone(),
            })?;

        for item in page.items {
            match R::try_from(item) {
                Ok(record) => {
                    records.insert(record.dedup_key().to_string(), record);
                }
                Err(err) => warn!(error = %err, "Dropping record"),
            }
        }

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => return Ok(()),
            Some(next) => cursor = Some(next),
        }
    }
}

fn upsert<R: Keyed>(accumulator: &mut HashMap<String, R>, order: &mut Vec<String>, record: R) {
    let key = record.dedup_key().to_string();
    if accumulator.insert(key.clone(), record).is_none() {
        order.push(key);
    }
}

fn into_sorted<R: Keyed>(mut accumulator: HashMap<String, R>, order: Vec<String>) -> Vec<R> {
    let mut records: Vec<R> = order
        .into_iter()
        .filter_map(|key| accumulator.remove(&key))
        .collect();
    records.sort_by_key(|r| r.published_at());
    records
}
