// Unit tests for the paginated collector — mocked sources, no network.
//
// These exercise the collector's invariants directly: cursor draining,
// dedup, batch chunking, failure isolation, cancellation, and output
// ordering.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use ringside::collect::collector::{
    collect, collect_details_for_ids, BatchFetcher, CancelToken, CollectOptions, Collection,
    Keyed, Outcome, Page, PageFetcher, ParseError, BATCH_CAP,
};
use ringside::youtube::error::ApiError;

fn ts(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

// ============================================================
// Listing mock — text-keyed records, like comments
// ============================================================

#[derive(Debug, Clone)]
struct RawItem {
    id: &'static str,
    text: &'static str,
    published: i64,
    omit_required: bool,
}

impl RawItem {
    fn new(id: &'static str, text: &'static str, published: i64) -> Self {
        Self {
            id,
            text,
            published,
            omit_required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TextRecord {
    id: String,
    text: String,
    published_at: DateTime<Utc>,
}

impl Keyed for TextRecord {
    fn dedup_key(&self) -> &str {
        &self.text
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

impl TryFrom<RawItem> for TextRecord {
    type Error = ParseError;

    fn try_from(item: RawItem) -> Result<Self, ParseError> {
        if item.omit_required {
            return Err(ParseError::MissingField("text"));
        }
        Ok(TextRecord {
            id: item.id.to_string(),
            text: item.text.to_string(),
            published_at: ts(item.published),
        })
    }
}

/// Serves a fixed page sequence: cursor `None` is page 0, cursor `"n"` is
/// page n. Records every call and can fail or cancel at a chosen page.
struct MockSource {
    pages: Vec<(Vec<RawItem>, Option<&'static str>)>,
    calls: Mutex<Vec<Option<String>>>,
    fail_at: Option<usize>,
    cancel_when_serving: Option<(usize, CancelToken)>,
}

impl MockSource {
    fn new(pages: Vec<(Vec<RawItem>, Option<&'static str>)>) -> Self {
        Self {
            pages,
            calls: Mutex::new(Vec::new()),
            fail_at: None,
            cancel_when_serving: None,
        }
    }

    fn call_log(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockSource {
    type Item = RawItem;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<RawItem>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));

        let index = cursor.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);

        if self.fail_at == Some(index) {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        if let Some((at, token)) = &self.cancel_when_serving {
            if *at == index {
                token.cancel();
            }
        }

        let (items, next) = self.pages[index].clone();
        Ok(Page {
            items,
            next_cursor: next.map(str::to_string),
        })
    }
}

#[tokio::test]
async fn pagination_visits_every_page_once() {
    // 3 pages of 2 items plus a terminal empty page: 4 fetches total.
    let source = MockSource::new(vec![
        (vec![RawItem::new("a", "t1", 10), RawItem::new("b", "t2", 20)], Some("1")),
        (vec![RawItem::new("c", "t3", 30), RawItem::new("d", "t4", 40)], Some("2")),
        (vec![RawItem::new("e", "t5", 50), RawItem::new("f", "t6", 60)], Some("3")),
        (vec![], None),
    ]);

    let collection: Collection<TextRecord> =
        collect(&source, &CollectOptions::default()).await.unwrap();

    assert_eq!(collection.records.len(), 6);
    assert_eq!(collection.pages_fetched, 4);
    assert_eq!(collection.outcome, Outcome::Complete);
    assert_eq!(
        source.call_log(),
        vec![
            None,
            Some("1".to_string()),
            Some("2".to_string()),
            Some("3".to_string())
        ]
    );
}

#[tokio::test]
async fn collecting_twice_yields_identical_output() {
    let pages = || {
        vec![
            (vec![RawItem::new("a", "hi", 10), RawItem::new("b", "yo", 20)], Some("1")),
            // "hi" again — collapses with page 1's copy
            (vec![RawItem::new("c", "hi", 30)], None),
        ]
    };

    let first: Collection<TextRecord> =
        collect(&MockSource::new(pages()), &CollectOptions::default())
            .await
            .unwrap();
    let second: Collection<TextRecord> =
        collect(&MockSource::new(pages()), &CollectOptions::default())
            .await
            .unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.records.len(), 2);

    let keys: HashSet<&str> = first.records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(keys.len(), first.records.len(), "no duplicate keys");
}

#[tokio::test]
async fn duplicate_text_across_pages_collapses_last_write_wins() {
    let source = MockSource::new(vec![
        (vec![RawItem::new("a", "hi", 10), RawItem::new("b", "hi", 20)], Some("1")),
        (vec![RawItem::new("c", "bye", 30)], None),
    ]);

    let collection: Collection<TextRecord> =
        collect(&source, &CollectOptions::default()).await.unwrap();

    assert_eq!(collection.records.len(), 2);
    // "b" overwrote "a" under the shared "hi" key
    assert_eq!(collection.records[0].text, "hi");
    assert_eq!(collection.records[0].id, "b");
    assert_eq!(collection.records[1].text, "bye");
}

#[tokio::test]
async fn output_is_sorted_by_published_ascending() {
    let source = MockSource::new(vec![
        (vec![RawItem::new("a", "t1", 300), RawItem::new("b", "t2", 100)], Some("1")),
        (vec![RawItem::new("c", "t3", 200)], None),
    ]);

    let collection: Collection<TextRecord> =
        collect(&source, &CollectOptions::default()).await.unwrap();

    let stamps: Vec<DateTime<Utc>> = collection.records.iter().map(|r| r.published_at).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
    assert_eq!(stamps, vec![ts(100), ts(200), ts(300)]);
}

#[tokio::test]
async fn record_missing_required_field_is_dropped_not_fatal() {
    let mut bad = RawItem::new("b", "ignored", 20);
    bad.omit_required = true;

    let source = MockSource::new(vec![(
        vec![RawItem::new("a", "kept", 10), bad, RawItem::new("c", "also kept", 30)],
        None,
    )]);

    let collection: Collection<TextRecord> =
        collect(&source, &CollectOptions::default()).await.unwrap();

    assert_eq!(collection.records.len(), 2);
    assert!(collection.records.iter().all(|r| r.id != "b"));
}

#[tokio::test]
async fn failure_carries_the_failing_cursor() {
    let mut source = MockSource::new(vec![
        (vec![RawItem::new("a", "t1", 10)], Some("1")),
        (vec![RawItem::new("b", "t2", 20)], None),
    ]);
    source.fail_at = Some(1);

    let err = collect::<_, TextRecord>(&source, &CollectOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.cursor.as_deref(), Some("1"));
    assert!(matches!(err.source, ApiError::Network(_)));
}

#[tokio::test]
async fn failure_on_the_first_page_has_no_cursor() {
    let mut source = MockSource::new(vec![(vec![], None)]);
    source.fail_at = Some(0);

    let err = collect::<_, TextRecord>(&source, &CollectOptions::default())
        .await
        .unwrap_err();

    assert!(err.cursor.is_none());
}

#[tokio::test]
async fn cancellation_between_pages_keeps_partial_results() {
    let token = CancelToken::new();
    let mut source = MockSource::new(vec![
        (vec![RawItem::new("a", "t1", 10)], Some("1")),
        (vec![RawItem::new("b", "t2", 20)], None),
    ]);
    source.cancel_when_serving = Some((0, token.clone()));

    let options = CollectOptions {
        max_pages: None,
        cancel: Some(token),
    };
    let collection: Collection<TextRecord> = collect(&source, &options).await.unwrap();

    // Page 0 was merged; the cancel fired before page 1 was requested.
    assert_eq!(collection.records.len(), 1);
    assert_eq!(collection.pages_fetched, 1);
    assert_eq!(
        collection.outcome,
        Outcome::Cancelled {
            resume_cursor: Some("1".to_string())
        }
    );
    assert_eq!(source.call_log().len(), 1);
}

#[tokio::test]
async fn cancellation_before_the_first_fetch_returns_nothing() {
    let token = CancelToken::new();
    token.cancel();

    let source = MockSource::new(vec![(vec![RawItem::new("a", "t1", 10)], None)]);
    let options = CollectOptions {
        max_pages: None,
        cancel: Some(token),
    };
    let collection: Collection<TextRecord> = collect(&source, &options).await.unwrap();

    assert!(collection.records.is_empty());
    assert_eq!(
        collection.outcome,
        Outcome::Cancelled { resume_cursor: None }
    );
    assert!(source.call_log().is_empty());
}

#[tokio::test]
async fn max_pages_valve_stops_early_with_resume_cursor() {
    let source = MockSource::new(vec![
        (vec![RawItem::new("a", "t1", 10)], Some("1")),
        (vec![RawItem::new("b", "t2", 20)], Some("2")),
        (vec![RawItem::new("c", "t3", 30)], None),
    ]);

    let options = CollectOptions {
        max_pages: Some(1),
        cancel: None,
    };
    let collection: Collection<TextRecord> = collect(&source, &options).await.unwrap();

    assert_eq!(collection.records.len(), 1);
    assert_eq!(
        collection.outcome,
        Outcome::PageLimit {
            resume_cursor: Some("1".to_string())
        }
    );
    assert_eq!(source.call_log().len(), 1);
}

#[tokio::test]
async fn empty_string_cursor_terminates() {
    let source = MockSource::new(vec![(vec![RawItem::new("a", "t1", 10)], Some(""))]);

    let collection: Collection<TextRecord> =
        collect(&source, &CollectOptions::default()).await.unwrap();

    assert_eq!(collection.outcome, Outcome::Complete);
    assert_eq!(source.call_log().len(), 1);
}

// ============================================================
// Detail-batch mock — id-keyed records, like video details
// ============================================================

#[derive(Debug, Clone)]
struct RawDetail {
    id: String,
}

#[derive(Debug, Clone, PartialEq)]
struct IdRecord {
    id: String,
    published_at: DateTime<Utc>,
}

impl Keyed for IdRecord {
    fn dedup_key(&self) -> &str {
        &self.id
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

impl TryFrom<RawDetail> for IdRecord {
    type Error = ParseError;

    fn try_from(item: RawDetail) -> Result<Self, ParseError> {
        // Derive a deterministic timestamp from the id's numeric suffix.
        let seconds: i64 = item
            .id
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0);
        Ok(IdRecord {
            id: item.id,
            published_at: ts(seconds),
        })
    }
}

struct MockDetailSource {
    calls: Mutex<Vec<(Vec<String>, Option<String>)>>,
    /// Fail any batch containing this id.
    poison_id: Option<String>,
    /// Serve each batch as two pages instead of one.
    split_pages: bool,
    /// Ids that "exist" remotely; `None` means all of them.
    known_ids: Option<HashSet<String>>,
}

impl MockDetailSource {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            poison_id: None,
            split_pages: false,
            known_ids: None,
        }
    }

    fn call_log(&self) -> Vec<(Vec<String>, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchFetcher for MockDetailSource {
    type Item = RawDetail;

    async fn fetch_batch(
        &self,
        ids: &[String],
        cursor: Option<&str>,
    ) -> Result<Page<RawDetail>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((ids.to_vec(), cursor.map(str::to_string)));

        if let Some(poison) = &self.poison_id {
            if ids.contains(poison) {
                return Err(ApiError::Network("connection reset".to_string()));
            }
        }

        let known: Vec<String> = ids
            .iter()
            .filter(|id| {
                self.known_ids
                    .as_ref()
                    .map(|set| set.contains(*id))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        let (served, next) = if self.split_pages {
            let half = known.len() / 2;
            match cursor {
                None => (known[..half].to_vec(), Some("rest".to_string())),
                Some(_) => (known[half..].to_vec(), None),
            }
        } else {
            (known, None)
        };

        Ok(Page {
            items: served.into_iter().map(|id| RawDetail { id }).collect(),
            next_cursor: next,
        })
    }
}

fn id_range(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("id{i}")).collect()
}

#[tokio::test]
async fn ids_are_chunked_at_the_batch_cap_in_order() {
    let ids = id_range(137);
    let source = MockDetailSource::new();

    let details = collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    let calls = source.call_log();
    let sizes: Vec<usize> = calls.iter().map(|(ids, _)| ids.len()).collect();
    assert_eq!(sizes, vec![50, 50, 37]);

    // Chunks preserve the original order and never split or repeat an id.
    let replayed: Vec<String> = calls.iter().flat_map(|(ids, _)| ids.clone()).collect();
    assert_eq!(replayed, ids);

    assert_eq!(details.records.len(), 137);
    assert!(details.failed_chunks.is_empty());
}

#[tokio::test]
async fn a_single_id_fits_one_chunk() {
    let ids = id_range(1);
    let source = MockDetailSource::new();

    let details = collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    assert_eq!(source.call_log().len(), 1);
    assert_eq!(details.records.len(), 1);
}

#[tokio::test]
async fn exactly_the_cap_is_one_chunk() {
    let ids = id_range(BATCH_CAP);
    let source = MockDetailSource::new();

    collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    assert_eq!(source.call_log().len(), 1);
}

#[tokio::test]
async fn a_failed_chunk_does_not_abort_its_siblings() {
    // 230 ids -> 5 chunks; poison one id in the second chunk.
    let ids = id_range(230);
    let mut source = MockDetailSource::new();
    source.poison_id = Some("id75".to_string());

    let details = collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    assert_eq!(details.failed_chunks.len(), 1);
    assert_eq!(details.failed_chunks[0].index, 1);
    assert_eq!(details.failed_chunks[0].ids.len(), 50);
    assert!(matches!(
        details.failed_chunks[0].error.source,
        ApiError::Network(_)
    ));

    // The other four chunks' records are all present.
    assert_eq!(details.records.len(), 180);
    assert!(details.records.contains_key("id0"));
    assert!(details.records.contains_key("id229"));
    assert!(!details.records.contains_key("id75"));
}

#[tokio::test]
async fn each_chunk_drains_its_own_cursor_chain() {
    let ids = id_range(60); // 2 chunks
    let mut source = MockDetailSource::new();
    source.split_pages = true;

    let details = collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    // Two pages per chunk: None then "rest", chunk by chunk.
    let calls = source.call_log();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].1, None);
    assert_eq!(calls[1].1.as_deref(), Some("rest"));
    assert_eq!(calls[0].0, calls[1].0, "same chunk across its pages");
    assert_eq!(calls[2].1, None);

    assert_eq!(details.records.len(), 60);
}

#[tokio::test]
async fn unknown_ids_are_absent_not_errors() {
    let ids = vec!["id1".to_string(), "id2".to_string(), "id3".to_string()];
    let mut source = MockDetailSource::new();
    source.known_ids = Some(
        ["id1", "id3"]
            .iter()
            .map(|s| s.to_string())
            .collect::<HashSet<String>>(),
    );

    let details = collect_details_for_ids::<_, IdRecord>(&source, &ids).await;

    assert_eq!(details.records.len(), 2);
    assert!(!details.records.contains_key("id2"));
    assert!(details.failed_chunks.is_empty());
}
