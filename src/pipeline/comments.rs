// Comment harvest: drain every video's comment threads, merge into one
// text-keyed set, optionally clean the survivors into token lists.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::collect::collector::{collect, CollectOptions, CollectionError};
use crate::collect::records::CommentRecord;
use crate::output::csv::CsvRecord;
use crate::text::engine::NlpEngine;
use crate::text::pipeline::CleaningPipeline;
use crate::youtube::client::YouTubeClient;
use crate::youtube::fetchers::CommentThreadsFetcher;

/// Result of a comment harvest across one or more videos.
pub struct CommentHarvest {
    /// Comments deduplicated by display text, ascending publish time.
    pub records: Vec<CommentRecord>,
    /// Videos whose thread listing failed; the rest are unaffected.
    pub failures: Vec<(String, CollectionError)>,
}

/// Drain comment threads for every video, merging by display text across
/// videos — the same last-write-wins rule pagination applies within one
/// listing. A failed video is reported and skipped.
pub async fn run(
    client: &YouTubeClient,
    video_ids: &[String],
    max_pages: Option<usize>,
) -> Result<CommentHarvest> {
    let mut merged: HashMap<String, CommentRecord> = HashMap::new();
    let mut failures = Vec::new();

    let pb = ProgressBar::new(video_ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Comments [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    for video_id in video_ids {
        let fetcher = CommentThreadsFetcher { client, video_id };
        let options = CollectOptions {
            max_pages,
            cancel: None,
        };

        match collect::<_, CommentRecord>(&fetcher, &options).await {
            Ok(collection) => {
                info!(
                    video = %video_id,
                    comments = collection.records.len(),
                    pages = collection.pages_fetched,
                    "Collected comment threads"
                );
                for record in collection.records {
                    merged.insert(record.text.clone(), record);
                }
            }
            Err(error) => {
                warn!(video = %video_id, error = %error, "Comment listing failed, skipping video");
                failures.push((video_id.clone(), error));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut records: Vec<CommentRecord> = merged.into_values().collect();
    records.sort_by_key(|r| r.published_at);

    Ok(CommentHarvest { records, failures })
}

/// A comment reduced to its cleaned token list.
pub struct ProcessedComment {
    pub video_id: String,
    pub published_at: DateTime<Utc>,
    pub tokens: Vec<String>,
}

impl CsvRecord for ProcessedComment {
    fn header() -> &'static [&'static str] {
        &["videoId", "publishedAt", "tokens"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.video_id.clone(),
            self.published_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.tokens.join(" "),
        ]
    }
}

/// Clean every comment into tokens, dropping comments that clean away to
/// nothing (pure emoji, links, stop words).
pub fn process_comments(
    engine: &NlpEngine,
    pipeline: &CleaningPipeline,
    records: &[CommentRecord],
) -> Vec<ProcessedComment> {
    records
        .iter()
        .filter_map(|record| {
            let tokens = engine.process(&record.text, pipeline);
            if tokens.is_empty() {
                None
            } else {
                Some(ProcessedComment {
                    video_id: record.video_id.clone(),
                    published_at: record.published_at,
                    tokens,
                })
            }
        })
        .collect()
}
