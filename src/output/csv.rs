// Flat CSV export — header row plus one row per deduplicated record.
//
// The dataset is regenerated wholesale each run, so there is no schema
// versioning, no append mode. Quoting follows the usual rule: a field
// containing a delimiter, quote, or newline is wrapped in quotes with
// inner quotes doubled.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::collect::records::{CommentRecord, VideoRecord};
use crate::topics::terms::TopicWordSet;

/// Anything exportable as one CSV row under a fixed header.
pub trait CsvRecord {
    fn header() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// Write a header row plus one row per record.
pub fn write_records<R: CsvRecord>(path: &Path, records: &[R]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", R::header().join(","))?;
    for record in records {
        let row: Vec<String> = record.row().iter().map(|f| escape_field(f)).collect();
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))
}

/// Quote a field when it would otherwise break the row.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl CsvRecord for VideoRecord {
    fn header() -> &'static [&'static str] {
        &[
            "videoId",
            "title",
            "description",
            "channelId",
            "channelTitle",
            "publishedAt",
            "tags",
            "viewCount",
            "likeCount",
            "commentCount",
            "favoriteCount",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.video_id.clone(),
            self.title.clone(),
            self.description.clone(),
            self.channel_id.clone(),
            self.channel_title.clone(),
            timestamp(self.published_at),
            // Absent tags export as an empty field, not a missing column.
            self.tags.as_ref().map(|t| t.join("|")).unwrap_or_default(),
            self.view_count.to_string(),
            self.like_count.to_string(),
            self.comment_count.to_string(),
            self.favorite_count.to_string(),
        ]
    }
}

impl CsvRecord for CommentRecord {
    fn header() -> &'static [&'static str] {
        &[
            "videoId",
            "author",
            "publishedAt",
            "updatedAt",
            "likeCount",
            "replyCount",
            "text",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.video_id.clone(),
            self.author.clone(),
            timestamp(self.published_at),
            timestamp(self.updated_at),
            self.like_count.to_string(),
            self.reply_count.to_string(),
            self.text.clone(),
        ]
    }
}

impl CsvRecord for TopicWordSet {
    fn header() -> &'static [&'static str] {
        &["topic", "terms"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.topic.to_string(), self.terms.join(" ")]
    }
}
