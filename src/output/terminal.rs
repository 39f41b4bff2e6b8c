// Colored terminal output for collection summaries and topic listings.
//
// All terminal-specific formatting lives here; main.rs delegates.

use colored::Colorize;

use crate::collect::collector::FailedChunk;
use crate::collect::records::{CommentRecord, VideoRecord};
use crate::topics::terms::TopicWordSet;

use super::truncate_chars;

/// Show the collected videos, newest last (the export order).
pub fn display_video_summary(records: &[VideoRecord]) {
    if records.is_empty() {
        println!("No videos collected.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Collected Videos ({}) ===", records.len()).bold()
    );
    println!();
    println!(
        "  {:<12} {:>10} {:>8}  {}",
        "Published".dimmed(),
        "Views".dimmed(),
        "Comments".dimmed(),
        "Title".dimmed(),
    );

    for record in records {
        println!(
            "  {:<12} {:>10} {:>8}  {}",
            record.published_at.format("%Y-%m-%d").to_string(),
            record.view_count,
            record.comment_count,
            truncate_chars(&record.title, 60),
        );
    }
    println!();
}

/// Show a sample of collected comments.
pub fn display_comment_summary(records: &[CommentRecord], sample: usize) {
    println!(
        "\n{}",
        format!("=== Collected Comments ({} unique) ===", records.len()).bold()
    );
    println!();

    for record in records.iter().take(sample) {
        println!(
            "  {} {}",
            format!("[{}]", record.published_at.format("%Y-%m-%d")).dimmed(),
            truncate_chars(&record.text, 80),
        );
    }
    if records.len() > sample {
        println!("  {}", format!("... and {} more", records.len() - sample).dimmed());
    }
    println!();
}

/// Show the top terms per topic.
pub fn display_topics(sets: &[TopicWordSet]) {
    if sets.is_empty() {
        println!("No topics in the weights file.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topic Terms ({} topics) ===", sets.len()).bold()
    );
    println!();

    for set in sets {
        println!(
            "  {:>3}. {}",
            set.topic + 1,
            set.terms.join(", ").bright_green()
        );
    }
    println!();
}

/// Report detail chunks that failed, after the partial results.
pub fn display_failed_chunks(failed: &[FailedChunk]) {
    if failed.is_empty() {
        return;
    }

    println!(
        "{}",
        format!("{} detail chunk(s) failed:", failed.len()).bright_red()
    );
    for chunk in failed {
        println!(
            "  chunk {} ({} ids): {}",
            chunk.index,
            chunk.ids.len(),
            chunk.error,
        );
    }
    println!("{}", "Re-run to fill in the missing records.".dimmed());
}
