use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;

use ringside::config::Config;
use ringside::output::{csv, terminal};
use ringside::pipeline;
use ringside::text::engine::NlpEngine;
use ringside::text::pipeline::CleaningPipeline;
use ringside::topics::terms::{topic_word_sets, TrainedTopics};
use ringside::youtube::client::{YouTubeClient, MAX_PAGE_SIZE};
use ringside::youtube::fetchers::SearchQuery;

/// Ringside: topic mining for fighting-game YouTube communities.
///
/// Collects video metadata and comments for a franchise, cleans the text,
/// and prepares per-topic term listings for topic modeling.
#[derive(Parser)]
#[command(name = "ringside", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect video metadata for a channel and date range
    Videos {
        /// Channel to search
        #[arg(long)]
        channel_id: String,

        /// Start of the window, RFC 3339 (e.g. 2023-01-01T00:00:00Z)
        #[arg(long)]
        published_after: String,

        /// End of the window, RFC 3339
        #[arg(long)]
        published_before: String,

        /// Search term to narrow the listing (supports | for OR, - for NOT)
        #[arg(long)]
        query: Option<String>,

        /// Keep only videos whose title mentions this term (e.g. tekken)
        #[arg(long)]
        title_filter: Option<String>,

        /// Stop after this many search pages (safety valve)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Output CSV path
        #[arg(long, default_value = "videos.csv")]
        out: PathBuf,
    },

    /// Collect comment threads for one or more videos
    Comments {
        /// Video id (repeat for multiple videos)
        #[arg(long = "video-id", required = true)]
        video_ids: Vec<String>,

        /// Also write a cleaned, tokenized export alongside the raw one
        #[arg(long)]
        clean: bool,

        /// Stop after this many thread pages per video (safety valve)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Output CSV path
        #[arg(long, default_value = "comments.csv")]
        out: PathBuf,
    },

    /// Show the heaviest terms per topic from a trained model
    Topics {
        /// JSON file with the fitted vocabulary and components matrix
        #[arg(long)]
        weights: PathBuf,

        /// How many terms to show per topic
        #[arg(long, default_value = "10")]
        top_words: usize,

        /// Also export the listing as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ringside=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Videos {
            channel_id,
            published_after,
            published_before,
            query,
            title_filter,
            max_pages,
            out,
        } => {
            let config = Config::load()?;
            config.require_api_key()?;
            let client = YouTubeClient::new(&config.api_url, &config.api_key)?;

            let search_query = SearchQuery {
                channel_id,
                published_after: parse_instant(&published_after, "--published-after")?,
                published_before: parse_instant(&published_before, "--published-before")?,
                search_term: query,
                page_size: MAX_PAGE_SIZE,
            };

            let harvest =
                pipeline::videos::run(&client, &search_query, title_filter.as_deref(), max_pages)
                    .await?;

            terminal::display_video_summary(&harvest.records);
            terminal::display_failed_chunks(&harvest.failed_chunks);

            csv::write_records(&out, &harvest.records)?;
            println!(
                "{}",
                format!("{} videos written to {}", harvest.records.len(), out.display()).bold()
            );
        }

        Commands::Comments {
            video_ids,
            clean,
            max_pages,
            out,
        } => {
            let config = Config::load()?;
            config.require_api_key()?;
            let client = YouTubeClient::new(&config.api_url, &config.api_key)?;

            println!("Collecting comments for {} video(s)...", video_ids.len());
            let harvest = pipeline::comments::run(&client, &video_ids, max_pages).await?;

            terminal::display_comment_summary(&harvest.records, 10);
            for (video_id, error) in &harvest.failures {
                println!(
                    "{}",
                    format!("  {video_id}: {error}").bright_red()
                );
            }

            csv::write_records(&out, &harvest.records)?;
            println!(
                "{}",
                format!(
                    "{} comments written to {}",
                    harvest.records.len(),
                    out.display()
                )
                .bold()
            );

            if clean {
                let engine = NlpEngine::load(config.load_denylist()?);
                let cleaning = CleaningPipeline::standard();
                let processed =
                    pipeline::comments::process_comments(&engine, &cleaning, &harvest.records);

                let processed_path = out.with_extension("processed.csv");
                csv::write_records(&processed_path, &processed)?;
                println!(
                    "{}",
                    format!(
                        "{} cleaned comments written to {}",
                        processed.len(),
                        processed_path.display()
                    )
                    .bold()
                );
            }
        }

        Commands::Topics {
            weights,
            top_words,
            out,
        } => {
            let trained = TrainedTopics::from_file(&weights)?;
            let sets = topic_word_sets(&trained, top_words);

            terminal::display_topics(&sets);

            if let Some(path) = out {
                csv::write_records(&path, &sets)?;
                println!(
                    "{}",
                    format!("{} topics written to {}", sets.len(), path.display()).bold()
                );
            }
        }
    }

    Ok(())
}

fn parse_instant(value: &str, flag: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{flag} must be an RFC 3339 instant, e.g. 2023-01-01T00:00:00Z"))
}
