use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::text::denylist::Denylist;

/// Central configuration loaded from environment variables.
///
/// The API key comes from the environment (never hardcoded). The .env
/// file is loaded automatically at startup via dotenvy.
pub struct Config {
    pub api_key: String,
    /// YouTube Data API base URL (defaults to the public endpoint;
    /// override for tests or a proxy).
    pub api_url: String,
    /// Optional path to a versioned denylist file; the compiled-in roster
    /// list is used when unset.
    pub denylist_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only the key is required, and only for commands that hit the API —
    /// `topics` works offline.
    pub fn load() -> Result<Self> {
        Ok(Self {
            api_key: env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            api_url: env::var("YOUTUBE_API_URL")
                .unwrap_or_else(|_| crate::youtube::client::DEFAULT_API_URL.to_string()),
            denylist_path: env::var("RINGSIDE_DENYLIST").ok().map(PathBuf::from),
        })
    }

    /// Check that the API key is configured. Call before any collection
    /// command.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "YOUTUBE_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// The denylist to inject into the text engine: the configured file
    /// if one is set, otherwise the compiled-in roster terms.
    pub fn load_denylist(&self) -> Result<Denylist> {
        match &self.denylist_path {
            Some(path) => Denylist::from_file(path),
            None => Ok(Denylist::default_terms()),
        }
    }
}
