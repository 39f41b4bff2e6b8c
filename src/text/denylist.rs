// Domain-term denylist.
//
// Character names and the franchise name dominate every comment and drown
// out actual discussion topics, so they are filtered out of the token
// stream. The list is configuration, injected once into the engine —
// call sites never carry their own copy, so the list cannot drift between
// pipeline stages.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Roster and franchise terms shipped as the built-in default. Override
/// with a versioned file via the `RINGSIDE_DENYLIST` environment variable.
const DEFAULT_TERMS: &[&str] = &[
    "tekken", "jin", "kazuya", "heihachi", "jun", "xiaoyu", "hwoarang", "lee", "lars", "alisa",
    "asuka", "lili", "leroy", "paul", "law", "king", "yoshimitsu", "nina", "steve", "bryan",
    "jack", "azucena", "victor", "reina", "zafina", "claudio", "shaheen", "dragunov", "eddy",
    "lidia", "panda", "kuma", "devil", "kazama", "mishima",
];

/// A set of lowercased terms to drop from the token stream.
#[derive(Debug, Clone)]
pub struct Denylist {
    terms: HashSet<String>,
}

impl Denylist {
    pub fn empty() -> Self {
        Self {
            terms: HashSet::new(),
        }
    }

    /// The compiled-in roster list.
    pub fn default_terms() -> Self {
        Self::from_terms(DEFAULT_TERMS.iter().copied())
    }

    pub fn from_terms<'a, I>(terms: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Load one term per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read denylist {}", path.display()))?;
        let terms = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Ok(Self::from_terms(terms))
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
