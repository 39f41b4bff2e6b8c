// The NLP engine — word lists and lemma rules loaded once, passed by
// reference into every call.
//
// This is an explicit resource handle, not module-global state: `load` it
// at process start, hand out `&NlpEngine`, drop it at shutdown. Everything
// on it is read-only after load.

use std::collections::{HashMap, HashSet};

use stop_words::{get, LANGUAGE};

use super::denylist::Denylist;
use super::pipeline::CleaningPipeline;

/// Irregular forms the suffix rules would mangle.
const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("wolves", "wolf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("movies", "movie"),
    ("series", "series"),
    ("species", "species"),
    ("went", "go"),
];

/// Tokens shorter than this are noise ("ok", "gg", stray letters).
const MIN_TOKEN_CHARS: usize = 3;

/// Loaded NLP resources: stop words, lemma rules, and the injected
/// domain denylist.
pub struct NlpEngine {
    stop_words: HashSet<String>,
    lemma_exceptions: HashMap<&'static str, &'static str>,
    denylist: Denylist,
    min_token_chars: usize,
}

impl NlpEngine {
    /// Build the engine. English stop words come from the stop-words
    /// crate; the denylist is caller-supplied configuration.
    pub fn load(denylist: Denylist) -> Self {
        let stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();

        Self {
            stop_words,
            lemma_exceptions: LEMMA_EXCEPTIONS.iter().copied().collect(),
            denylist,
            min_token_chars: MIN_TOKEN_CHARS,
        }
    }

    /// Whitespace tokenization. Cleaning has already removed punctuation,
    /// so anything fancier would be re-deriving what the pipeline did.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Rule-based lemma folding: irregular table first, then plural and
    /// participle suffix rules. Approximate by design — good enough to
    /// merge "combos"/"combo" and "fighting"/"fight" in a term matrix.
    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.lemma_exceptions.get(token) {
            return (*lemma).to_string();
        }

        let n = token.chars().count();

        if n > 4 && token.ends_with("ies") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if token.ends_with("sses") {
            return token[..token.len() - 2].to_string();
        }
        if n > 4
            && (token.ends_with("shes")
                || token.ends_with("ches")
                || token.ends_with("xes")
                || token.ends_with("zes"))
        {
            return token[..token.len() - 2].to_string();
        }
        if n > 3
            && token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return token[..token.len() - 1].to_string();
        }
        if n > 5 && token.ends_with("ing") {
            return finish_stem(&token[..token.len() - 3]);
        }
        if n > 5 && token.ends_with("ed") {
            return finish_stem(&token[..token.len() - 2]);
        }

        token.to_string()
    }

    /// Drop stop words from a token stream.
    pub fn remove_stop_words(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| !self.is_stop_word(t))
            .collect()
    }

    /// The full chain: clean, tokenize, lemmatize, then drop stop words,
    /// short tokens, and denylisted domain terms.
    pub fn process(&self, text: &str, pipeline: &CleaningPipeline) -> Vec<String> {
        let cleaned = pipeline.apply(text);
        self.tokenize(&cleaned)
            .into_iter()
            .map(|t| self.lemmatize(&t))
            .filter(|t| !self.is_stop_word(t))
            .filter(|t| t.chars().count() >= self.min_token_chars)
            .filter(|t| !self.denylist.contains(t))
            .collect()
    }
}

/// Tidy a stem after stripping -ing/-ed: undo consonant doubling
/// ("runn" -> "run") and restore a trailing 'e' on short
/// consonant-vowel-consonant stems ("gam" -> "game").
fn finish_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    if n >= 2 && chars[n - 1] == chars[n - 2] && !is_vowel(chars[n - 1]) && chars[n - 1] != 'l' && chars[n - 1] != 's' {
        return chars[..n - 1].iter().collect();
    }

    if n >= 3 {
        let (a, b, c) = (chars[n - 3], chars[n - 2], chars[n - 1]);
        if !is_vowel(a) && is_vowel(b) && !is_vowel(c) && !matches!(c, 'w' | 'x' | 'y') {
            return format!("{stem}e");
        }
    }

    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
