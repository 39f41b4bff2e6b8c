// Pure string -> string cleaning transforms.
//
// Each function is one step; ordering is the pipeline's concern. Comment
// text arrives as display HTML: entities like &quot; and &#39; are
// embedded, URLs and emoji are common, and contractions hide tokens from
// downstream matching ("isn't" never matches "not").

use std::sync::OnceLock;

use regex_lite::Regex;

/// Lower-case the whole text.
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Contractions expanded before stop-word removal. Specials first, so
/// "won't" never reaches the generic "n't" rule. Expects lowercased input.
const SPECIAL_CONTRACTIONS: &[(&str, &str)] = &[
    ("won't", "will not"),
    ("can't", "cannot"),
    ("shan't", "shall not"),
    ("ain't", "is not"),
    ("let's", "let us"),
    ("y'all", "you all"),
];

const SUFFIX_CONTRACTIONS: &[(&str, &str)] = &[
    ("n't", " not"),
    ("'re", " are"),
    ("'ve", " have"),
    ("'ll", " will"),
    ("'m", " am"),
    ("'d", " would"),
];

/// Expand common English contractions, e.g. "isn't" -> "is not".
///
/// Possessive "'s" is left alone — it is ambiguous with "is"/"has" and
/// gets stripped with the other punctuation later anyway.
pub fn expand_contractions(text: &str) -> String {
    // Typographic apostrophes first, so one table covers both forms.
    let mut text = text.replace('\u{2019}', "'");
    for (from, to) in SPECIAL_CONTRACTIONS {
        text = text.replace(from, to);
    }
    for (from, to) in SUFFIX_CONTRACTIONS {
        text = text.replace(from, to);
    }
    text
}

/// Decode HTML entities: the named ones YouTube actually emits plus
/// numeric `&#39;` / `&#x27;` forms. Unknown entities pass through
/// unchanged. Single pass, so "&amp;lt;" decodes to "&lt;", not "<".
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // An entity is short; cap the scan so stray ampersands are cheap.
        match tail[1..].char_indices().take(24).find(|(_, c)| *c == ';') {
            Some((semi, _)) => {
                let name = &tail[1..semi + 1];
                match decode_entity(name) {
                    Some(decoded) => {
                        out.push_str(&decoded);
                        rest = &tail[semi + 2..];
                    }
                    None => {
                        out.push('&');
                        rest = &tail[1..];
                    }
                }
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<String> {
    let named = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    };
    if let Some(c) = named {
        return Some(c.to_string());
    }

    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse().ok()?
    } else {
        return None;
    };
    char::from_u32(code).map(|c| c.to_string())
}

/// Unicode ranges dropped by [`strip_emoji`]: pictographs, symbols, flag
/// letters, variation selectors, and the zero-width joiner that glues
/// sequences together.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F000, 0x1F0FF), // mahjong, dominoes, playing cards
    (0x1F100, 0x1F1FF), // enclosed alphanumerics, regional indicators
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA00, 0x1FAFF), // extended-A
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
    (0x2B00, 0x2BFF),   // arrows, stars
    (0xFE00, 0xFE0F),   // variation selectors
    (0x200D, 0x200D),   // zero-width joiner
];

/// Drop emoji and related pictographic characters.
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !EMOJI_RANGES
                .iter()
                .any(|&(lo, hi)| (lo..=hi).contains(&code))
        })
        .collect()
}

/// Drop http(s) and bare www URLs.
pub fn strip_urls(text: &str) -> String {
    static URL: OnceLock<Regex> = OnceLock::new();
    let url = URL.get_or_init(|| Regex::new(r"(https?://|www\.)\S+").unwrap());
    url.replace_all(text, "").into_owned()
}

/// Drop everything that is not a word character or whitespace —
/// punctuation, special characters, the lot.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}

/// Drop digits.
pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_numeric()).collect()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
