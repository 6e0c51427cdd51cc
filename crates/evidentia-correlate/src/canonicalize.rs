//! Name canonicalization (spec §4.8.1): a pure, deterministic function from
//! a raw entity string to a comparison key and a display form.

use regex::Regex;
use std::sync::OnceLock;

const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "prof", "sir", "madam", "rev",
];

fn punctuation_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.,;:'\u{201c}\u{201d}\u{2018}\u{2019}]").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// The canonicalized form of an entity name: a case-insensitive comparison
/// key plus a display form suitable for a `CorrelationRecord.entity_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub key: String,
    pub display: String,
    /// An additional key an AI-disambiguation pass may also match against,
    /// present only for initialed names ("S. Johnson" → key also includes
    /// the bare-surname form so an expansion candidate can be matched).
    pub loose_key: Option<String>,
}

/// Strips punctuation and honorifics, collapses whitespace, and derives a
/// case-insensitive key while preserving a display form (spec §4.8.1).
pub fn canonicalize(raw: &str) -> Canonical {
    let stripped = punctuation_pattern().replace_all(raw, "");
    let collapsed = whitespace_pattern().replace_all(stripped.trim(), " ");
    let words: Vec<&str> = collapsed
        .split(' ')
        .filter(|w| !w.is_empty() && !HONORIFICS.contains(&w.to_ascii_lowercase().as_str()))
        .collect();

    let display = words.join(" ");
    let key = display.to_ascii_lowercase();
    let loose_key = loose_initial_key(&words);

    Canonical { key, display, loose_key }
}

/// For a name whose last token looks like "S." or "S" preceded by a given
/// name, or whose first token is a bare initial ("S. Johnson"), returns a
/// surname-only key so a later expansion ("Sarah Johnson") can be matched
/// by an AI disambiguation pass (spec §4.8.1 "normalize initials").
fn loose_initial_key(words: &[&str]) -> Option<String> {
    if words.len() < 2 {
        return None;
    }
    let first = words[0];
    let is_initial = first.chars().count() == 1
        || (first.chars().count() == 2 && first.ends_with('.'));
    if is_initial {
        return Some(words[1..].join(" ").to_ascii_lowercase());
    }
    None
}
