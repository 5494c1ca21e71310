//! Name canonicalization used for alias lookup and collaborator dedup.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Affiliation marks rendered upstream, e.g. `J. Smith<sup>*</sup>`.
static SUPERSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<sup>.*?</sup>").expect("valid superscript regex"));

/// Canonical comparison key for a free-text name.
///
/// Lowercases, folds diacritics to base Latin letters, turns punctuation into
/// separators, collapses whitespace and trims. Total: any input yields a key,
/// and the empty key never matches anything.
///
/// ```
/// use labdata_core::normalize_name;
///
/// assert_eq!(normalize_name("A. Smith"), normalize_name("a smith"));
/// assert_eq!(normalize_name("É. Lopez-Pérez"), "e lopez perez");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let without_marks = SUPERSCRIPT_RE.replace_all(raw, " ");
    let lowered = without_marks.to_lowercase();

    let mut spaced = String::with_capacity(lowered.len());
    for c in lowered.nfkd().filter(|c| !is_combining_mark(*c)) {
        if let Some(folded) = fold_letter(c) {
            spaced.push_str(folded);
        } else if c.is_alphanumeric() {
            spaced.push(c);
        } else if is_elided(c) {
            continue;
        } else {
            spaced.push(' ');
        }
    }

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Last whitespace token of an already-normalized key (surname heuristic).
pub fn last_token(key: &str) -> Option<&str> {
    key.split_whitespace().next_back()
}

// Letters with no canonical decomposition into base letter + mark.
fn fold_letter(c: char) -> Option<&'static str> {
    match c {
        'ø' => Some("o"),
        'ł' => Some("l"),
        'đ' | 'ð' => Some("d"),
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ı' => Some("i"),
        'þ' => Some("th"),
        _ => None,
    }
}

// Apostrophes and grouping braces vanish instead of splitting a token.
fn is_elided(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '`' | '{' | '}')
}
