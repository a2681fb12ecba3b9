use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Titles scoring above this are considered the same subject for selection.
pub const SIMILARITY_CUTOFF: f32 = 0.4;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());
static DETERMINER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(the|an|a) ").unwrap());
static QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) (in|of|at|during) ").unwrap());

/// Reduce a title to its base topic: digits dropped, leading determiners
/// stripped, everything from the first " in "/" of "/" at "/" during " cut.
///
/// `base_topic(base_topic(t)) == base_topic(t)` for every `t`.
pub fn base_topic(title: &str) -> String {
    let without_digits = DIGITS.replace_all(title, "");

    let mut rest: &str = &without_digits;
    // "The A ..." has to lose both words or a second pass would strip again
    while let Some(m) = DETERMINER.find(rest) {
        rest = &rest[m.end()..];
    }

    let head = match QUALIFIER.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    };
    head.trim().to_string()
}

fn topic_tokens(title: &str) -> Vec<String> {
    base_topic(title)
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word overlap of two titles' base topics in `[0, 1]`.
///
/// Overlap is counted as a multiset intersection so repeated words cannot
/// make the score depend on argument order.
pub fn title_similarity(a: &str, b: &str) -> f32 {
    let words_a = topic_tokens(a);
    let words_b = topic_tokens(b);
    let longest = words_a.len().max(words_b.len());
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let counts_a = words_a.iter().counts();
    let counts_b = words_b.iter().counts();
    let common: usize = counts_a
        .iter()
        .map(|(w, n)| (*n).min(counts_b.get(w).copied().unwrap_or(0)))
        .sum();

    common as f32 / longest as f32
}

pub fn too_similar(a: &str, b: &str) -> bool {
    title_similarity(a, b) > SIMILARITY_CUTOFF
}
