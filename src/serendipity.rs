use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::category::topic_icon;
use crate::models::{ImageRef, PageSummary, RelatedArticle, RelationType};
use crate::select::MAX_RELATED;

/// Raw extracts this short are not worth summarising.
pub const MIN_RAW_EXTRACT: usize = 50;
/// Shortest first sentence still shown as a teaser.
pub const MIN_TEASER: usize = 20;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?](\s|$)").unwrap());

/// Text up to the first sentence terminator, closed with a period.
pub fn first_sentence(extract: &str) -> String {
    let head = match SENTENCE_END.find(extract) {
        Some(m) => &extract[..m.start()],
        None => extract,
    };
    format!("{}.", head)
}

/// First sentence of a summary if it is substantive enough to display.
pub fn teaser(summary: &PageSummary) -> Option<String> {
    if summary.missing {
        return None;
    }
    let extract = summary.extract.as_deref()?;
    if extract.chars().count() <= MIN_RAW_EXTRACT {
        return None;
    }
    let sentence = first_sentence(extract);
    (sentence != "." && sentence.chars().count() >= MIN_TEASER).then_some(sentence)
}

pub fn related_article(
    summary: &PageSummary,
    relation: RelationType,
    image: Option<ImageRef>,
) -> Option<RelatedArticle> {
    let extract = teaser(summary)?;
    Some(RelatedArticle {
        icon: topic_icon(&summary.title),
        title: summary.title.clone(),
        extract,
        image,
        relation,
    })
}

fn missing_linked_type(articles: &[RelatedArticle]) -> bool {
    RelationType::LINKED
        .iter()
        .any(|r| !articles.iter().any(|a| a.relation == *r))
}

/// Top up `related` with random articles until it holds [`MAX_RELATED`]
/// entries or the pool runs out.
///
/// When one of the link-derived types has no survivor at all, one
/// serendipity entry is appended before the general top-up so the gap is
/// visibly filled.
pub fn fill(mut related: Vec<RelatedArticle>, pool: &[PageSummary]) -> Vec<RelatedArticle> {
    let mut seen: HashSet<String> = related.iter().map(|a| a.title.clone()).collect();
    let mut candidates = pool
        .iter()
        .filter_map(|p| related_article(p, RelationType::Serendipity, None))
        .filter(|a| seen.insert(a.title.clone()));

    let before = related.len();
    if missing_linked_type(&related) {
        if let Some(first) = candidates.next() {
            related.push(first);
        }
    }
    while related.len() < MAX_RELATED {
        match candidates.next() {
            Some(a) => related.push(a),
            None => break,
        }
    }

    debug!(
        "Serendipity fill - before={}, after={}, pool={}, leftover={}",
        before,
        related.len(),
        pool.len(),
        candidates.count()
    );
    related
}
