use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::grouping::LinkGroups;
use crate::models::RelationType;
use crate::similarity::too_similar;

/// Number of related articles shown under an article.
pub const MAX_RELATED: usize = 9;

/// A link picked for display, remembering which bucket it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub title: String,
    pub relation: RelationType,
}

fn is_eligible(candidate: &str, selected: &[Selection]) -> bool {
    selected
        .iter()
        .all(|s| s.title != candidate && !too_similar(&s.title, candidate))
}

/// Choose up to [`MAX_RELATED`] links spread across the three buckets.
///
/// One random pick per bucket seeds the set, then buckets take turns
/// contributing their first eligible link until the set is full or no
/// bucket has anything left. No two chosen titles are more than
/// [`crate::similarity::SIMILARITY_CUTOFF`] similar.
pub fn select_diverse<R: Rng + ?Sized>(groups: &LinkGroups, rng: &mut R) -> Vec<Selection> {
    if groups.is_empty() {
        debug!("No candidate links to select from");
        return Vec::new();
    }
    let mut selected: Vec<Selection> = Vec::with_capacity(MAX_RELATED);

    // 1) seed: one random pick per bucket
    for relation in RelationType::LINKED {
        let pool: Vec<&String> = groups
            .bucket(relation)
            .iter()
            .filter(|t| is_eligible(t, &selected))
            .collect();
        if let Some(title) = pool.choose(rng) {
            selected.push(Selection {
                title: (*title).clone(),
                relation,
            });
        }
    }
    let seeded = selected.len();

    // 2) fill: round-robin over the non-empty buckets
    let active: Vec<RelationType> = RelationType::LINKED
        .into_iter()
        .filter(|r| !groups.bucket(*r).is_empty())
        .collect();

    let mut progressed = true;
    while selected.len() < MAX_RELATED && progressed {
        progressed = false;
        for relation in &active {
            if selected.len() >= MAX_RELATED {
                break;
            }
            let next = groups
                .bucket(*relation)
                .iter()
                .find(|t| is_eligible(t, &selected))
                .cloned();
            if let Some(title) = next {
                selected.push(Selection {
                    title,
                    relation: *relation,
                });
                progressed = true;
            }
        }
    }

    debug!(
        "Selected related links - seeded={}, total={}, candidates={}",
        seeded,
        selected.len(),
        groups.len()
    );
    selected
}
