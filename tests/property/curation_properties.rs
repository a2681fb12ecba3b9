use encyclopedian::category::{classify, is_content_tag, FALLBACK_CATEGORY};
use encyclopedian::grouping::{group_links, is_rejected_link};
use encyclopedian::models::RawPage;
use encyclopedian::select::{select_diverse, MAX_RELATED};
use encyclopedian::similarity::{base_topic, title_similarity, SIMILARITY_CUTOFF};
use encyclopedian::validate::is_valid_article;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

// Title-like strings: words, digits, determiners and qualifiers mixed in.
fn title() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        "[A-Z][a-z]{1,7}",
        Just("The".to_string()),
        Just("a".to_string()),
        Just("An".to_string()),
        Just("of".to_string()),
        Just("in".to_string()),
        Just("during".to_string()),
        "[0-9]{1,4}",
    ];
    prop::collection::vec(word, 0..6).prop_map(|ws| ws.join(" "))
}

fn link() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => title(),
        1 => title().prop_map(|t| format!("Template:{t}")),
        1 => title().prop_map(|t| format!("{t} (disambiguation)")),
    ]
}

proptest! {
    #[test]
    fn base_topic_is_idempotent(t in title()) {
        let once = base_topic(&t);
        prop_assert_eq!(base_topic(&once), once);
    }

    #[test]
    fn base_topic_is_idempotent_on_arbitrary_text(t in ".{0,40}") {
        let once = base_topic(&t);
        prop_assert_eq!(base_topic(&once), once);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(a in title(), b in title()) {
        let ab = title_similarity(&a, &b);
        let ba = title_similarity(&b, &a);
        prop_assert_eq!(ab, ba);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn self_similarity_is_one_for_non_empty_topics(t in "[A-Z][a-z]{2,8}( [a-z]{2,8}){0,3}") {
        prop_assert_eq!(title_similarity(&t, &t), 1.0);
    }

    #[test]
    fn grouping_is_a_partition(source in title(), links in prop::collection::vec(link(), 0..30)) {
        let topics = vec!["Physics".to_string()];
        let groups = group_links(&source, &topics, &links);

        let surviving: Vec<&String> = links.iter().filter(|l| !is_rejected_link(l)).collect();
        prop_assert_eq!(groups.len(), surviving.len());

        let mut seen: Vec<&String> = groups.direct.iter()
            .chain(groups.related.iter())
            .chain(groups.broader.iter())
            .collect();
        let mut expected = surviving.clone();
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);

        // the same title always lands in the same bucket, so buckets are
        // disjoint even when upstream repeats a link
        let direct: HashSet<&String> = groups.direct.iter().collect();
        let related: HashSet<&String> = groups.related.iter().collect();
        let broader: HashSet<&String> = groups.broader.iter().collect();
        prop_assert!(direct.is_disjoint(&related));
        prop_assert!(direct.is_disjoint(&broader));
        prop_assert!(related.is_disjoint(&broader));
    }

    #[test]
    fn selection_is_bounded_unique_and_diverse(
        source in title(),
        links in prop::collection::vec(title(), 0..40),
        seed in any::<u64>(),
    ) {
        let topics = vec!["Physics".to_string()];
        let groups = group_links(&source, &topics, &links);
        let picked = select_diverse(&groups, &mut StdRng::seed_from_u64(seed));

        prop_assert!(picked.len() <= MAX_RELATED);
        let unique: HashSet<&str> = picked.iter().map(|s| s.title.as_str()).collect();
        prop_assert_eq!(unique.len(), picked.len());
        for (i, a) in picked.iter().enumerate() {
            for b in &picked[i + 1..] {
                prop_assert!(title_similarity(&a.title, &b.title) <= SIMILARITY_CUTOFF);
            }
            prop_assert!(groups.bucket(a.relation).contains(&a.title));
        }
    }

    #[test]
    fn fallback_iff_no_tag_qualifies(tags in prop::collection::vec(prop_oneof![
        "[A-Za-z ]{1,20}",
        Just("Articles with short description".to_string()),
        Just("History of Science".to_string()),
        Just("Living people".to_string()),
        Just("All stub articles".to_string()),
    ], 0..6)) {
        let label = classify(&tags);
        let qualifies = tags.iter().any(|t| {
            let lower = t.to_lowercase();
            let subject = ["History", "Science", "Technology", "Arts", "Music", "Literature",
                "Philosophy", "Religion", "Sports", "Politics", "Geography"]
                .iter().any(|s| t.starts_with(s));
            let suffix = ["people", "places", "events", "concepts", "books", "films", "albums"]
                .iter().any(|s| lower.ends_with(s));
            subject || suffix || is_content_tag(t)
        });
        if !qualifies {
            prop_assert_eq!(label, FALLBACK_CATEGORY);
        } else if !tags.iter().any(|t| t == FALLBACK_CATEGORY) {
            prop_assert_ne!(label, FALLBACK_CATEGORY);
        }
    }

    #[test]
    fn short_extracts_are_never_valid(len in 0usize..100, title in "[A-Z][a-z]{3,10}") {
        let page = RawPage {
            title,
            extract: Some("x".repeat(len)),
            ..RawPage::default()
        };
        prop_assert!(!is_valid_article(Some(&page)));
    }
}
