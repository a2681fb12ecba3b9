use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::RelationType;
use crate::similarity::base_topic;

static NON_ARTICLE_NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(Wikipedia|Template|Category|Portal|Draft|File|Help|Module|Special):").unwrap()
});

/// Outbound links of one article, partitioned by how they relate to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGroups {
    pub direct: Vec<String>,
    pub related: Vec<String>,
    pub broader: Vec<String>,
}

impl LinkGroups {
    pub fn bucket(&self, relation: RelationType) -> &[String] {
        match relation {
            RelationType::Direct => &self.direct,
            RelationType::Related => &self.related,
            RelationType::Broader => &self.broader,
            RelationType::Serendipity => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.direct.len() + self.related.len() + self.broader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Links that are not worth suggesting at all: other namespaces,
/// disambiguation pages and redirects.
pub fn is_rejected_link(title: &str) -> bool {
    NON_ARTICLE_NAMESPACE.is_match(title)
        || title.contains("disambiguation")
        || title.contains("Redirect")
}

/// Bucket for a single surviving link: containing the base topic wins over
/// containing a main topic. An empty base topic is contained in every link.
pub fn relation_of(link: &str, topic: &str, main_topics: &[String]) -> RelationType {
    if link.contains(topic) {
        RelationType::Direct
    } else if main_topics.iter().any(|t| link.contains(t.as_str())) {
        RelationType::Related
    } else {
        RelationType::Broader
    }
}

pub fn group_links<S: AsRef<str>>(title: &str, main_topics: &[String], links: &[S]) -> LinkGroups {
    let topic = base_topic(title);
    let mut groups = LinkGroups::default();
    let mut rejected = 0usize;

    for link in links.iter().map(|l| l.as_ref()) {
        if is_rejected_link(link) {
            rejected += 1;
            continue;
        }
        let bucket = match relation_of(link, &topic, main_topics) {
            RelationType::Direct => &mut groups.direct,
            RelationType::Related => &mut groups.related,
            _ => &mut groups.broader,
        };
        bucket.push(link.to_string());
    }

    debug!(
        "Grouped links - title={}, base_topic={:?}, direct={}, related={}, broader={}, rejected={}",
        title,
        topic,
        groups.direct.len(),
        groups.related.len(),
        groups.broader.len(),
        rejected
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{classify, main_topics, strip_namespace};

    #[test]
    fn rejects_other_namespaces_and_disambiguation() {
        assert!(is_rejected_link("Template:Infobox"));
        assert!(is_rejected_link("category:Physics"));
        assert!(is_rejected_link("Mercury (disambiguation)"));
        assert!(is_rejected_link("Redirect to Physics"));
        assert!(!is_rejected_link("Filesystem"));
        assert!(!is_rejected_link("Marie Curie"));
    }

    #[test]
    fn history_of_science_scenario() {
        let raw = ["Category:History of Science", "Category:Articles with short description"];
        let tags: Vec<&str> = raw.iter().map(|t| strip_namespace(t)).collect();
        assert_eq!(classify(&tags), "History of Science");

        let topics = main_topics(&tags);
        let links = ["History of Physics", "Marie Curie", "Nobel Prize"];
        let groups = group_links("History of Science", &topics, &links);

        // base topic of "History of Science" is "History"
        assert_eq!(groups.direct, vec!["History of Physics".to_string()]);
        assert!(groups.related.is_empty());
        assert_eq!(groups.broader, vec!["Marie Curie".to_string(), "Nobel Prize".to_string()]);
    }

    #[test]
    fn main_topic_substring_makes_related() {
        let topics = vec!["Nobel laureates in Physics".to_string(), "Physics".to_string()];
        let links = ["Curie family", "Experimental Physics", "Warsaw"];
        let groups = group_links("Marie Curie", &topics, &links);
        assert_eq!(groups.direct, Vec::<String>::new());
        assert_eq!(groups.related, vec!["Experimental Physics".to_string()]);
        assert_eq!(groups.broader, vec!["Curie family".to_string(), "Warsaw".to_string()]);
    }

    #[test]
    fn empty_base_topic_matches_every_link() {
        let groups = group_links("1984", &[], &["George Orwell", "Big Brother"]);
        assert_eq!(groups.direct, vec!["George Orwell".to_string(), "Big Brother".to_string()]);
        assert!(groups.broader.is_empty());
    }

    #[test]
    fn leading_determiner_does_not_become_the_topic() {
        let links = ["Theatre", "The Beatles", "In Crowd (song)"];
        let groups = group_links("The In Crowd", &[], &links);
        assert_eq!(groups.direct, vec!["In Crowd (song)".to_string()]);
        assert_eq!(groups.broader, vec!["Theatre".to_string(), "The Beatles".to_string()]);
    }

    #[test]
    fn keeps_upstream_order_within_bucket() {
        let links = ["Rivers of Peru", "Amazon basin", "Amazon River tributaries", "Lima"];
        let groups = group_links("Amazon River", &[], &links);
        assert_eq!(groups.direct, vec!["Amazon River tributaries".to_string()]);
        assert_eq!(
            groups.broader,
            vec!["Rivers of Peru".to_string(), "Amazon basin".to_string(), "Lima".to_string()]
        );
        assert_eq!(groups.len(), 4);
    }
}
