use serde::{Deserialize, Serialize};

pub const FALLBACK_CATEGORY: &str = "General Knowledge";

const SUBJECT_AREAS: &[&str] = &[
    "History", "Science", "Technology", "Arts", "Music", "Literature", "Philosophy", "Religion",
    "Sports", "Politics", "Geography",
];

const TYPE_SUFFIXES: &[&str] = &["people", "places", "events", "concepts", "books", "films", "albums"];

// maintenance/tracking categories, matched as lowercase substrings
const MAINTENANCE_TERMS: &[&str] = &[
    "articles", "pages", "cs1", "use", "wikipedia", "webarchive", "with", "containing", "stub",
    "disambiguation",
];

const CATEGORY_PREFIX: &str = "Category:";

pub fn strip_namespace(tag: &str) -> &str {
    tag.strip_prefix(CATEGORY_PREFIX).unwrap_or(tag)
}

fn is_subject_area(tag: &str) -> bool {
    SUBJECT_AREAS.iter().any(|s| tag.starts_with(s))
}

fn has_type_suffix(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    TYPE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// True when the tag is not one of the wiki's housekeeping categories.
pub fn is_content_tag(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    !MAINTENANCE_TERMS.iter().any(|t| lower.contains(t))
}

/// Pick one representative label from namespace-stripped category tags.
///
/// Each rule is tried against every tag before the next rule is considered,
/// so a subject-area tag late in the list beats a type-suffix tag early on.
pub fn classify<S: AsRef<str>>(tags: &[S]) -> String {
    let rules: [fn(&str) -> bool; 3] = [is_subject_area, has_type_suffix, is_content_tag];
    let tags: Vec<&str> = tags.iter().map(|t| t.as_ref()).collect();

    rules
        .iter()
        .find_map(|rule| tags.iter().copied().find(|t| rule(t)))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

/// Category tags that describe the article's subject, used to bucket links.
pub fn main_topics<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && is_content_tag(t))
        .map(str::to_string)
        .collect()
}

/// Coarse subject used to pick an icon for a label or title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicIcon {
    History,
    Science,
    Art,
    Music,
    Film,
    Game,
    Health,
    Mind,
    Math,
    Space,
    Nature,
    Architecture,
    Person,
    Globe,
}

const ICON_KEYWORDS: &[(TopicIcon, &[&str])] = &[
    (TopicIcon::History, &["history", "war", "battle"]),
    (TopicIcon::Science, &["science", "physics", "chemistry"]),
    (TopicIcon::Art, &["art", "paint"]),
    (TopicIcon::Music, &["music", "song", "album"]),
    (TopicIcon::Film, &["film", "movie", "cinema"]),
    (TopicIcon::Game, &["game", "play"]),
    (TopicIcon::Health, &["health", "medical"]),
    (TopicIcon::Mind, &["philosophy", "psychology"]),
    (TopicIcon::Math, &["math", "calculation"]),
    (TopicIcon::Space, &["space", "astronomy"]),
    (TopicIcon::Nature, &["nature", "environment"]),
    (TopicIcon::Architecture, &["city", "architecture"]),
    (TopicIcon::Person, &["person", "biography"]),
];

pub fn topic_icon(text: &str) -> TopicIcon {
    let lower = text.to_lowercase();
    ICON_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(icon, _)| *icon)
        .unwrap_or(TopicIcon::Globe)
}
