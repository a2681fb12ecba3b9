use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::TopicIcon;

/// One page as returned by the content query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    pub title: String,
    pub extract: Option<String>, // plain text, paragraphs separated by blank lines
    pub missing: bool,
    pub categories: Vec<String>, // raw tags, still "Category:"-prefixed
    pub links: Vec<String>,
    pub image: Option<ImageSource>,
}

/// Image as reported by the page-image query, before a crop hint is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub url: String,
    pub caption: String, // page-image file name
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub caption: String,
    pub position: String, // CSS object-position style hint, e.g. "center 25%"
}

/// How a related article relates to the article it is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Direct,
    Related,
    Broader,
    Serendipity,
}

impl RelationType {
    pub const LINKED: [RelationType; 3] =
        [RelationType::Direct, RelationType::Related, RelationType::Broader];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::Direct => "direct",
            RelationType::Related => "related",
            RelationType::Broader => "broader",
            RelationType::Serendipity => "serendipity",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intro extract and image for one title, from the batched summary query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub extract: Option<String>,
    pub missing: bool,
    pub image: Option<ImageSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub title: String,
    pub extract: String, // first sentence only
    pub image: Option<ImageRef>,
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub icon: TopicIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleViewModel {
    pub title: String,
    pub definition: String,
    pub image: Option<ImageRef>,
    pub category: String,
    pub category_icon: TopicIcon,
    pub related_articles: Vec<RelatedArticle>, // at most 9
}

impl ArticleViewModel {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.definition
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
