// Wire types for the MediaWiki action API, requested with formatversion=2
// (pages as an array, booleans as booleans).
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<Q> {
    pub query: Option<Q>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Vec<ApiSearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchHit {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesQuery {
    #[serde(default)]
    pub pages: Vec<ApiPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage {
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub categories: Vec<ApiTitle>,
    #[serde(default)]
    pub links: Vec<ApiTitle>,
    #[serde(default)]
    pub original: Option<ApiImage>,
    #[serde(default)]
    pub pageimage: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTitle {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomQuery {
    #[serde(default)]
    pub random: Vec<ApiTitle>,
}
