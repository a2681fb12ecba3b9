use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::api_types::*;
use crate::config::Config;
use crate::error::TransportError;
use crate::models::{ImageSource, PageSummary, RawPage};

/// Read-only view of the wiki content API.
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Full-text search, best match first.
    async fn search(&self, query: &str) -> Result<Vec<String>, TransportError>;

    /// Plain-text extract, category tags and outbound links for one title.
    /// `Ok(None)` when the API returned no page entry at all.
    async fn page(&self, title: &str) -> Result<Option<RawPage>, TransportError>;

    async fn page_image(&self, title: &str) -> Result<Option<ImageSource>, TransportError>;

    /// Random main-namespace, non-redirect titles of at least `min_size` bytes.
    async fn random_titles(&self, count: u32, min_size: u32) -> Result<Vec<String>, TransportError>;

    /// Intro extracts and images for a batch of titles.
    async fn summaries(&self, titles: &[String]) -> Result<Vec<PageSummary>, TransportError>;
}

fn image_of(page: &ApiPage) -> Option<ImageSource> {
    page.original.as_ref().map(|o| ImageSource {
        url: o.source.clone(),
        caption: page.pageimage.clone().unwrap_or_default(),
    })
}

impl From<ApiPage> for RawPage {
    fn from(p: ApiPage) -> Self {
        let image = image_of(&p);
        RawPage {
            title: p.title,
            extract: p.extract,
            missing: p.missing || p.invalid,
            categories: p.categories.into_iter().map(|c| c.title).collect(),
            links: p.links.into_iter().map(|l| l.title).collect(),
            image,
        }
    }
}

impl From<ApiPage> for PageSummary {
    fn from(p: ApiPage) -> Self {
        let image = image_of(&p);
        PageSummary {
            title: p.title,
            extract: p.extract,
            missing: p.missing || p.invalid,
            image,
        }
    }
}

/// `WikiSource` backed by the MediaWiki action API over HTTP.
#[derive(Clone)]
pub struct WikiClient {
    http: Client,
    base: Url,
    link_limit: u32,
    category_limit: u32,
}

impl WikiClient {
    pub fn new(cfg: &Config) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base: Url::parse(&cfg.api_base)?,
            link_limit: cfg.link_limit,
            category_limit: cfg.category_limit,
        })
    }

    async fn query<Q: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<Q, TransportError> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        let start = std::time::Instant::now();
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("Wiki API error - status={}, url={}", status, url);
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: ApiResponse<Q> = resp.json().await?;
        debug!(
            "Wiki API call completed - duration={:.2}s, params={}",
            start.elapsed().as_secs_f32(),
            params.iter().map(|(k, v)| format!("{k}={v}")).join("&")
        );

        if let Some(err) = body.error {
            return Err(TransportError::Malformed {
                reason: format!("{}: {}", err.code, err.info),
            });
        }
        body.query.ok_or_else(|| TransportError::Malformed {
            reason: "response has no query section".to_string(),
        })
    }
}

#[async_trait]
impl WikiSource for WikiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, TransportError> {
        let q: SearchQuery = self
            .query(&[("list", "search".into()), ("srsearch", query.to_string())])
            .await?;
        Ok(q.search.into_iter().map(|h| h.title).collect())
    }

    async fn page(&self, title: &str) -> Result<Option<RawPage>, TransportError> {
        let q: PagesQuery = self
            .query(&[
                ("prop", "extracts|categories|links".into()),
                ("explaintext", "1".into()),
                ("exsectionformat", "plain".into()),
                ("exlimit", "1".into()),
                ("titles", title.to_string()),
                ("pllimit", self.link_limit.to_string()),
                ("cllimit", self.category_limit.to_string()),
            ])
            .await?;
        let page = q.pages.into_iter().next().map(RawPage::from);
        if let Some(p) = &page {
            debug!(
                "Fetched page - title={}, missing={}, extract_chars={}, categories={}, links={}",
                p.title,
                p.missing,
                p.extract.as_deref().map(|e| e.chars().count()).unwrap_or(0),
                p.categories.len(),
                p.links.len()
            );
        }
        Ok(page)
    }

    async fn page_image(&self, title: &str) -> Result<Option<ImageSource>, TransportError> {
        let q: PagesQuery = self
            .query(&[
                ("prop", "pageimages".into()),
                ("piprop", "original|name".into()),
                ("titles", title.to_string()),
            ])
            .await?;
        Ok(q.pages.first().and_then(image_of))
    }

    async fn random_titles(&self, count: u32, min_size: u32) -> Result<Vec<String>, TransportError> {
        let q: RandomQuery = self
            .query(&[
                ("list", "random".into()),
                ("rnnamespace", "0".into()),
                ("rnlimit", count.to_string()),
                ("rnminsize", min_size.to_string()),
                ("rnfilterredir", "nonredirects".into()),
            ])
            .await?;
        Ok(q.random.into_iter().map(|t| t.title).collect())
    }

    async fn summaries(&self, titles: &[String]) -> Result<Vec<PageSummary>, TransportError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let q: PagesQuery = self
            .query(&[
                ("prop", "extracts|pageimages".into()),
                ("exintro", "1".into()),
                ("explaintext", "1".into()),
                ("exlimit", "max".into()),
                ("piprop", "original|name".into()),
                ("titles", titles.iter().join("|")),
            ])
            .await?;
        info!("Fetched summaries - requested={}, returned={}", titles.len(), q.pages.len());
        Ok(q.pages.into_iter().map(PageSummary::from).collect())
    }
}
