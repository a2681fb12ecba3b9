use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

use crate::category::{classify, main_topics, strip_namespace, topic_icon};
use crate::config::Config;
use crate::error::{CurationError, CurationResult, TransportError};
use crate::fetch::{WikiClient, WikiSource};
use crate::grouping::group_links;
use crate::image_cache::{CropHintProvider, DefaultCropHint, ImagePositionCache};
use crate::models::{ArticleViewModel, ImageRef, PageSummary, RawPage, RelatedArticle, RelationType};
use crate::retry::{AttemptOutcome, Decision, Retrier, RetryPolicy};
use crate::select::{select_diverse, Selection, MAX_RELATED};
use crate::serendipity::{self, related_article, teaser};
use crate::validate::{check_article, Rejection};

/// Shortest search query that is sent upstream.
pub const MIN_QUERY_CHARS: usize = 2;

/// Enrichment failures never fail a load; log them and use an empty value.
fn tolerate<T: Default>(step: &'static str, res: Result<T, TransportError>) -> T {
    res.unwrap_or_else(|source| {
        let err = CurationError::EnrichmentPartialFailure { step, source };
        warn!("{}", err);
        T::default()
    })
}

/// Bucket of a returned summary. The API may answer under a normalised or
/// redirected title that was never selected; those are shown as `broader`.
fn relation_for(selected: &HashMap<&str, RelationType>, title: &str) -> RelationType {
    match selected.get(title) {
        Some(relation) => *relation,
        None => {
            debug!("Summary title not among selected links - title={}, relation=broader", title);
            RelationType::Broader
        }
    }
}

/// Fetches valid articles and assembles their view-models.
pub struct Curator {
    source: Arc<dyn WikiSource>,
    images: ImagePositionCache,
    policy: RetryPolicy,
    random_policy: RetryPolicy,
    random_min_size: u32,
    serendipity_pool: u32,
    serendipity_min_size: u32,
    rng: Mutex<StdRng>,
}

impl Curator {
    pub fn new(cfg: &Config, source: Arc<dyn WikiSource>, hints: Arc<dyn CropHintProvider>) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            source,
            images: ImagePositionCache::new(cfg.image_cache_capacity, hints),
            policy: cfg.retry_policy(),
            random_policy: cfg.random_policy(),
            random_min_size: cfg.random_min_size,
            serendipity_pool: cfg.serendipity_pool,
            serendipity_min_size: cfg.serendipity_min_size,
            rng: Mutex::new(rng),
        }
    }

    /// Production wiring: HTTP client and the default crop hint.
    pub fn from_config(cfg: &Config) -> Result<Self, TransportError> {
        let client = WikiClient::new(cfg)?;
        Ok(Self::new(cfg, Arc::new(client), Arc::new(DefaultCropHint)))
    }

    /// Run `attempt` until it succeeds or `policy` gives up.
    ///
    /// Transport errors and rejected content are retried after the policy's
    /// delay; errors that another attempt cannot fix are returned as-is.
    async fn with_retries<T, F, Fut>(&self, label: &str, policy: RetryPolicy, mut attempt: F) -> CurationResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = CurationResult<T>>,
    {
        let mut retrier = Retrier::new(policy);
        loop {
            let n = retrier.begin_attempt();
            debug!("{} - state={:?}", label, retrier.state());

            let result = attempt(n).await;
            retrier.validating();
            let (outcome, value, cause) = match result {
                Ok(v) => (AttemptOutcome::Valid, Some(v), None),
                Err(e @ CurationError::Transport(_)) => (AttemptOutcome::TransportFailed, None, Some(e)),
                Err(e @ (CurationError::ContentInvalid { .. } | CurationError::ExhaustedRetries { .. })) => {
                    (AttemptOutcome::Invalid, None, Some(e))
                }
                Err(e) => return Err(e),
            };

            match (retrier.record(outcome), value) {
                (Decision::Succeed, Some(v)) => return Ok(v),
                (Decision::RetryAfter(delay), _) => {
                    warn!(
                        "{} attempt failed - attempt={}/{}, retry_in={}ms, cause={}",
                        label,
                        n,
                        policy.max_attempts,
                        delay.as_millis(),
                        cause.map(|e| e.to_string()).unwrap_or_default()
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => {
                    error!(
                        "{} gave up - attempts={}, last_cause={}",
                        label,
                        retrier.attempts(),
                        cause.map(|e| e.to_string()).unwrap_or_default()
                    );
                    return Err(CurationError::ExhaustedRetries {
                        attempts: retrier.attempts(),
                    });
                }
            }
        }
    }

    /// Load `title`, retrying missing/invalid content and transport errors.
    pub async fn fetch_by_title(&self, title: &str) -> CurationResult<ArticleViewModel> {
        let start = std::time::Instant::now();
        let vm = self
            .with_retries("fetch_by_title", self.policy, move |_| self.attempt_title(title))
            .await?;
        info!(
            "Article loaded - title={}, category={}, related={}, duration={:.2}s",
            vm.title,
            vm.category,
            vm.related_articles.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(vm)
    }

    /// Load a random article. A title that cannot be loaded is abandoned
    /// and a fresh one drawn, since some random pages are simply unusable.
    pub async fn fetch_random(&self) -> CurationResult<ArticleViewModel> {
        self.with_retries("fetch_random", self.random_policy, move |n| async move {
            let title = self.draw_random_title().await?;
            info!("Random pick - attempt={}, title={}", n, title);
            self.fetch_by_title(&title).await
        })
        .await
    }

    async fn draw_random_title(&self) -> CurationResult<String> {
        let titles = self.source.random_titles(1, self.random_min_size).await?;
        let title = titles.into_iter().next().ok_or_else(|| TransportError::Malformed {
            reason: "random list was empty".to_string(),
        })?;
        Ok(title)
    }

    /// Load the best full-text match for `query`.
    pub async fn search(&self, query: &str) -> CurationResult<ArticleViewModel> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(CurationError::QueryTooShort { min: MIN_QUERY_CHARS });
        }

        let hits = self
            .with_retries("search", self.policy, move |_| async move {
                self.source.search(query).await.map_err(CurationError::from)
            })
            .await?;
        let best = hits.into_iter().next().ok_or_else(|| CurationError::NotFound {
            query: query.to_string(),
        })?;
        debug!("Search resolved - query={}, best={}", query, best);
        self.fetch_by_title(&best).await
    }

    async fn attempt_title(&self, title: &str) -> CurationResult<ArticleViewModel> {
        let page = self.source.page(title).await?;

        if let Err(reason) = check_article(page.as_ref()) {
            return Err(CurationError::ContentInvalid {
                title: title.to_string(),
                reason,
            });
        }
        let page = page.ok_or_else(|| CurationError::ContentInvalid {
            title: title.to_string(),
            reason: Rejection::Missing,
        })?;

        Ok(self.assemble(page).await)
    }

    /// Classify, select and enrich a validated page. Never fails: enrichment
    /// problems leave the affected fields empty.
    async fn assemble(&self, page: RawPage) -> ArticleViewModel {
        let tags: Vec<&str> = page.categories.iter().map(|c| strip_namespace(c)).collect();
        let category = classify(&tags);
        let topics = main_topics(&tags);
        let groups = group_links(&page.title, &topics, &page.links);

        let selection = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_diverse(&groups, &mut *rng)
        };

        // main image and related extracts are independent
        let (image, mut related) = futures::join!(
            self.main_image(&page.title),
            self.related_articles(&selection)
        );

        if related.len() < MAX_RELATED {
            let pool = self.serendipity_pool().await;
            related = serendipity::fill(related, &pool);
        }
        related.truncate(MAX_RELATED);

        ArticleViewModel {
            title: page.title,
            definition: page.extract.unwrap_or_default(),
            image,
            category_icon: topic_icon(&category),
            category,
            related_articles: related,
        }
    }

    async fn main_image(&self, title: &str) -> Option<ImageRef> {
        let source = tolerate("main image", self.source.page_image(title).await)?;
        Some(self.images.image_ref(source).await)
    }

    async fn related_articles(&self, selection: &[Selection]) -> Vec<RelatedArticle> {
        if selection.is_empty() {
            return Vec::new();
        }
        let titles: Vec<String> = selection.iter().map(|s| s.title.clone()).collect();
        let relation_of: HashMap<&str, RelationType> = selection
            .iter()
            .map(|s| (s.title.as_str(), s.relation))
            .collect();

        let summaries = tolerate("related extracts", self.source.summaries(&titles).await);
        let usable: Vec<&PageSummary> = summaries.iter().filter(|s| teaser(s).is_some()).collect();

        let images = join_all(usable.iter().map(|s| async move {
            match &s.image {
                Some(img) => Some(self.images.image_ref(img.clone()).await),
                None => None,
            }
        }))
        .await;

        let mut related: Vec<RelatedArticle> = usable
            .iter()
            .zip(images)
            .filter_map(|(s, image)| {
                let relation = relation_for(&relation_of, &s.title);
                related_article(s, relation, image)
            })
            .collect();
        related.sort_by_key(|a| a.relation);

        debug!(
            "Related content - selected={}, returned={}, usable={}",
            selection.len(),
            summaries.len(),
            related.len()
        );
        related
    }

    async fn serendipity_pool(&self) -> Vec<PageSummary> {
        let titles = tolerate(
            "serendipity titles",
            self.source
                .random_titles(self.serendipity_pool, self.serendipity_min_size)
                .await,
        );
        tolerate("serendipity extracts", self.source.summaries(&titles).await)
    }
}
