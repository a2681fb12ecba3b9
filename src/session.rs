//! The "current article" slot the presentation layer reads from.
//!
//! Every load takes a new generation and cancels the one before it, so a
//! stale load can never overwrite the view-model of a newer navigation.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CurationError, CurationResult};
use crate::models::ArticleViewModel;
use crate::orchestrator::Curator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Title(String),
    Random,
    Search(String),
}

struct Slot {
    generation: u64,
    cancel: CancellationToken,
}

pub struct Navigator {
    curator: Arc<Curator>,
    slot: Mutex<Slot>,
    current: RwLock<Option<Arc<ArticleViewModel>>>,
}

impl Navigator {
    pub fn new(curator: Arc<Curator>) -> Self {
        Self {
            curator,
            slot: Mutex::new(Slot {
                generation: 0,
                cancel: CancellationToken::new(),
            }),
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Arc<ArticleViewModel>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.cancel.cancel();
        slot.generation += 1;
        slot.cancel = CancellationToken::new();
        (slot.generation, slot.cancel.clone())
    }

    /// Run `f` only if `generation` is still the newest load.
    fn if_current<F: FnOnce()>(&self, generation: u64, f: F) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            return false;
        }
        f();
        true
    }

    /// Load an article into the slot, superseding any load in flight.
    ///
    /// On success the view-model replaces the previous one wholesale; on a
    /// terminal failure the previous one is cleared. A superseded load
    /// returns [`CurationError::Superseded`] and leaves the slot alone.
    pub async fn load(&self, request: LoadRequest) -> CurationResult<Arc<ArticleViewModel>> {
        let (generation, cancel) = self.begin();
        debug!("Load started - generation={}, request={:?}", generation, request);

        let work = async {
            match &request {
                LoadRequest::Title(title) => self.curator.fetch_by_title(title).await,
                LoadRequest::Random => self.curator.fetch_random().await,
                LoadRequest::Search(query) => self.curator.search(query).await,
            }
        };

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Load superseded - generation={}", generation);
                return Err(CurationError::Superseded);
            }
            r = work => r,
        };

        match result {
            Ok(vm) => {
                let vm = Arc::new(vm);
                let committed = self.if_current(generation, || {
                    *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(vm.clone());
                });
                if !committed {
                    return Err(CurationError::Superseded);
                }
                Ok(vm)
            }
            Err(err) => {
                let cleared = self.if_current(generation, || {
                    *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
                });
                if cleared {
                    warn!("Load failed, view cleared - generation={}, error={}", generation, err);
                    Err(err)
                } else {
                    Err(CurationError::Superseded)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::config::Config;
    use crate::error::TransportError;
    use crate::fetch::WikiSource;
    use crate::image_cache::DefaultCropHint;
    use crate::models::{ImageSource, PageSummary, RawPage};

    /// Serves any title except "Broken"; "Slow" takes a while.
    struct StaticWiki;

    #[async_trait]
    impl WikiSource for StaticWiki {
        async fn search(&self, query: &str) -> Result<Vec<String>, TransportError> {
            Ok(vec![query.to_string()])
        }

        async fn page(&self, title: &str) -> Result<Option<RawPage>, TransportError> {
            if title == "Slow" {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if title == "Broken" {
                return Ok(None);
            }
            Ok(Some(RawPage {
                title: title.to_string(),
                extract: Some(format!("{title} {}", "has a long enough body. ".repeat(6))),
                ..RawPage::default()
            }))
        }

        async fn page_image(&self, _title: &str) -> Result<Option<ImageSource>, TransportError> {
            Ok(None)
        }

        async fn random_titles(&self, _count: u32, _min: u32) -> Result<Vec<String>, TransportError> {
            Ok(vec!["Okapi".to_string()])
        }

        async fn summaries(&self, _titles: &[String]) -> Result<Vec<PageSummary>, TransportError> {
            Ok(Vec::new())
        }
    }

    fn navigator() -> Arc<Navigator> {
        let cfg = Config {
            retry_delay_ms: 0,
            seed: Some(5),
            ..Config::default()
        };
        let curator = Curator::new(&cfg, Arc::new(StaticWiki), Arc::new(DefaultCropHint));
        Arc::new(Navigator::new(Arc::new(curator)))
    }

    #[tokio::test]
    async fn successful_load_becomes_current() {
        let nav = navigator();
        assert!(nav.current().is_none());
        let vm = nav.load(LoadRequest::Title("Okapi".into())).await.unwrap();
        assert_eq!(vm.title, "Okapi");
        assert_eq!(nav.current().unwrap().title, "Okapi");

        let vm = nav.load(LoadRequest::Random).await.unwrap();
        assert_eq!(vm.title, "Okapi");
    }

    #[tokio::test]
    async fn terminal_failure_clears_the_view() {
        let nav = navigator();
        nav.load(LoadRequest::Search("Okapi".into())).await.unwrap();
        let err = nav.load(LoadRequest::Title("Broken".into())).await.unwrap_err();
        assert!(matches!(err, CurationError::ExhaustedRetries { .. }));
        assert!(nav.current().is_none());
    }

    #[tokio::test]
    async fn newer_request_supersedes_one_in_flight() {
        let nav = navigator();
        let slow = {
            let nav = nav.clone();
            tokio::spawn(async move { nav.load(LoadRequest::Title("Slow".into())).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fast = nav.load(LoadRequest::Title("Okapi".into())).await.unwrap();
        assert_eq!(fast.title, "Okapi");

        let stale = slow.await.unwrap();
        assert!(matches!(stale, Err(CurationError::Superseded)));
        assert_eq!(nav.current().unwrap().title, "Okapi");
    }
}
