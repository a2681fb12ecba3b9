use crate::validate::Rejection;

/// Failure talking to the wiki API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected response: {reason}")]
    Malformed { reason: String },
}

/// Errors surfaced by the curation engine.
///
/// Only `ExhaustedRetries`, `NotFound`, `QueryTooShort` and `Superseded`
/// ever reach callers of [`crate::orchestrator::Curator`]; the others are
/// consumed by the retry loop or downgraded to empty fields.
#[derive(Debug, thiserror::Error)]
pub enum CurationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("content rejected for {title:?}: {reason}")]
    ContentInvalid { title: String, reason: Rejection },

    #[error("enrichment step {step} failed: {source}")]
    EnrichmentPartialFailure {
        step: &'static str,
        source: TransportError,
    },

    #[error("no valid article after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    #[error("no article matches {query:?}")]
    NotFound { query: String },

    #[error("search query must be at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("load superseded by a newer request")]
    Superseded,
}

pub type CurationResult<T> = Result<T, CurationError>;
