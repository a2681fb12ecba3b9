use crate::models::RawPage;

/// Articles shorter than this (trimmed, in characters) are treated as stubs.
pub const MIN_EXTRACT_CHARS: usize = 100;

/// Why a fetched page is not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("page missing")]
    Missing,

    #[error("extract missing or too short")]
    TooShort,

    #[error("disambiguation title")]
    DisambiguationTitle,

    #[error("disambiguation text")]
    DisambiguationExtract,

    #[error("list or index page")]
    ListOrIndex,
}

pub fn check_article(page: Option<&RawPage>) -> Result<(), Rejection> {
    let page = match page {
        Some(p) if !p.missing => p,
        _ => return Err(Rejection::Missing),
    };

    let extract = page.extract.as_deref().unwrap_or("").trim();
    if extract.chars().count() < MIN_EXTRACT_CHARS {
        return Err(Rejection::TooShort);
    }
    if page.title.contains("(disambiguation)") {
        return Err(Rejection::DisambiguationTitle);
    }
    let lower = extract.to_lowercase();
    if lower.contains("may refer to:") || lower.contains("disambiguation page") {
        return Err(Rejection::DisambiguationExtract);
    }
    if page.title.starts_with("List of") || page.title.starts_with("Index of") {
        return Err(Rejection::ListOrIndex);
    }
    Ok(())
}

pub fn is_valid_article(page: Option<&RawPage>) -> bool {
    check_article(page).is_ok()
}
