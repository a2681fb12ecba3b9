//! Encyclopedia feed with curated related-article selection.
//!
//! [`orchestrator::Curator`] fetches a valid article and builds its
//! [`models::ArticleViewModel`]; [`session::Navigator`] holds the article
//! currently on screen.

pub mod api_types;
pub mod category;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grouping;
pub mod image_cache;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod retry;
pub mod select;
pub mod serendipity;
pub mod session;
pub mod similarity;
pub mod validate;

pub use error::{CurationError, CurationResult, TransportError};
pub use models::{ArticleViewModel, RelatedArticle, RelationType};
pub use orchestrator::Curator;
pub use session::{LoadRequest, Navigator};
