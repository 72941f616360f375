//! Recommendation backend access

pub mod client;
pub mod error;
pub mod suggestions;
pub mod types;

pub use client::{CompassClient, CLIENT_KEY_HEADER};
pub use error::BackendError;
pub use suggestions::{IndexEntry, SuggestionIndex};
pub use types::{
    normalize_intent, LibsResponse, NearestCategories, SearchRequest, SearchResponse, Snippets,
    Suggestion,
};
