//! Mapping from suggested modules to the raw identifiers they cover

use super::types::SearchResponse;
use serde::Serialize;

/// Suggestions from one search, each paired with the raw module identifiers
/// that belong to it.
///
/// A raw identifier belongs to a suggestion when it equals the suggested
/// module or extends it with a `:`-separated suffix (`group:artifact:version`
/// under `group:artifact`). The index is rebuilt from every search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionIndex {
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub module: String,
    pub raw: Vec<String>,
}

impl SuggestionIndex {
    pub fn from_response(response: &SearchResponse) -> Self {
        let entries = response
            .filtered
            .iter()
            .map(|suggestion| IndexEntry {
                module: suggestion.module.clone(),
                raw: response
                    .raw
                    .iter()
                    .filter(|raw| covers(&suggestion.module, raw))
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn raw_modules(&self, module: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.module == module)
            .map(|e| e.raw.as_slice())
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn covers(module: &str, raw: &str) -> bool {
    raw == module
        || raw
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with(':'))
}
