//! Wire types exchanged with the recommendation backend

use crate::extract::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of an intent search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub context: Vec<String>,
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl SearchRequest {
    pub fn new(context: &Context, intent: &str, filter: Option<&str>) -> Self {
        Self {
            context: context.as_slice().to_vec(),
            intent: normalize_intent(intent),
            filter: filter.map(str::to_string).filter(|f| !f.is_empty()),
        }
    }
}

/// One suggested module. The backend attaches free-form details (scores,
/// descriptions, links) which are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub module: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub filtered: Vec<Suggestion>,
    /// Every raw module identifier that matched before filtering
    #[serde(default)]
    pub raw: Vec<String>,
}

impl SearchResponse {
    /// Attaches the usage snippet of every filtered suggestion that has one,
    /// under the `snippet` detail. Returns how many were attached.
    pub fn attach_snippets(&mut self, snippets: &Snippets) -> usize {
        let mut attached = 0;
        for suggestion in &mut self.filtered {
            if let Some(snippet) = snippets.get(&suggestion.module) {
                suggestion
                    .details
                    .insert("snippet".to_string(), snippet.clone());
                attached += 1;
            }
        }
        attached
    }
}

/// Usage snippets keyed by module name.
pub type Snippets = Map<String, Value>;

/// Library catalogue of one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibsResponse {
    #[serde(default)]
    pub libs: Vec<Value>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestCategories {
    #[serde(default)]
    pub cats: Vec<Value>,
    #[serde(default, rename = "nearestLibs")]
    pub nearest_libs: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FilteredCategoriesRequest<'a> {
    pub context: &'a [String],
    pub filter: &'a str,
}

/// Lowercases an intent and joins its words with underscores.
pub fn normalize_intent(intent: &str) -> String {
    intent.trim().to_lowercase().replace(' ', "_")
}
