//! Plain `requirements.txt` listings

use super::{Context, DependencyExtractor, Extraction, Language, SupportedKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static REQUIREMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\w+)[=<>]?").expect("valid regex"));

/// Leading package name of each line, optionally followed by a version
/// comparator.
///
/// Unlike the source-file extractors this one keeps repeated entries as they
/// appear in the listing.
pub struct RequirementsExtractor;

impl DependencyExtractor for RequirementsExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::RequirementsTxt
    }

    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&self, text: &str) -> Extraction {
        let mut context = Context::new();
        for caps in REQUIREMENT_LINE.captures_iter(text) {
            context.push(&caps[1]);
        }
        debug!(count = context.len(), "Read requirements listing");

        Extraction::new(context, Language::Python)
    }
}
