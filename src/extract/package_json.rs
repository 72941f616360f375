//! `package.json` manifests

use super::{Context, DependencyExtractor, Extraction, Language, SupportedKind};
use tracing::{debug, warn};

/// Keys of the top-level `dependencies` object, in source order.
pub struct PackageJsonExtractor;

impl DependencyExtractor for PackageJsonExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::PackageJson
    }

    fn language(&self) -> Language {
        Language::Js
    }

    fn extract(&self, text: &str) -> Extraction {
        let manifest: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to parse package manifest as JSON");
                return Extraction::empty(Language::Js);
            }
        };

        let Some(deps) = manifest.get("dependencies").and_then(|d| d.as_object()) else {
            debug!("Manifest has no dependencies object");
            return Extraction::empty(Language::Js);
        };

        let mut context = Context::new();
        for name in deps.keys() {
            context.push_unique(name.as_str());
        }
        debug!(count = context.len(), "Read manifest dependencies");

        Extraction::new(context, Language::Js)
    }
}
