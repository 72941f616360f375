//! Java import statements

use super::{Context, DependencyExtractor, Extraction, ExtractionWarning, Language, SupportedKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static JAVA_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import ([^;\s]+)\s*;").expect("valid regex"));

/// Collects the packages a Java source file imports from.
///
/// The trailing class or member name is dropped, so `com.foo.Bar` and
/// `com.foo.Baz` both contribute `com.foo`. The resulting package paths still
/// have to be mapped to registry modules before they form a usable context.
pub struct JavaExtractor;

impl JavaExtractor {
    fn package_of(import_path: &str) -> &str {
        match import_path.rfind('.') {
            Some(idx) => &import_path[..idx],
            None => "",
        }
    }
}

impl DependencyExtractor for JavaExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::Java
    }

    fn language(&self) -> Language {
        Language::Java
    }

    fn extract(&self, text: &str) -> Extraction {
        let mut packages = Context::new();

        for caps in JAVA_IMPORT.captures_iter(text) {
            let import_path = &caps[1];
            if packages.push_unique(Self::package_of(import_path)) {
                debug!(import = import_path, "Found Java package import");
            }
        }

        if packages.is_empty() {
            warn!("No import statements found in Java source");
            return Extraction::empty(Language::Java)
                .with_warning(ExtractionWarning::NoImportStatements);
        }

        Extraction::new(packages, Language::Java)
    }
}
