//! Per-language dependency extraction
//!
//! Every supported input kind has an extractor that turns the raw text of a
//! source file or manifest into an ordered list of dependency identifiers plus
//! the language the identifiers belong to. Extractors are pure functions of
//! their input: they never touch the network and never fail. Malformed
//! manifests degrade to an empty context with a logged diagnostic.

mod java;
mod javascript;
pub mod kind;
mod maven;
mod package_json;
mod python;
pub mod registry;
mod requirements;

pub use java::JavaExtractor;
pub use javascript::JavaScriptExtractor;
pub use kind::{classify, SupportedKind, SUPPORTED_EXTENSIONS};
pub use maven::PomExtractor;
pub use package_json::PackageJsonExtractor;
pub use python::PythonExtractor;
pub use registry::ExtractorRegistry;
pub use requirements::RequirementsExtractor;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a context is routed under when talking to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Js,
    Python,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Js => "js",
            Language::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of dependency identifiers extracted from one document.
///
/// Order is first-seen order in the source text. Whether duplicates can occur
/// depends on the extractor that produced the context. Contexts are only
/// built through the methods below, so they serialize but never deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Context {
    identifiers: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context that keeps only the first occurrence of each
    /// non-empty identifier.
    pub fn unique<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut context = Self::new();
        for identifier in identifiers {
            context.push_unique(identifier);
        }
        context
    }

    /// Appends an identifier unless it is empty or already present.
    ///
    /// Returns `true` when the identifier was added.
    pub fn push_unique(&mut self, identifier: impl Into<String>) -> bool {
        let identifier = identifier.into();
        if identifier.is_empty() || self.contains(&identifier) {
            return false;
        }
        self.identifiers.push(identifier);
        true
    }

    /// Appends a non-empty identifier even if it is already present.
    pub fn push(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if !identifier.is_empty() {
            self.identifiers.push(identifier);
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|i| i == identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.identifiers.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.identifiers
    }

    pub fn into_vec(self) -> Vec<String> {
        self.identifiers
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.identifiers.iter()
    }
}

/// Non-fatal signals raised while extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// A Java source file declared no import statements.
    NoImportStatements,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::NoImportStatements => {
                f.write_str("No import statements found in active document")
            }
        }
    }
}

/// Result of running one extractor over one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub context: Context,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    pub fn new(context: Context, language: Language) -> Self {
        Self {
            context,
            language,
            warnings: Vec::new(),
        }
    }

    pub fn empty(language: Language) -> Self {
        Self::new(Context::new(), language)
    }

    pub fn with_warning(mut self, warning: ExtractionWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Turns the text of one document into its declared dependencies.
pub trait DependencyExtractor: Send + Sync {
    fn kind(&self) -> SupportedKind;

    fn language(&self) -> Language;

    fn extract(&self, text: &str) -> Extraction;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_skips_duplicates_and_empty() {
        let mut context = Context::new();
        assert!(context.push_unique("a"));
        assert!(!context.push_unique("a"));
        assert!(!context.push_unique(""));
        assert!(context.push_unique("b"));
        assert_eq!(context.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_push_keeps_duplicates() {
        let mut context = Context::new();
        context.push("a");
        context.push("a");
        context.push("");
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_context_serializes_as_array() {
        let context = Context::unique(["x", "y", "x"]);
        assert_eq!(serde_json::to_string(&context).unwrap(), r#"["x","y"]"#);
    }

    #[test]
    fn test_unique_drops_empty_identifiers() {
        let context = Context::unique(["", "a", "", "a", "b"]);
        assert_eq!(context.as_slice(), &["a", "b"]);
        assert_eq!(serde_json::to_value(&context).unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_language_serialization() {
        assert_eq!(serde_json::to_string(&Language::Js).unwrap(), "\"js\"");
        assert_eq!(Language::Python.to_string(), "python");
    }

    #[test]
    fn test_extraction_skips_empty_warnings() {
        let extraction = Extraction::empty(Language::Java);
        let json = serde_json::to_value(&extraction).unwrap();
        assert!(json.get("warnings").is_none());
        assert_eq!(json["language"], "java");
    }
}
