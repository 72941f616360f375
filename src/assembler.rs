//! Context assembly
//!
//! Ties classification, extraction and module resolution together: a document
//! is classified by its file name, exactly one extractor runs over its text and,
//! for Java sources, the package list is resolved into registry modules before
//! the context is returned.

use crate::backend::BackendError;
use crate::extract::{classify, Context, Extraction, ExtractorRegistry, Language, SupportedKind};
use crate::resolve::ModuleResolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A named piece of text handed in for extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub text: String,
}

impl Document {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }

    pub fn kind(&self) -> SupportedKind {
        classify(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContextOutcome {
    Extracted(Extraction),
    Unsupported { file_name: String },
    NoDocument,
}

impl ContextOutcome {
    pub fn extraction(&self) -> Option<&Extraction> {
        match self {
            ContextOutcome::Extracted(extraction) => Some(extraction),
            _ => None,
        }
    }

    pub fn into_extraction(self) -> Option<Extraction> {
        match self {
            ContextOutcome::Extracted(extraction) => Some(extraction),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to resolve {package_count} {language} packages into modules: {source}")]
    Resolution {
        language: Language,
        package_count: usize,
        #[source]
        source: BackendError,
    },
}

impl ExtractionError {
    /// Language of the document whose extraction failed.
    pub fn language(&self) -> Language {
        match self {
            ExtractionError::Resolution { language, .. } => *language,
        }
    }
}

pub struct ContextAssembler {
    registry: ExtractorRegistry,
    resolver: Arc<dyn ModuleResolver>,
}

impl ContextAssembler {
    pub fn new(resolver: Arc<dyn ModuleResolver>) -> Self {
        Self::with_registry(ExtractorRegistry::with_defaults(), resolver)
    }

    pub fn with_registry(registry: ExtractorRegistry, resolver: Arc<dyn ModuleResolver>) -> Self {
        Self { registry, resolver }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub async fn extract_context(
        &self,
        file_name: &str,
        text: &str,
    ) -> Result<ContextOutcome, ExtractionError> {
        let kind = classify(file_name);
        let Some(extractor) = self.registry.get(kind) else {
            debug!(file = %file_name, kind = %kind, "No extractor for document");
            return Ok(ContextOutcome::Unsupported {
                file_name: file_name.to_string(),
            });
        };

        debug!(file = %file_name, kind = %kind, "Extracting dependency context");
        let extraction = extractor.extract(text);

        if !kind.needs_resolution() {
            info!(
                file = %file_name,
                count = extraction.context.len(),
                "Extracted {} context",
                extraction.language
            );
            return Ok(ContextOutcome::Extracted(extraction));
        }

        self.resolve(file_name, extraction)
            .await
            .map(ContextOutcome::Extracted)
    }

    /// Extracts from the active document, falling back to the first visible
    /// document when there is no active one or its kind is unsupported.
    pub async fn extract_active(
        &self,
        active: Option<&Document>,
        visible: &[Document],
    ) -> Result<ContextOutcome, ExtractionError> {
        let selected = match active {
            Some(doc) if doc.kind().is_supported() => Some(doc),
            Some(doc) => {
                debug!(file = %doc.file_name, "Active document unsupported, trying visible documents");
                visible.first().or(Some(doc))
            }
            None => visible.first(),
        };

        match selected {
            Some(doc) => self.extract_context(&doc.file_name, &doc.text).await,
            None => Ok(ContextOutcome::NoDocument),
        }
    }

    async fn resolve(
        &self,
        file_name: &str,
        extraction: Extraction,
    ) -> Result<Extraction, ExtractionError> {
        if extraction.context.is_empty() {
            return Ok(extraction);
        }

        let language = extraction.language;
        let packages = extraction.context.as_slice();
        debug!(file = %file_name, packages = packages.len(), "Resolving packages into modules");

        let modules = self
            .resolver
            .resolve(language, packages)
            .await
            .map_err(|source| {
                warn!(file = %file_name, error = %source, "Module resolution failed");
                ExtractionError::Resolution {
                    language,
                    package_count: packages.len(),
                    source,
                }
            })?;

        let context = Context::unique(modules);
        info!(
            file = %file_name,
            packages = packages.len(),
            modules = context.len(),
            "Resolved {} context",
            language
        );

        Ok(Extraction {
            context,
            language,
            warnings: extraction.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::MockModuleResolver;

    #[tokio::test]
    async fn test_unsupported_never_runs_resolver() {
        let resolver = Arc::new(MockModuleResolver::new());
        let assembler = ContextAssembler::new(resolver.clone());

        let outcome = assembler
            .extract_context("notes.md", "import a.b.C;")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ContextOutcome::Unsupported {
                file_name: "notes.md".to_string()
            }
        );
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_outcome_serialization() {
        let outcome = ContextOutcome::NoDocument;
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_document");

        let outcome = ContextOutcome::Extracted(Extraction::new(
            Context::unique(["numpy"]),
            Language::Python,
        ));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "extracted");
        assert_eq!(json["context"][0], "numpy");
    }

    #[test]
    fn test_error_reports_language() {
        let err = ExtractionError::Resolution {
            language: Language::Java,
            package_count: 2,
            source: BackendError::TimeoutError { seconds: 10 },
        };
        assert_eq!(err.language(), Language::Java);
        assert!(err.to_string().contains("2 java packages"));
    }
}
