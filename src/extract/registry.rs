use super::{
    DependencyExtractor, JavaExtractor, JavaScriptExtractor, PackageJsonExtractor,
    PomExtractor, PythonExtractor, RequirementsExtractor, SupportedKind,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn DependencyExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JavaExtractor));
        registry.register(Arc::new(JavaScriptExtractor));
        registry.register(Arc::new(PythonExtractor));
        registry.register(Arc::new(PomExtractor));
        registry.register(Arc::new(PackageJsonExtractor));
        registry.register(Arc::new(RequirementsExtractor));
        registry
    }

    /// Registers an extractor, replacing any existing one for the same kind.
    pub fn register(&mut self, extractor: Arc<dyn DependencyExtractor>) {
        self.extractors.retain(|e| e.kind() != extractor.kind());
        self.extractors.push(extractor);
    }

    pub fn get(&self, kind: SupportedKind) -> Option<&dyn DependencyExtractor> {
        self.extractors
            .iter()
            .find(|e| e.kind() == kind)
            .map(|e| e.as_ref())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
