//! Python `import` and `from ... import` statements

use super::{Context, DependencyExtractor, Extraction, Language, SupportedKind};
use regex::Regex;
use std::sync::LazyLock;

static PY_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+(.+)$").expect("valid regex"));

static PY_FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*from\s+([\w.]+)\simport\s(.+)$").expect("valid regex")
});

/// Top-level packages a Python module imports.
///
/// Only the first dot segment is kept (`a.b.c` becomes `a`). Relative imports
/// have an empty first segment and are dropped.
pub struct PythonExtractor;

impl PythonExtractor {
    fn top_level(dotted: &str) -> &str {
        dotted.split('.').next().unwrap_or_default()
    }

    fn strip_comment(line: &str) -> &str {
        line.split('#').next().unwrap_or_default()
    }
}

impl DependencyExtractor for PythonExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::Python
    }

    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&self, text: &str) -> Extraction {
        let mut packages = Context::new();

        for caps in PY_IMPORT.captures_iter(text) {
            for clause in Self::strip_comment(&caps[1]).split(',') {
                // `b.c as x` -> `b.c`
                let Some(path) = clause.split_whitespace().next() else {
                    continue;
                };
                packages.push_unique(Self::top_level(path));
            }
        }

        for caps in PY_FROM_IMPORT.captures_iter(text) {
            let root = Self::top_level(&caps[1]);
            // One append per imported name; the uniqueness check absorbs the repeats.
            for _name in Self::strip_comment(&caps[2]).split(',') {
                packages.push_unique(root);
            }
        }

        Extraction::new(packages, Language::Python)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_and_from_forms() {
        let text = "import os, sys as s\nfrom collections import OrderedDict";
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["os", "sys", "collections"]);
        assert_eq!(result.language, Language::Python);
    }

    #[test]
    fn test_keeps_first_segment_only() {
        let text = "import xml.etree.ElementTree as ET\nfrom google.cloud.storage import Client";
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["xml", "google"]);
    }

    #[test]
    fn test_alias_on_every_clause() {
        let result = PythonExtractor.extract("import numpy as np, pandas as pd");
        assert_eq!(result.context.as_slice(), &["numpy", "pandas"]);
    }

    #[test]
    fn test_import_statements_before_from_statements() {
        let text = "from flask import Flask\nimport requests\n";
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["requests", "flask"]);
    }

    #[test]
    fn test_from_with_many_names_yields_one_entry() {
        let text = "from typing import Any, Dict, List as L, Optional";
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["typing"]);
    }

    #[test]
    fn test_relative_imports_are_dropped() {
        let text = "from . import views\nfrom .models import User\nfrom ..core import base\nimport json";
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["json"]);
    }

    #[test]
    fn test_indented_imports_and_comments() {
        let text = r#"
def lazy():
    import yaml  # optional dependency
    from toml import loads
"#;
        let result = PythonExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["yaml", "toml"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = PythonExtractor.extract("import os\r\nimport re\r\n");
        assert_eq!(result.context.as_slice(), &["os", "re"]);
    }

    #[test]
    fn test_trailing_comma_does_not_produce_empty_entry() {
        let result = PythonExtractor.extract("import a,");
        assert_eq!(result.context.as_slice(), &["a"]);
    }
}
