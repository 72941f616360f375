//! Output formatting for multiple formats
//!
//! Every command result can be rendered as pretty JSON, YAML or human-readable
//! text. JSON and YAML reuse the serde representation of the library types so
//! they stay stable for scripts.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

use crate::assembler::ContextOutcome;
use crate::backend::{LibsResponse, NearestCategories, SearchResponse, SuggestionIndex};
use crate::extract::{Extraction, Language, SupportedKind, SUPPORTED_EXTENSIONS};
use crate::scan::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// Classification of one file name.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub file_name: String,
    pub kind: SupportedKind,
    pub language: Option<Language>,
}

impl Classification {
    pub fn new(file_name: &str, kind: SupportedKind) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind,
            language: kind.language(),
        }
    }
}

/// Search results paired with the raw modules each suggestion covers.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport<'a> {
    pub language: Language,
    pub intent: &'a str,
    pub context: &'a [String],
    pub suggestions: &'a SearchResponse,
    pub index: &'a SuggestionIndex,
}

impl SuggestionReport<'_> {
    fn snippet_for(&self, module: &str) -> Option<&serde_json::Value> {
        self.suggestions
            .filtered
            .iter()
            .find(|s| s.module == module)
            .and_then(|s| s.details.get("snippet"))
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_classification(&self, classification: &Classification) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let language = classification
                    .language
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                Ok(format!(
                    "{}: {} (language: {})",
                    classification.file_name, classification.kind, language
                ))
            }
            _ => self.serialize(classification, "classification"),
        }
    }

    pub fn format_outcome(&self, outcome: &ContextOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(match outcome {
                ContextOutcome::Extracted(extraction) => human_extraction(extraction),
                ContextOutcome::Unsupported { file_name } => unsupported_guidance(file_name),
                ContextOutcome::NoDocument => no_document_guidance(),
            }),
            _ => self.serialize(outcome, "context"),
        }
    }

    pub fn format_scan(&self, result: &ScanResult) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut out = String::new();
                for (path, extraction) in &result.files {
                    let _ = writeln!(
                        out,
                        "{} [{}]: {}",
                        path,
                        extraction.language,
                        join_or_dash(extraction.context.as_slice())
                    );
                }
                let _ = write!(
                    out,
                    "\n{} files scanned, {} with dependencies, {} skipped",
                    result.files_scanned,
                    result.non_empty(),
                    result.skipped
                );
                Ok(out)
            }
            _ => self.serialize(result, "scan result"),
        }
    }

    pub fn format_suggestions(&self, report: &SuggestionReport<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "Suggestions for '{}' ({}, context: {})",
                    report.intent,
                    report.language,
                    join_or_dash(report.context)
                );
                if report.index.is_empty() {
                    let _ = write!(out, "  No suggestions found");
                    return Ok(out);
                }
                for (rank, entry) in report.index.entries().iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", rank + 1, entry.module);
                    if !entry.raw.is_empty() {
                        let _ = writeln!(out, "     covers: {}", entry.raw.join(", "));
                    }
                    if let Some(snippet) = report.snippet_for(&entry.module) {
                        for line in display_value(snippet).lines() {
                            let _ = writeln!(out, "     | {}", line);
                        }
                    }
                }
                Ok(out.trim_end().to_string())
            }
            _ => self.serialize(report, "suggestions"),
        }
    }

    pub fn format_categories(&self, categories: &NearestCategories) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut out = String::from("Nearest categories:\n");
                for cat in &categories.cats {
                    let _ = writeln!(out, "  - {}", display_value(cat));
                }
                out.push_str("Nearest libraries:\n");
                for lib in &categories.nearest_libs {
                    let _ = writeln!(out, "  - {}", display_value(lib));
                }
                Ok(out.trim_end().to_string())
            }
            _ => self.serialize(categories, "categories"),
        }
    }

    pub fn format_intents(&self, language: Language, intents: &[serde_json::Value]) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut out = format!("Intents for {} ({}):\n", language, intents.len());
                for intent in intents {
                    let _ = writeln!(out, "  - {}", display_value(intent));
                }
                Ok(out.trim_end().to_string())
            }
            _ => self.serialize(intents, "intents"),
        }
    }

    pub fn format_libs(&self, language: Language, libs: &LibsResponse) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut out = format!("Libraries for {} ({} total):\n", language, libs.total);
                for lib in &libs.libs {
                    let _ = writeln!(out, "  - {}", display_value(lib));
                }
                Ok(out.trim_end().to_string())
            }
            _ => self.serialize(libs, "libraries"),
        }
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T, what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what)),
            _ => serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what)),
        }
    }
}

fn human_extraction(extraction: &Extraction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Language: {}", extraction.language);
    let _ = writeln!(out, "Dependencies ({}):", extraction.context.len());
    for identifier in &extraction.context {
        let _ = writeln!(out, "  - {}", identifier);
    }
    for warning in &extraction.warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    out.trim_end().to_string()
}

/// Message shown when the selected document cannot be extracted.
pub fn unsupported_guidance(file_name: &str) -> String {
    format!(
        "'{}' is not a supported file type. Supported file types: {} \
         (Maven pom.xml, package.json and requirements.txt manifests are recognized by extension)",
        file_name,
        SUPPORTED_EXTENSIONS.join(", ")
    )
}

/// Message shown when no document was supplied at all.
pub fn no_document_guidance() -> String {
    format!(
        "No document to extract from. Open a file of a supported type: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Context as DepContext, ExtractionWarning};

    fn java_extraction() -> Extraction {
        Extraction::new(DepContext::unique(["com.google:guava"]), Language::Java)
    }

    #[test]
    fn test_human_outcome() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_outcome(&ContextOutcome::Extracted(java_extraction()))
            .unwrap();
        assert!(output.contains("Language: java"));
        assert!(output.contains("  - com.google:guava"));
    }

    #[test]
    fn test_human_warning() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let extraction =
            Extraction::empty(Language::Java).with_warning(ExtractionWarning::NoImportStatements);
        let output = formatter
            .format_outcome(&ContextOutcome::Extracted(extraction))
            .unwrap();
        assert!(output.contains("Dependencies (0)"));
        assert!(output.contains("No import statements found"));
    }

    #[test]
    fn test_guidance_lists_supported_types() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_outcome(&ContextOutcome::Unsupported {
                file_name: "notes.md".to_string(),
            })
            .unwrap();
        assert!(output.contains("notes.md"));
        for ext in SUPPORTED_EXTENSIONS {
            assert!(output.contains(ext));
        }
        assert!(no_document_guidance().contains(".java"));
    }

    #[test]
    fn test_json_outcome() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_outcome(&ContextOutcome::Extracted(java_extraction()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "extracted");
        assert_eq!(value["language"], "java");
        assert_eq!(value["context"][0], "com.google:guava");
    }

    #[test]
    fn test_yaml_classification() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter
            .format_classification(&Classification::new("pom.xml", SupportedKind::PomXml))
            .unwrap();
        assert!(output.contains("kind: pom_xml"));
        assert!(output.contains("language: java"));
    }

    #[test]
    fn test_human_suggestions_show_snippets() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "filtered": [
                {"module": "pandas", "snippet": "import pandas as pd\npd.read_csv(path)"},
                {"module": "csvkit"}
            ],
            "raw": ["pandas"]
        }))
        .unwrap();
        let index = SuggestionIndex::from_response(&response);
        let report = SuggestionReport {
            language: Language::Python,
            intent: "parse_csv",
            context: &[],
            suggestions: &response,
            index: &index,
        };

        let output = OutputFormatter::new(OutputFormat::Human)
            .format_suggestions(&report)
            .unwrap();
        assert!(output.contains("  1. pandas"));
        assert!(output.contains("     | import pandas as pd\n     | pd.read_csv(path)"));
        assert!(output.contains("  2. csvkit"));
        assert_eq!(output.matches(" | ").count(), 2);
    }

    #[test]
    fn test_catalog_output() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let intents = [serde_json::json!("parse_csv"), serde_json::json!("http_client")];
        let output = formatter.format_intents(Language::Java, &intents).unwrap();
        assert!(output.starts_with("Intents for java (2):"));
        assert!(output.contains("  - http_client"));

        let libs = LibsResponse {
            libs: vec![serde_json::json!("flask")],
            total: 1,
        };
        let output = formatter.format_libs(Language::Python, &libs).unwrap();
        assert!(output.contains("1 total"));
        assert!(output.contains("  - flask"));

        let json = OutputFormatter::new(OutputFormat::Json)
            .format_libs(Language::Python, &libs)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 1);
    }

    #[test]
    fn test_human_categories() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let categories = NearestCategories {
            cats: vec![serde_json::json!("http")],
            nearest_libs: vec![serde_json::json!({"module": "requests"})],
        };
        let output = formatter.format_categories(&categories).unwrap();
        assert!(output.contains("  - http"));
        assert!(output.contains("requests"));
    }
}
