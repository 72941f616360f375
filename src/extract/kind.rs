//! File-name classification into supported input kinds

use super::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions accepted by [`classify`], lowercase and including the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".java", ".js", ".py", ".xml", ".json", ".txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedKind {
    Java,
    JavaScript,
    Python,
    PomXml,
    PackageJson,
    RequirementsTxt,
    Unsupported,
}

impl SupportedKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            ".java" => SupportedKind::Java,
            ".js" => SupportedKind::JavaScript,
            ".py" => SupportedKind::Python,
            ".xml" => SupportedKind::PomXml,
            ".json" => SupportedKind::PackageJson,
            ".txt" => SupportedKind::RequirementsTxt,
            _ => SupportedKind::Unsupported,
        }
    }

    pub fn extension(&self) -> Option<&'static str> {
        match self {
            SupportedKind::Java => Some(".java"),
            SupportedKind::JavaScript => Some(".js"),
            SupportedKind::Python => Some(".py"),
            SupportedKind::PomXml => Some(".xml"),
            SupportedKind::PackageJson => Some(".json"),
            SupportedKind::RequirementsTxt => Some(".txt"),
            SupportedKind::Unsupported => None,
        }
    }

    /// Language an extraction of this kind is reported under.
    pub fn language(&self) -> Option<Language> {
        match self {
            SupportedKind::Java | SupportedKind::PomXml => Some(Language::Java),
            SupportedKind::JavaScript | SupportedKind::PackageJson => Some(Language::Js),
            SupportedKind::Python | SupportedKind::RequirementsTxt => Some(Language::Python),
            SupportedKind::Unsupported => None,
        }
    }

    /// Whether extracted identifiers are package paths that still have to be
    /// mapped to registry modules.
    pub fn needs_resolution(&self) -> bool {
        matches!(self, SupportedKind::Java)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SupportedKind::Unsupported)
    }
}

impl fmt::Display for SupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SupportedKind::Java => "Java source",
            SupportedKind::JavaScript => "JavaScript source",
            SupportedKind::Python => "Python source",
            SupportedKind::PomXml => "Maven POM",
            SupportedKind::PackageJson => "package manifest",
            SupportedKind::RequirementsTxt => "requirements listing",
            SupportedKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Lowercased suffix starting at the last `.` of the file name, if any.
pub fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rfind('.')
        .map(|idx| file_name[idx..].to_lowercase())
}

/// Maps a file name to the kind of input it holds.
pub fn classify(file_name: &str) -> SupportedKind {
    file_extension(file_name)
        .map(|ext| SupportedKind::from_extension(&ext))
        .unwrap_or(SupportedKind::Unsupported)
}
