//! Directory scanning for import datasets
//!
//! Walks a source tree, runs the matching extractor over every supported file
//! and collects the results keyed by path relative to the root. Java package
//! lists are kept as extracted; nothing here talks to the backend.

use crate::extract::{classify, Extraction, ExtractorRegistry};
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub max_files: usize,
    /// Files larger than this are skipped
    pub max_file_size: u64,
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            max_files: 10_000,
            max_file_size: 1024 * 1024,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to resolve {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Extraction per supported file, keyed by relative path with `/` separators
    pub files: BTreeMap<String, Extraction>,
    pub files_scanned: usize,
    pub skipped: usize,
}

impl ScanResult {
    /// Number of files that declared at least one dependency.
    pub fn non_empty(&self) -> usize {
        self.files
            .values()
            .filter(|e| !e.context.is_empty())
            .count()
    }
}

pub fn scan_directory(
    root: &Path,
    registry: &ExtractorRegistry,
    config: &ScanConfig,
) -> Result<ScanResult, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let root = root.canonicalize().map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    info!(
        root = %root.display(),
        max_depth = config.max_depth,
        max_files = config.max_files,
        "Starting directory scan"
    );
    let start = Instant::now();

    let mut result = ScanResult {
        root: root.clone(),
        ..ScanResult::default()
    };

    for entry in WalkBuilder::new(&root)
        .max_depth(Some(config.max_depth))
        .hidden(!config.include_hidden)
        .require_git(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some(extractor) = registry.get(classify(&file_name)) else {
            trace!(path = %path.display(), "Skipping unsupported file");
            continue;
        };

        if result.files_scanned >= config.max_files {
            warn!(
                files_scanned = result.files_scanned,
                max_files = config.max_files,
                "Reached file limit, stopping scan"
            );
            break;
        }
        result.files_scanned += 1;

        let too_large = entry
            .metadata()
            .map(|m| m.len() > config.max_file_size)
            .unwrap_or(false);
        if too_large {
            debug!(path = %path.display(), "Skipping oversized file");
            result.skipped += 1;
            continue;
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read file");
                result.skipped += 1;
                continue;
            }
        };

        let rel_path = relative_key(&root, path);
        let extraction = extractor.extract(&text);
        trace!(path = %rel_path, count = extraction.context.len(), "Extracted file");
        result.files.insert(rel_path, extraction);
    }

    info!(
        files_scanned = result.files_scanned,
        skipped = result.skipped,
        with_dependencies = result.non_empty(),
        scan_time_ms = start.elapsed().as_millis() as u64,
        "Directory scan completed"
    );

    Ok(result)
}

fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_key_uses_forward_slashes() {
        let root = Path::new("/repo");
        let path = Path::new("/repo").join("src").join("main.py");
        assert_eq!(relative_key(root, &path), "src/main.py");
    }

    #[test]
    fn test_missing_root() {
        let registry = ExtractorRegistry::with_defaults();
        let result = scan_directory(
            Path::new("/definitely/not/here"),
            &registry,
            &ScanConfig::default(),
        );
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }
}
