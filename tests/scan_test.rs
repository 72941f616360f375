//! Directory scanning tests

use code_compass::{scan_directory, ExtractorRegistry, Language, ScanConfig, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn context_of<'a>(result: &'a code_compass::ScanResult, path: &str) -> Vec<&'a str> {
    result
        .files
        .get(path)
        .unwrap_or_else(|| panic!("{} missing from scan", path))
        .context
        .iter()
        .map(String::as_str)
        .collect()
}

#[test]
fn test_scan_mixed_fixture() {
    let result = scan_directory(
        &fixture("mixed"),
        &ExtractorRegistry::with_defaults(),
        &ScanConfig::default(),
    )
    .unwrap();

    let paths: Vec<&str> = result.files.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec![
            "pom.xml",
            "py/main.py",
            "py/requirements.txt",
            "src/main/java/com/example/App.java",
            "web/app.js",
            "web/package.json",
        ]
    );
    assert_eq!(result.files_scanned, 6);

    assert_eq!(
        context_of(&result, "pom.xml"),
        vec!["com.google.guava:guava", "org.slf4j:slf4j-api"]
    );
    assert_eq!(
        context_of(&result, "src/main/java/com/example/App.java"),
        vec!["com.google.common.collect", "org.slf4j", "java.util"]
    );
    assert_eq!(
        context_of(&result, "web/app.js"),
        vec!["express", "axios", "@sentry/node"]
    );
    assert_eq!(
        context_of(&result, "web/package.json"),
        vec!["express", "axios", "@sentry/node"]
    );
    assert_eq!(
        context_of(&result, "py/main.py"),
        vec!["os", "sys", "numpy", "pandas"]
    );
    assert_eq!(
        context_of(&result, "py/requirements.txt"),
        vec!["numpy", "pandas", "requests", "numpy"]
    );

    assert_eq!(result.files["web/app.js"].language, Language::Js);
    assert_eq!(result.non_empty(), 6);
}

#[test]
fn test_scan_respects_gitignore_and_hidden() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join(".gitignore"), "build/\n").unwrap();
    fs::create_dir_all(root.join("build")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join("build/generated.py"), "import generated").unwrap();
    fs::write(root.join(".cache/cached.py"), "import cached").unwrap();
    fs::write(root.join("main.py"), "import flask").unwrap();

    let registry = ExtractorRegistry::with_defaults();
    let result = scan_directory(root, &registry, &ScanConfig::default()).unwrap();
    let paths: Vec<&str> = result.files.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["main.py"]);

    let config = ScanConfig {
        include_hidden: true,
        ..ScanConfig::default()
    };
    let result = scan_directory(root, &registry, &config).unwrap();
    assert!(result.files.contains_key(".cache/cached.py"));
    assert!(!result.files.contains_key("build/generated.py"));
}

#[test]
fn test_scan_limits() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for name in ["a.py", "b.py", "c.py"] {
        fs::write(root.join(name), "import os").unwrap();
    }
    fs::write(root.join("big.py"), "import x\n".repeat(100)).unwrap();

    let registry = ExtractorRegistry::with_defaults();

    let config = ScanConfig {
        max_files: 2,
        ..ScanConfig::default()
    };
    let result = scan_directory(root, &registry, &config).unwrap();
    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.files.len(), 2);

    let config = ScanConfig {
        max_file_size: 50,
        ..ScanConfig::default()
    };
    let result = scan_directory(root, &registry, &config).unwrap();
    assert_eq!(result.skipped, 1);
    assert!(!result.files.contains_key("big.py"));
}

#[test]
fn test_scan_keeps_java_packages_unresolved() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Empty.java"), "class Empty {}").unwrap();

    let result = scan_directory(
        dir.path(),
        &ExtractorRegistry::with_defaults(),
        &ScanConfig::default(),
    )
    .unwrap();
    let extraction = &result.files["Empty.java"];
    assert!(extraction.context.is_empty());
    assert_eq!(extraction.warnings.len(), 1);
}

#[test]
fn test_scan_rejects_files() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.py");
    fs::write(&file, "import os").unwrap();

    let err = scan_directory(
        &file,
        &ExtractorRegistry::with_defaults(),
        &ScanConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}
