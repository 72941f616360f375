//! Maven `pom.xml` dependency declarations

use super::{Context, DependencyExtractor, Extraction, Language, SupportedKind};
use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
enum PomError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <project>")]
    NotAProject(String),

    #[error("<project> has no <dependencies> element")]
    MissingDependencies,

    #[error("dependency #{index} is missing <{field}>")]
    IncompleteDependency { index: usize, field: &'static str },
}

/// Reads `<project><dependencies><dependency>` entries as `groupId:artifactId`.
///
/// Entries are reported in document order and repeated declarations are kept.
/// Only the project's own `<dependencies>` block is read; managed dependencies
/// and plugin dependencies are ignored.
pub struct PomExtractor;

impl PomExtractor {
    fn parse(text: &str) -> Result<Context, PomError> {
        let doc = Document::parse(text)?;
        let project = doc.root_element();
        if !project.has_tag_name("project") {
            return Err(PomError::NotAProject(
                project.tag_name().name().to_string(),
            ));
        }

        let dependencies = project
            .children()
            .find(|n| n.has_tag_name("dependencies"))
            .ok_or(PomError::MissingDependencies)?;

        let mut context = Context::new();
        for (index, dependency) in dependencies
            .children()
            .filter(|n| n.has_tag_name("dependency"))
            .enumerate()
        {
            let group_id = child_text(dependency, "groupId")
                .ok_or(PomError::IncompleteDependency { index, field: "groupId" })?;
            let artifact_id = child_text(dependency, "artifactId").ok_or(
                PomError::IncompleteDependency {
                    index,
                    field: "artifactId",
                },
            )?;

            let coordinate = format!("{}:{}", group_id, artifact_id);
            debug!(dependency = %coordinate, "POM dependency");
            context.push(coordinate);
        }

        Ok(context)
    }
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl DependencyExtractor for PomExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::PomXml
    }

    fn language(&self) -> Language {
        Language::Java
    }

    fn extract(&self, text: &str) -> Extraction {
        match Self::parse(text) {
            Ok(context) => Extraction::new(context, Language::Java),
            Err(e) => {
                warn!(error = %e, "Failed to read dependencies from POM");
                Extraction::empty(Language::Java)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>demo</artifactId>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.managed</groupId>
        <artifactId>bom</artifactId>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>32.1.0-jre</version>
    </dependency>
    <dependency>
      <groupId> junit </groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
    </dependency>
  </dependencies>
</project>
"#;

    #[test]
    fn test_reads_project_dependencies_in_order_with_duplicates() {
        let result = PomExtractor.extract(POM);
        assert_eq!(
            result.context.as_slice(),
            &[
                "com.google.guava:guava",
                "junit:junit",
                "com.google.guava:guava"
            ]
        );
        assert_eq!(result.language, Language::Java);
    }

    #[test]
    fn test_malformed_xml_is_empty() {
        let result = PomExtractor.extract("<project><dependencies>");
        assert!(result.context.is_empty());
        assert_eq!(result.language, Language::Java);
    }

    #[test]
    fn test_missing_dependencies_is_empty() {
        let result = PomExtractor.extract("<project><artifactId>a</artifactId></project>");
        assert!(result.context.is_empty());
    }

    #[test]
    fn test_non_project_root_is_empty() {
        let result = PomExtractor.extract(
            "<settings><dependencies><dependency><groupId>a</groupId><artifactId>b</artifactId></dependency></dependencies></settings>",
        );
        assert!(result.context.is_empty());
    }

    #[test]
    fn test_incomplete_dependency_is_empty() {
        let pom = r#"<project><dependencies>
            <dependency><groupId>a</groupId><artifactId>b</artifactId></dependency>
            <dependency><groupId>c</groupId></dependency>
        </dependencies></project>"#;
        assert!(matches!(
            PomExtractor::parse(pom),
            Err(PomError::IncompleteDependency {
                index: 1,
                field: "artifactId"
            })
        ));
        assert!(PomExtractor.extract(pom).context.is_empty());
    }

    #[test]
    fn test_empty_dependencies_block() {
        let result = PomExtractor.extract("<project><dependencies/></project>");
        assert!(result.context.is_empty());
        assert!(result.warnings.is_empty());
    }
}
