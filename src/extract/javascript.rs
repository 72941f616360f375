//! JavaScript `require(...)` calls and ES module imports

use super::{Context, DependencyExtractor, Extraction, Language, SupportedKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static JS_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\(["']([^"']+)["']\)"#).expect("valid regex"));

static JS_IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+[^'"\n;]+?\s+from\s+["']([^"'\n]+)["']"#).expect("valid regex")
});

pub struct JavaScriptExtractor;

impl JavaScriptExtractor {
    /// Relative (`./x`, `../x`) and absolute (`/x`) specifiers point into the
    /// project itself and are not dependencies.
    fn is_external(specifier: &str) -> bool {
        specifier
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '@')
    }
}

impl DependencyExtractor for JavaScriptExtractor {
    fn kind(&self) -> SupportedKind {
        SupportedKind::JavaScript
    }

    fn language(&self) -> Language {
        Language::Js
    }

    fn extract(&self, text: &str) -> Extraction {
        let mut modules = Context::new();

        for pattern in [&*JS_REQUIRE, &*JS_IMPORT_FROM] {
            for caps in pattern.captures_iter(text) {
                let specifier = &caps[1];
                if !Self::is_external(specifier) {
                    debug!(specifier, "Skipping local module specifier");
                    continue;
                }
                modules.push_unique(specifier);
            }
        }

        Extraction::new(modules, Language::Js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_and_import_with_local_excluded() {
        let text = r#"const a = require('lodash'); import {b} from "./local"; import c from "react";"#;
        let result = JavaScriptExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["lodash", "react"]);
        assert_eq!(result.language, Language::Js);
    }

    #[test]
    fn test_scoped_and_subpath_specifiers() {
        let text = r#"
import { Component } from '@angular/core';
import * as fp from "lodash/fp";
const express = require("express");
const helper = require('../helpers');
const abs = require('/opt/lib');
"#;
        let result = JavaScriptExtractor.extract(text);
        assert_eq!(
            result.context.as_slice(),
            &["express", "@angular/core", "lodash/fp"]
        );
    }

    #[test]
    fn test_requires_come_before_imports() {
        let text = "import x from 'first';\nconst y = require('second');";
        let result = JavaScriptExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["second", "first"]);
    }

    #[test]
    fn test_deduplicates_across_families() {
        let text = "const r = require('react');\nimport React from 'react';\nimport { useState } from 'react';";
        let result = JavaScriptExtractor.extract(text);
        assert_eq!(result.context.as_slice(), &["react"]);
    }

    #[test]
    fn test_side_effect_import_is_not_matched() {
        let result = JavaScriptExtractor.extract("import 'polyfill';");
        assert!(result.context.is_empty());
    }

    #[test]
    fn test_default_and_named_bindings() {
        let result =
            JavaScriptExtractor.extract("import React, { useEffect } from \"react\";\nimport axios from 'axios'");
        assert_eq!(result.context.as_slice(), &["react", "axios"]);
    }

    #[test]
    fn test_no_dependencies_is_empty_without_warning() {
        let result = JavaScriptExtractor.extract("console.log('hi');");
        assert!(result.context.is_empty());
        assert!(result.warnings.is_empty());
    }
}
