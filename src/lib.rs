//! code-compass - dependency contexts for library recommendations
//!
//! This library reads source files and dependency manifests, extracts the
//! external modules they declare and turns them into a context the
//! recommendation backend understands.
//!
//! # Core Concepts
//!
//! - **Classification**: a file name maps to one [`SupportedKind`] by extension
//! - **Extraction**: each kind has a [`extract::DependencyExtractor`] that pulls
//!   an ordered list of identifiers out of the raw text
//! - **Resolution**: Java package imports are mapped to registry modules by a
//!   [`ModuleResolver`], normally the [`CompassClient`]
//! - **Assembly**: [`ContextAssembler`] runs the whole chain for one document
//!
//! # Example Usage
//!
//! ```no_run
//! use code_compass::{CompassClient, CompassConfig, ContextAssembler, ContextOutcome};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CompassConfig::default().with_persisted_user_key()?;
//! let assembler = ContextAssembler::new(Arc::new(CompassClient::new(&config)?));
//!
//! let outcome = assembler
//!     .extract_context("app.py", "import numpy as np\nfrom pandas import DataFrame")
//!     .await?;
//! if let ContextOutcome::Extracted(extraction) = outcome {
//!     println!("{}: {:?}", extraction.language, extraction.context);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod backend;
pub mod cli;
pub mod config;
pub mod extract;
pub mod resolve;
pub mod scan;
pub mod util;

pub use assembler::{ContextAssembler, ContextOutcome, Document, ExtractionError};
pub use backend::{BackendError, CompassClient, SuggestionIndex};
pub use config::{CompassConfig, ConfigError};
pub use extract::{
    classify, Context, Extraction, ExtractionWarning, ExtractorRegistry, Language, SupportedKind,
};
pub use resolve::{MockModuleResolver, ModuleResolver};
pub use scan::{scan_directory, ScanConfig, ScanError, ScanResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "code-compass");
    }
}
