//! Package-to-module resolution
//!
//! Java imports name packages, while the backend reasons about registry
//! modules (`group:artifact`). A [`ModuleResolver`] performs that mapping in a
//! single request per extraction. [`crate::backend::CompassClient`] is the
//! production implementation and [`MockModuleResolver`] serves tests.

mod mock;

pub use mock::{MockModuleResolver, ResolverCall};

use crate::backend::BackendError;
use crate::extract::Language;
use async_trait::async_trait;

#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolves the full package list at once. The response may have any
    /// cardinality.
    async fn resolve(
        &self,
        language: Language,
        packages: &[String],
    ) -> Result<Vec<String>, BackendError>;
}
