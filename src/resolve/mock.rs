use super::ModuleResolver;
use crate::backend::BackendError;
use crate::extract::Language;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Resolver that replays scripted responses in order and records every call.
pub struct MockModuleResolver {
    responses: Mutex<VecDeque<Result<Vec<String>, BackendError>>>,
    calls: Mutex<Vec<ResolverCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
    pub language: Language,
    pub packages: Vec<String>,
}

impl MockModuleResolver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_modules<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolver = Self::new();
        resolver.add_modules(modules);
        resolver
    }

    pub fn add_modules<I, S>(&self, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let modules = modules.into_iter().map(Into::into).collect();
        lock(&self.responses).push_back(Ok(modules));
    }

    pub fn add_error(&self, error: BackendError) {
        lock(&self.responses).push_back(Err(error));
    }

    pub fn remaining_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    pub fn calls(&self) -> Vec<ResolverCall> {
        lock(&self.calls).clone()
    }
}

impl Default for MockModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleResolver for MockModuleResolver {
    async fn resolve(
        &self,
        language: Language,
        packages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        lock(&self.calls).push(ResolverCall {
            language,
            packages: packages.to_vec(),
        });

        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendError::ConfigurationError {
                    message: "MockModuleResolver: No more responses in queue".to_string(),
                })
            })
    }
}

impl std::fmt::Debug for MockModuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockModuleResolver")
            .field("remaining_responses", &self.remaining_responses())
            .field("calls", &lock(&self.calls).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
