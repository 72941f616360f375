//! HTTP client for the recommendation backend
//!
//! One [`CompassClient`] is built from a [`CompassConfig`] snapshot and reused
//! for every request. It carries the client and user identity headers, the
//! request timeout and the optional proxy. Requests are never retried.
//!
//! # Example
//!
//! ```no_run
//! use code_compass::backend::CompassClient;
//! use code_compass::config::CompassConfig;
//! use code_compass::extract::Language;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CompassConfig::default().with_persisted_user_key()?;
//! let client = CompassClient::new(&config)?;
//!
//! let modules = client
//!     .modules_for_packages(Language::Java, &["com.google.common.collect".to_string()])
//!     .await?;
//! println!("{:?}", modules);
//! # Ok(())
//! # }
//! ```

use super::error::BackendError;
use super::types::{
    FilteredCategoriesRequest, LibsResponse, NearestCategories, SearchRequest, SearchResponse,
    Snippets,
};
use crate::config::CompassConfig;
use crate::extract::{Context, Language};
use crate::resolve::ModuleResolver;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Longest response excerpt kept in an `InvalidResponse` error
const MAX_RAW_RESPONSE: usize = 512;

/// Header carrying the client build identity, under the name the backend
/// expects from editor plugins.
pub const CLIENT_KEY_HEADER: &str = "vscode_plugin_key";

#[derive(Debug, Clone)]
pub struct CompassClient {
    /// Backend base URL in `scheme://host:port` form
    server_url: String,

    user_key: Option<String>,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    timeout: Duration,
}

impl CompassClient {
    pub fn new(config: &CompassConfig) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_KEY_HEADER, header_value(&config.client_key())?);
        if let Some(key) = &config.user_key {
            headers.insert("user_key", header_value(key)?);
        }

        // Only the configured proxy is used; system proxy variables are ignored.
        let mut builder = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .no_proxy();
        if let Some(proxy) = &config.proxy {
            debug!(proxy = %proxy, "Routing backend requests through proxy");
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| BackendError::ConfigurationError {
                message: format!("Invalid proxy '{}': {}", proxy, e),
            })?;
            builder = builder.proxy(proxy);
        }

        let http_client = builder
            .build()
            .map_err(|e| BackendError::ConfigurationError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            server_url: config.server_url.trim_end_matches('/').to_string(),
            user_key: config.user_key.clone(),
            http_client,
            timeout,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Maps package-level identifiers to registry module names.
    pub async fn modules_for_packages(
        &self,
        language: Language,
        packages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        let path = format!("/mapping/{}/modulesForPackages", language);
        self.post_json(&path, &packages).await
    }

    /// Searches for modules matching an intent, given the current context.
    pub async fn search_by_intent(
        &self,
        language: Language,
        context: &Context,
        intent: &str,
        filter: Option<&str>,
    ) -> Result<SearchResponse, BackendError> {
        let request = SearchRequest::new(context, intent, filter);
        debug!(intent = %request.intent, "Searching by intent");
        let path = format!("/searchByIntent/{}", language);
        self.post_json(&path, &request).await
    }

    /// Nearest categories for a context; uses the filtered endpoint when a
    /// non-empty filter is given.
    pub async fn nearest_categories(
        &self,
        language: Language,
        num: usize,
        context: &Context,
        filter: Option<&str>,
    ) -> Result<NearestCategories, BackendError> {
        match filter.filter(|f| !f.is_empty()) {
            Some(filter) => {
                let path = format!("/filteredNearestCategories/{}/{}", language, num);
                let request = FilteredCategoriesRequest {
                    context: context.as_slice(),
                    filter,
                };
                self.post_json(&path, &request).await
            }
            None => {
                let path = format!("/nearestCategories/{}/{}", language, num);
                self.post_json(&path, &context.as_slice()).await
            }
        }
    }

    /// Usage snippets keyed by module name.
    pub async fn snippets(&self, language: Language) -> Result<Snippets, BackendError> {
        let snippets: Snippets = self.get_json(&format!("/getSnippets/{}", language)).await?;
        info!("Got {} snippets from server", snippets.len());
        Ok(snippets)
    }

    /// Intents the backend knows for a language.
    pub async fn intents(&self, language: Language) -> Result<Vec<serde_json::Value>, BackendError> {
        self.get_json(&format!("/intents/{}", language)).await
    }

    /// Library catalogue for a language.
    pub async fn libs(&self, language: Language) -> Result<LibsResponse, BackendError> {
        let libs: LibsResponse = self.get_json(&format!("/libs/{}", language)).await?;
        info!("{} libs downloaded", libs.total);
        Ok(libs)
    }

    /// Sends free-form feedback. The response body is ignored.
    pub async fn feedback(&self, body: &serde_json::Value) -> Result<(), BackendError> {
        let url = format!("{}/feedback", self.server_url);
        let user_key = self.user_key.as_deref().unwrap_or_default();

        let response = self
            .http_client
            .post(&url)
            .query(&[("userKey", user_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Feedback rejected with status {}: {}", status, body);
            return Err(BackendError::ApiError {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status.as_u16()),
            });
        }

        info!("Feedback sent");
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.server_url, path);
        let request = self.http_client.get(&url);
        self.send_json(path, &url, request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.server_url, path);
        let request = self.http_client.post(&url).json(body);
        self.send_json(path, &url, request).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        debug!(url = %url, "Sending backend request");
        let start = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if !status.is_success() {
            error!("Backend returned error status {} for {}: {}", status, path, text);
            return Err(BackendError::ApiError {
                message: format!("HTTP {}: {}", status, text),
                status_code: Some(status.as_u16()),
            });
        }

        let parsed = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse backend response for {}: {}", path, e);
            BackendError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: Some(truncate(&text)),
            }
        })?;

        debug!(
            "Backend request {} completed in {:.2}s",
            path,
            start.elapsed().as_secs_f64()
        );
        Ok(parsed)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> BackendError {
        if e.is_connect() {
            error!("Cannot connect to backend at {}", self.server_url);
        } else {
            error!("Backend request to {} failed: {}", url, e);
        }
        BackendError::from_reqwest(e, self.timeout.as_secs())
    }
}

#[async_trait]
impl ModuleResolver for CompassClient {
    async fn resolve(
        &self,
        language: Language,
        packages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        self.modules_for_packages(language, packages).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, BackendError> {
    HeaderValue::from_str(value).map_err(|e| BackendError::ConfigurationError {
        message: format!("Invalid header value '{}': {}", value, e),
    })
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_RAW_RESPONSE) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
