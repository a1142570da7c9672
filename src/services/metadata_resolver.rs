//! Metadata Resolver for Linkshelf.
//!
//! Turns a URL into a fully populated [`PageMetadata`] by fetching the page
//! through a public relay and scanning its markup. Any failure along the way
//! degrades to host-based defaults; callers never see an error.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::services::favicon::FaviconFallback;
use crate::services::html_metadata::{degraded_metadata, extract_metadata};
use crate::types::errors::FetchError;
use crate::types::metadata::PageMetadata;
use crate::types::settings::ResolverSettings;

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Trait defining metadata resolution.
#[async_trait]
pub trait MetadataResolverTrait: Send + Sync {
    /// Best-effort `{title, description, favicon}` for an absolute URL.
    async fn resolve(&self, url: &str) -> PageMetadata;
    /// Host-based icon URL used when no icon is known.
    fn fallback_favicon(&self, url: &str) -> String;
}

/// Fetches pages through a CORS-style relay that returns the target's raw HTML.
pub struct ProxyFetcher {
    client: reqwest::Client,
    proxy_url: String,
    max_body_bytes: usize,
}

impl ProxyFetcher {
    pub fn new(settings: &ResolverSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            proxy_url: settings.proxy_url.clone(),
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// Relay URL for a target page: the target is percent-encoded into the query.
    pub fn relay_url(&self, target: &str) -> String {
        format!("{}{}", self.proxy_url, urlencoding::encode(target))
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(self.relay_url(url))
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.2",
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_markup_content_type(content_type) {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while body.len() < self.max_body_bytes {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) if e.is_timeout() => return Err(FetchError::Timeout(url.to_string())),
                Err(e) => return Err(FetchError::Body(e.to_string())),
            }
        }

        Ok(decode_capped(body, self.max_body_bytes))
    }
}

/// Whether a response content type can hold a document worth parsing.
/// Any `text/*`, HTML or XML type counts, as does an empty value.
pub fn is_markup_content_type(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.is_empty() || ct.starts_with("text/") || ct.contains("html") || ct.contains("xml")
}

/// Decodes at most `max_bytes` of a body as UTF-8, dropping a multi-byte
/// sequence split by the cap.
fn decode_capped(mut body: Vec<u8>, max_bytes: usize) -> String {
    body.truncate(max_bytes);
    if let Err(e) = std::str::from_utf8(&body) {
        if e.error_len().is_none() {
            body.truncate(e.valid_up_to());
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Resolver handle whose inner resolver can be replaced while the store
/// keeps using it, e.g. after `resolver.*` settings change.
pub struct SharedResolver {
    inner: RwLock<Arc<dyn MetadataResolverTrait>>,
}

impl SharedResolver {
    pub fn new(inner: Arc<dyn MetadataResolverTrait>) -> Self {
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn replace(&self, inner: Arc<dyn MetadataResolverTrait>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = inner;
    }

    fn current(&self) -> Arc<dyn MetadataResolverTrait> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl MetadataResolverTrait for SharedResolver {
    async fn resolve(&self, url: &str) -> PageMetadata {
        let resolver = self.current();
        resolver.resolve(url).await
    }

    fn fallback_favicon(&self, url: &str) -> String {
        self.current().fallback_favicon(url)
    }
}

/// Metadata resolver: one fetch, then the extraction fallback chain.
pub struct MetadataResolver {
    fetcher: Arc<dyn PageFetcher>,
    fallback: FaviconFallback,
    description_max_chars: usize,
}

impl MetadataResolver {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        fallback: FaviconFallback,
        description_max_chars: usize,
    ) -> Self {
        Self {
            fetcher,
            fallback,
            description_max_chars,
        }
    }

    /// Resolver that goes through the configured relay.
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, FetchError> {
        let fetcher = ProxyFetcher::new(settings)?;
        Ok(Self::new(
            Arc::new(fetcher),
            FaviconFallback::from_settings(settings),
            settings.description_max_chars,
        ))
    }
}

#[async_trait]
impl MetadataResolverTrait for MetadataResolver {
    async fn resolve(&self, url: &str) -> PageMetadata {
        match self.fetcher.fetch(url).await {
            Ok(html) => {
                let metadata =
                    extract_metadata(&html, url, &self.fallback, self.description_max_chars);
                log::debug!("[RESOLVER] Resolved {} -> {:?}", url, metadata.title);
                metadata
            }
            Err(e) => {
                log::warn!("[RESOLVER] Falling back to host metadata for {}: {}", url, e);
                degraded_metadata(url, &self.fallback)
            }
        }
    }

    fn fallback_favicon(&self, url: &str) -> String {
        self.fallback.for_url(url)
    }
}
