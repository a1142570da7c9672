//! Host-based favicon fallback URLs.

use crate::services::url_normalizer::host_of;
use crate::types::settings::ResolverSettings;

/// Builds favicon-by-domain service URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconFallback {
    service_url: String,
    size: u32,
}

impl FaviconFallback {
    pub fn new(service_url: impl Into<String>, size: u32) -> Self {
        Self {
            service_url: service_url.into(),
            size,
        }
    }

    pub fn from_settings(settings: &ResolverSettings) -> Self {
        Self::new(settings.favicon_service_url.clone(), settings.favicon_size)
    }

    /// Fallback icon URL for a host name.
    pub fn for_host(&self, host: &str) -> String {
        format!(
            "{}?domain={}&sz={}",
            self.service_url,
            urlencoding::encode(host),
            self.size
        )
    }

    /// Fallback icon URL for a page URL; the raw string stands in for an unparseable host.
    pub fn for_url(&self, url: &str) -> String {
        let host = host_of(url).unwrap_or_else(|| url.to_string());
        self.for_host(&host)
    }
}

impl Default for FaviconFallback {
    fn default() -> Self {
        Self::from_settings(&ResolverSettings::default())
    }
}
