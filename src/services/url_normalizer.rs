//! URL and tag normalization shared by the store and the resolver.

use std::collections::HashSet;

use url::Url;

use crate::types::errors::BookmarkError;

/// Normalizes a user-entered URL so it always carries an `http(s)` scheme.
///
/// A bare host such as `example.com` becomes `https://example.com`. The
/// string is otherwise kept as entered (no trailing slash is added).
///
/// # Errors
/// `BookmarkError::InvalidUrl` if the input is blank, names a non-HTTP scheme,
/// or does not parse to a URL with a host.
pub fn normalize_url(raw: &str) -> Result<String, BookmarkError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(BookmarkError::InvalidUrl("URL is empty".to_string()));
    }

    let lowered = input.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        input.to_string()
    } else if lowered.contains("://") {
        return Err(BookmarkError::InvalidUrl(input.to_string()));
    } else {
        format!("https://{}", input)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| BookmarkError::InvalidUrl(format!("{} ({})", input, e)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(BookmarkError::InvalidUrl(input.to_string())),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(BookmarkError::InvalidUrl(input.to_string()));
    }

    Ok(candidate)
}

/// Returns the host name of an absolute URL.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

/// Returns the origin (`scheme://host[:port]/`) of an absolute URL.
pub fn origin_of(url: &str) -> Option<Url> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Url::parse(&origin.ascii_serialization()).ok()
}

/// Strips the `http://` / `https://` prefix for compact display.
pub fn display_url(url: &str) -> &str {
    for prefix in ["https://", "http://"] {
        let bytes = url.as_bytes();
        if bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
            return &url[prefix.len()..];
        }
    }
    url
}

/// Lower-cases, trims and deduplicates tags, keeping first-occurrence order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.clone()) {
            normalized.push(tag);
        }
    }
    normalized
}
