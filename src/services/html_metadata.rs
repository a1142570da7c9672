//! HTML metadata extraction.
//!
//! A small tolerant scanner over raw markup: it finds start tags, reads their
//! attributes (quoted or not, any case) and applies the per-field fallback
//! chain. It never fails; missing or malformed markup only means a field
//! falls through to its next source.

use std::borrow::Cow;

use crate::services::favicon::FaviconFallback;
use crate::services::url_normalizer::{host_of, origin_of};
use crate::types::metadata::PageMetadata;

/// Attributes of one start tag, names lower-cased, values entity-decoded.
type Attributes = Vec<(String, String)>;

/// Extracts `{title, description, favicon}` from a page.
///
/// - title: `<title>` text, else `og:title`, else `"No Title"`
/// - description: `meta[name=description]`, else `og:description`, else empty;
///   truncated to `description_max_chars`
/// - favicon: `link[rel=icon]`, else `link[rel="shortcut icon"]`, else the
///   host-based fallback; relative hrefs resolve against the page origin
pub fn extract_metadata(
    html: &str,
    page_url: &str,
    fallback: &FaviconFallback,
    description_max_chars: usize,
) -> PageMetadata {
    let html = strip_comments(html);

    let title = extract_title(&html)
        .or_else(|| meta_content(&html, "property", "og:title"))
        .unwrap_or_else(|| PageMetadata::UNTITLED.to_string());

    let description = meta_content(&html, "name", "description")
        .or_else(|| meta_content(&html, "property", "og:description"))
        .map(|d| truncate_chars(&d, description_max_chars))
        .unwrap_or_default();

    let favicon = link_href(&html, "icon")
        .and_then(|href| resolve_href(&href, page_url))
        .or_else(|| link_href(&html, "shortcut icon").and_then(|href| resolve_href(&href, page_url)))
        .unwrap_or_else(|| fallback.for_url(page_url));

    PageMetadata {
        title,
        description,
        favicon,
    }
}

/// Text of the first `<title>` element, entity-decoded and whitespace-collapsed.
/// Title content is raw text, so a `<` inside it is kept as written.
pub fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let (_, content_start) = start_tags(html, "title").into_iter().next()?;
    let content_end = lower[content_start..]
        .find("</title")
        .map(|rel| content_start + rel)
        .unwrap_or(html.len());
    let text = decode_entities(&html[content_start..content_end]);
    non_empty(collapse_whitespace(&text))
}

/// `content` of the first `<meta>` whose `attr` equals `value` (case-insensitive).
pub fn meta_content(html: &str, attr: &str, value: &str) -> Option<String> {
    let (attrs, _) = start_tags(html, "meta")
        .into_iter()
        .find(|(attrs, _)| attr_eq(attrs, attr, value))?;
    attribute(&attrs, "content").and_then(|c| non_empty(c.trim().to_string()))
}

/// `href` of the first `<link>` whose `rel` is exactly `rel` (case-insensitive).
pub fn link_href(html: &str, rel: &str) -> Option<String> {
    let (attrs, _) = start_tags(html, "link")
        .into_iter()
        .find(|(attrs, _)| attr_eq(attrs, "rel", rel))?;
    attribute(&attrs, "href").and_then(|h| non_empty(h.trim().to_string()))
}

/// Resolves a discovered icon href against the origin of `page_url`.
///
/// Absolute `http(s)` hrefs pass through unchanged.
pub fn resolve_href(href: &str, page_url: &str) -> Option<String> {
    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Some(href.to_string());
    }
    let origin = origin_of(page_url)?;
    origin.join(href).ok().map(|u| u.to_string())
}

/// Fallback triple used whenever a page cannot be fetched or read.
pub fn degraded_metadata(page_url: &str, fallback: &FaviconFallback) -> PageMetadata {
    PageMetadata {
        title: host_of(page_url).unwrap_or_else(|| page_url.to_string()),
        description: String::new(),
        favicon: fallback.for_url(page_url),
    }
}

/// Truncates to at most `max_chars` characters.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect()
}

/// Decodes the handful of entities that commonly appear in titles and meta tags.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn attr_eq(attrs: &Attributes, name: &str, expected: &str) -> bool {
    attribute(attrs, name)
        .map(|v| collapse_whitespace(v).eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

fn attribute<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_comments(html: &str) -> Cow<'_, str> {
    if !html.contains("<!--") {
        return Cow::Borrowed(html);
    }
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Finds every `<tag ...>` start tag, returning its attributes and the byte
/// offset just past its closing `>`.
fn start_tags(html: &str, tag: &str) -> Vec<(Attributes, usize)> {
    let lower = html.to_ascii_lowercase();
    let bytes = html.as_bytes();
    let open = format!("<{}", tag);
    let mut found = Vec::new();
    let mut cursor = 0usize;

    while let Some(rel) = lower[cursor..].find(&open) {
        let name_end = cursor + rel + open.len();
        cursor = name_end;
        match bytes.get(name_end) {
            Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
            Some(_) => continue,
            None => break,
        }
        let tag_end = find_tag_end(bytes, name_end);
        found.push((parse_attributes(&html[name_end..tag_end]), (tag_end + 1).min(html.len())));
        cursor = (tag_end + 1).min(html.len());
    }
    found
}

/// Index of the `>` closing a start tag, skipping quoted attribute values.
fn find_tag_end(bytes: &[u8], from: usize) -> usize {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return i,
            None => {}
        }
    }
    bytes.len()
}

fn parse_attributes(raw: &str) -> Attributes {
    let bytes = raw.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if name_start == i {
            break;
        }
        let name = raw[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i];
                let value_start = i + 1;
                let value_end = bytes[value_start..]
                    .iter()
                    .position(|&b| b == q)
                    .map(|p| value_start + p)
                    .unwrap_or(bytes.len());
                value = decode_entities(&raw[value_start..value_end]);
                i = (value_end + 1).min(bytes.len());
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = decode_entities(&raw[value_start..i]);
            }
        }
        attrs.push((name, value));
    }
    attrs
}
