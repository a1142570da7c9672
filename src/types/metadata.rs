use serde::{Deserialize, Serialize};

/// Best-effort description of a remote page.
///
/// Every field is always populated: a failed lookup yields host-based
/// defaults rather than missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub favicon: String,
}

impl PageMetadata {
    /// Title used when a page parses but carries neither `<title>` nor `og:title`.
    pub const UNTITLED: &'static str = "No Title";
}
