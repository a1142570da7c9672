// Category and tag suggestions offered by the bookmark form.
// The store never enforces these; any category string is accepted.

use serde::{Deserialize, Serialize};

/// Synthetic category that matches every bookmark in filters.
pub const ALL_CATEGORIES: &str = "all";

/// Tags offered as one-click suggestions.
pub const SUGGESTED_TAGS: [&str; 7] = [
    "react",
    "javascript",
    "tutorial",
    "productivity",
    "design",
    "tools",
    "resources",
];

/// A one-click site shortcut for the add form. `url` is a bare host that
/// goes through the same URL normalization as typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAddSite {
    pub name: &'static str,
    pub url: &'static str,
}

/// Sites offered as quick-add shortcuts, in form order.
pub const QUICK_ADD_SITES: [QuickAddSite; 4] = [
    QuickAddSite { name: "GitHub", url: "github.com" },
    QuickAddSite { name: "YouTube", url: "youtube.com" },
    QuickAddSite { name: "MDN", url: "developer.mozilla.org" },
    QuickAddSite { name: "Twitter", url: "twitter.com" },
];

/// The suggested category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Learning,
    Entertainment,
    Shopping,
    Finance,
    Health,
    Travel,
}

impl Category {
    /// All suggested categories in form order.
    pub const ALL: [Category; 8] = [
        Category::Work,
        Category::Personal,
        Category::Learning,
        Category::Entertainment,
        Category::Shopping,
        Category::Finance,
        Category::Health,
        Category::Travel,
    ];

    /// Stored value of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Learning => "learning",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Travel => "travel",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Learning => "Learning",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Finance => "Finance",
            Category::Health => "Health",
            Category::Travel => "Travel",
        }
    }

    /// Parses a stored value back into a suggested category, if it is one.
    pub fn from_value(value: &str) -> Option<Category> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Work
    }
}
