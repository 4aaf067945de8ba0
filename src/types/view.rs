use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkRecord;

/// Category slug that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Date,
    Title,
    #[default]
    BookmarkedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// How a bookmarks list wants the collection projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    #[serde(default = "all_categories")]
    pub category: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn all_categories() -> String {
    ALL_CATEGORIES.to_string()
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            category: all_categories(),
            search: String::new(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// A projected list plus the counts a list header or badge shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmarkView {
    pub records: Vec<BookmarkRecord>,
    /// Size of the whole collection.
    pub total: usize,
    /// Size of `records`.
    pub matched: usize,
}
