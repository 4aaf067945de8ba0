// Blogsync view engine
// Pure projections of a bookmark snapshot: category filter, text search, sort.
// Nothing here touches storage; call as often as needed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::bookmark::{BookmarkRecord, Category};
use crate::types::view::{BookmarkView, SortKey, SortOrder, ViewQuery, ALL_CATEGORIES};

/// Parses a CMS timestamp into milliseconds since the Unix epoch.
///
/// Accepts RFC 3339, zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and
/// plain `YYYY-MM-DD`. Anything else maps to 0 so ordering stays total.
pub fn parse_timestamp(value: &str) -> i64 {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.timestamp_millis();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return dt.and_utc().timestamp_millis();
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn compare(a: &BookmarkRecord, b: &BookmarkRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => parse_timestamp(&a.date).cmp(&parse_timestamp(&b.date)),
        SortKey::BookmarkedAt => {
            parse_timestamp(&a.bookmarked_at).cmp(&parse_timestamp(&b.bookmarked_at))
        }
        SortKey::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
    }
}

/// Stable sort by `key`.
///
/// Titles compare by Unicode lowercase with the raw title as tiebreak. This
/// approximates locale collation: accented letters order by code point, not
/// by a language's alphabet.
pub fn sort(records: &[BookmarkRecord], key: SortKey, order: SortOrder) -> Vec<BookmarkRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Keeps records with a category whose slug equals `category_slug`.
///
/// `"all"` keeps everything.
pub fn filter_by_category(records: &[BookmarkRecord], category_slug: &str) -> Vec<BookmarkRecord> {
    if category_slug == ALL_CATEGORIES {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.category_nodes().any(|c| c.slug == category_slug))
        .cloned()
        .collect()
}

fn matches(record: &BookmarkRecord, needle: &str) -> bool {
    if record.title.to_lowercase().contains(needle) || record.excerpt.to_lowercase().contains(needle) {
        return true;
    }
    let names: Vec<&str> = record.category_nodes().map(|c| c.name.as_str()).collect();
    names.join(" ").to_lowercase().contains(needle)
}

/// Case-insensitive substring search over title, excerpt and category names.
///
/// Leading and trailing whitespace in `query` is ignored, so a blank or
/// whitespace-only query returns the records unchanged.
pub fn search(records: &[BookmarkRecord], query: &str) -> Vec<BookmarkRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(r, &needle))
        .cloned()
        .collect()
}

/// Applies `query` as filter, then search, then sort.
pub fn project(records: &[BookmarkRecord], query: &ViewQuery) -> BookmarkView {
    let filtered = filter_by_category(records, &query.category);
    let found = search(&filtered, &query.search);
    let sorted = sort(&found, query.sort_key, query.sort_order);
    BookmarkView {
        total: records.len(),
        matched: sorted.len(),
        records: sorted,
    }
}

/// Distinct categories (by slug) in order of first appearance.
pub fn categories(records: &[BookmarkRecord]) -> Vec<Category> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.category_nodes())
        .filter(|c| seen.insert(c.slug.clone()))
        .cloned()
        .collect()
}
