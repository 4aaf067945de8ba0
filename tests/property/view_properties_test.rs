//! Property-based tests for view engine projections.

use std::cmp::Ordering;

use blogsync::services::view_engine::{filter_by_category, parse_timestamp, project, search, sort};
use blogsync::types::bookmark::{BookmarkRecord, Category, CategoryConnection};
use blogsync::types::view::{SortKey, SortOrder, ViewQuery};
use proptest::prelude::*;

fn arb_slug() -> impl Strategy<Value = String> {
    prop_oneof![Just("rust"), Just("go"), Just("python"), Just("news")].prop_map(String::from)
}

/// Records with distinct dates, bookmark times and titles so sort order is unique.
fn arb_records() -> impl Strategy<Value = Vec<BookmarkRecord>> {
    prop::collection::vec(
        (
            "[a-zA-Z]{1,12}",
            "[a-z ]{0,20}",
            prop::collection::vec(arb_slug(), 0..3),
        ),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, excerpt, slugs))| BookmarkRecord {
                id: format!("p{}", i),
                title: format!("{}{:03}", title, i),
                slug: format!("post-{}", i),
                excerpt,
                date: format!("2023-01-{:02}T00:00:00", (i % 28) + 1) + &format!(".{:03}", i),
                featured_image: None,
                categories: Some(CategoryConnection {
                    nodes: slugs
                        .into_iter()
                        .map(|s| Category {
                            id: s.clone(),
                            name: s.to_uppercase(),
                            slug: s,
                        })
                        .collect(),
                }),
                bookmarked_at: format!("2024-02-01T00:{:02}:00.000Z", i),
            })
            .collect()
    })
}

fn arb_key() -> impl Strategy<Value = SortKey> {
    prop_oneof![Just(SortKey::Date), Just(SortKey::Title), Just(SortKey::BookmarkedAt)]
}

/// The order relation `sort` must respect, written out independently.
fn order_by(key: SortKey, a: &BookmarkRecord, b: &BookmarkRecord) -> Ordering {
    match key {
        SortKey::Date => parse_timestamp(&a.date).cmp(&parse_timestamp(&b.date)),
        SortKey::BookmarkedAt => parse_timestamp(&a.bookmarked_at).cmp(&parse_timestamp(&b.bookmarked_at)),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

fn ids(records: &[BookmarkRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Sorting keeps every record exactly once.
    #[test]
    fn sort_is_a_permutation(records in arb_records(), key in arb_key()) {
        let sorted = sort(&records, key, SortOrder::Asc);
        let mut before = ids(&records);
        let mut after = ids(&sorted);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    // Adjacent records respect the order relation, in both directions.
    #[test]
    fn adjacent_pairs_are_ordered(records in arb_records(), key in arb_key()) {
        let asc = sort(&records, key, SortOrder::Asc);
        prop_assert!(asc.windows(2).all(|w| order_by(key, &w[0], &w[1]) != Ordering::Greater));
        let desc = sort(&records, key, SortOrder::Desc);
        prop_assert!(desc.windows(2).all(|w| order_by(key, &w[0], &w[1]) != Ordering::Less));
    }

    // Sorting descending after ascending reverses the ascending sequence.
    #[test]
    fn resorting_desc_reverses_asc(records in arb_records(), key in arb_key()) {
        let asc = sort(&records, key, SortOrder::Asc);
        let mut expected = ids(&asc);
        expected.reverse();
        prop_assert_eq!(ids(&sort(&asc, key, SortOrder::Desc)), expected);
    }

    // With distinct keys, descending is ascending reversed.
    #[test]
    fn desc_reverses_asc(records in arb_records(), key in arb_key()) {
        let mut asc = ids(&sort(&records, key, SortOrder::Asc));
        let desc = ids(&sort(&records, key, SortOrder::Desc));
        asc.reverse();
        prop_assert_eq!(asc, desc);
    }

    // Search and category filter only ever narrow the collection.
    #[test]
    fn search_and_filter_return_subsets(
        records in arb_records(),
        query in "[a-z]{0,3}",
        slug in arb_slug(),
    ) {
        let all = ids(&records);
        for found in [search(&records, &query), filter_by_category(&records, &slug)] {
            prop_assert!(found.iter().all(|r| all.contains(&r.id)));
        }
        for r in filter_by_category(&records, &slug) {
            prop_assert!(r.category_nodes().any(|c| c.slug == slug));
        }
    }

    // The default query shows everything.
    #[test]
    fn default_query_matches_all(records in arb_records()) {
        let view = project(&records, &ViewQuery::default());
        prop_assert_eq!(view.matched, records.len());
        prop_assert_eq!(view.total, records.len());
        prop_assert_eq!(search(&records, "   ").len(), records.len());
    }
}
