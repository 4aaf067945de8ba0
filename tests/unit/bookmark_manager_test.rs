//! Unit tests for `BookmarkManager`: membership, ordering, change events and
//! behavior when storage is missing, corrupt or full.

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;
use std::sync::{Arc, Mutex};

use blogsync::config::SyncConfig;
use blogsync::events::{EventBus, Subscription, BOOKMARK_CHANGED};
use blogsync::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use blogsync::storage::{MemoryStorageArea, PersistentStore, StorageArea};
use blogsync::types::bookmark::{Category, CategoryConnection, FeaturedImage, ImageNode, Post};
use blogsync::types::events::{ChangeKind, SyncEvent};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn setup_with(area: Arc<MemoryStorageArea>) -> (BookmarkManager, EventBus<SyncEvent>) {
    let bus = EventBus::new();
    let manager = BookmarkManager::new(PersistentStore::new(area), bus.clone(), &SyncConfig::default())
        .with_clock(fixed_clock);
    (manager, bus)
}

fn setup() -> (Arc<MemoryStorageArea>, BookmarkManager, EventBus<SyncEvent>) {
    let area = Arc::new(MemoryStorageArea::new());
    let (manager, bus) = setup_with(area.clone());
    (area, manager, bus)
}

fn record_events(bus: &EventBus<SyncEvent>) -> (Arc<Mutex<Vec<SyncEvent>>>, Subscription) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let sub = bus.subscribe(BOOKMARK_CHANGED, move |e: &SyncEvent| sink.lock().unwrap().push(e.clone()));
    (events, sub)
}

fn post(id: &str) -> Post {
    Post::new(id, &format!("Post {}", id), "2024-01-01T00:00:00")
}

fn rich_post() -> Post {
    let mut p = post("p1");
    p.slug = "hello-world".to_string();
    p.excerpt = "<p>Hello</p>".to_string();
    p.featured_image = Some(FeaturedImage {
        node: ImageNode {
            source_url: "https://cdn.example/hello.jpg".to_string(),
            alt_text: "Hello".to_string(),
        },
    });
    p.categories = Some(CategoryConnection {
        nodes: vec![Category {
            id: "c1".to_string(),
            name: "Rust".to_string(),
            slug: "rust".to_string(),
        }],
    });
    p.extra.insert("content".to_string(), serde_json::json!("<p>long body</p>"));
    p
}

// ─── Add ───

#[test]
fn test_add_snapshots_allow_listed_fields() {
    let (area, manager, _bus) = setup();
    let records = manager.add(&rich_post());

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "p1");
    assert_eq!(record.slug, "hello-world");
    assert_eq!(record.bookmarked_at, "2024-05-01T12:00:00.000Z");
    assert_eq!(record.category_nodes().count(), 1);

    let raw = area.get_item("bookmarks_v1").unwrap().unwrap();
    assert!(raw.contains("\"bookmarkedAt\""));
    assert!(raw.contains("\"featuredImage\""));
    assert!(!raw.contains("long body"), "non-allow-listed fields must not be persisted");
}

#[test]
fn test_add_prepends_newest_first() {
    let (_, manager, _bus) = setup();
    manager.add(&post("a"));
    manager.add(&post("b"));
    let records = manager.add(&post("c"));
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}

#[test]
fn test_add_existing_id_is_noop_without_event() {
    let (_, manager, bus) = setup();
    manager.add(&post("a"));
    let (events, _sub) = record_events(&bus);

    let records = manager.add(&post("a"));

    assert_eq!(records.len(), 1);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_add_publishes_change_with_record() {
    let (_, manager, bus) = setup();
    let (events, _sub) = record_events(&bus);
    manager.add(&post("a"));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SyncEvent::Bookmark(change) => {
            assert_eq!(change.kind, ChangeKind::Add);
            assert_eq!(change.post.as_ref().map(|r| r.id.as_str()), Some("a"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_add_post_without_id_is_ignored() {
    let (_, manager, bus) = setup();
    manager.add(&post("a"));
    let (events, _sub) = record_events(&bus);

    let records = manager.add(&Post::new("", "Untitled", ""));
    assert_eq!(records.len(), 1);
    assert!(events.lock().unwrap().is_empty());
}

// ─── Remove / toggle / clear ───

#[test]
fn test_remove_existing_publishes_removed_record() {
    let (_, manager, bus) = setup();
    manager.add(&post("a"));
    manager.add(&post("b"));
    let (events, _sub) = record_events(&bus);

    let records = manager.remove("a");

    assert_eq!(records.len(), 1);
    assert!(!manager.is_member("a"));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SyncEvent::Bookmark(change) => {
            assert_eq!(change.kind, ChangeKind::Remove);
            assert_eq!(change.post.as_ref().map(|r| r.id.as_str()), Some("a"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_remove_absent_id_changes_nothing() {
    let (_, manager, bus) = setup();
    manager.add(&post("a"));
    let (events, _sub) = record_events(&bus);

    let records = manager.remove("zzz");
    assert_eq!(records.len(), 1);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_toggle_flips_membership() {
    let (_, manager, _bus) = setup();
    assert!(manager.toggle(&post("a")));
    assert!(manager.is_member("a"));
    assert!(!manager.toggle(&post("a")));
    assert!(!manager.is_member("a"));
}

#[test]
fn test_toggle_reads_membership_fresh_from_storage() {
    let area = Arc::new(MemoryStorageArea::new());
    let (first, _) = setup_with(area.clone());
    let (second, _) = setup_with(area);

    first.add(&post("a"));
    // The second manager never saw the add, but must act on it.
    assert!(!second.toggle(&post("a")));
    assert!(!first.is_member("a"));
}

#[test]
fn test_toggle_during_outage_reports_not_bookmarked() {
    let (area, manager, bus) = setup();
    area.set_available(false);
    let (events, _sub) = record_events(&bus);

    assert!(!manager.toggle(&post("p1")));
    assert!(!manager.toggle(&post("p1")));
    assert!(events.lock().unwrap().is_empty());

    area.set_available(true);
    assert!(!manager.is_member("p1"));
    assert!(manager.toggle(&post("p1")));
}

#[test]
fn test_toggle_post_without_id_is_noop() {
    let (_, manager, _bus) = setup();
    assert!(!manager.toggle(&Post::new("", "Untitled", "")));
    assert_eq!(manager.count(), 0);
}

#[test]
fn test_toggle_reports_false_when_write_does_not_land() {
    let area = Arc::new(MemoryStorageArea::with_quota(32));
    let (manager, _bus) = setup_with(area);
    assert!(!manager.toggle(&post("p1")));
    assert!(!manager.is_member("p1"));
}

#[test]
fn test_clear_empties_and_publishes() {
    let (area, manager, bus) = setup();
    manager.add(&post("a"));
    manager.add(&post("b"));
    let (events, _sub) = record_events(&bus);

    manager.clear();

    assert_eq!(manager.count(), 0);
    assert_eq!(area.get_item("bookmarks_v1").unwrap().as_deref(), Some("[]"));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        SyncEvent::Bookmark(change) if change.kind == ChangeKind::Clear && change.post.is_none()
    ));
}

// ─── Queries ───

#[test]
fn test_get_and_count() {
    let (_, manager, _bus) = setup();
    manager.add(&post("a"));
    manager.add(&post("b"));
    assert_eq!(manager.count(), 2);
    assert_eq!(manager.get("b").map(|r| r.title), Some("Post b".to_string()));
    assert!(manager.get("c").is_none());
}

#[test]
fn test_categories_are_distinct_in_first_seen_order() {
    let (_, manager, _bus) = setup();
    let mut go = post("g");
    go.categories = Some(CategoryConnection {
        nodes: vec![
            Category { id: "c2".into(), name: "Go".into(), slug: "go".into() },
            Category { id: "c1".into(), name: "Rust".into(), slug: "rust".into() },
        ],
    });
    manager.add(&rich_post());
    manager.add(&go);

    let slugs: Vec<String> = manager.categories().into_iter().map(|c| c.slug).collect();
    assert_eq!(slugs, vec!["go", "rust"]);
}

// ─── Persisted data repair ───

#[rstest]
#[case::not_json("{{{")]
#[case::object(r#"{"id":"a"}"#)]
#[case::null("null")]
fn test_corrupt_collection_reads_as_empty(#[case] raw: &str) {
    let (area, manager, _bus) = setup();
    area.set_item("bookmarks_v1", raw).unwrap();
    assert!(manager.list().is_empty());
    assert!(!manager.is_member("a"));
}

#[test]
fn test_add_over_corrupt_collection_replaces_it() {
    let (area, manager, _bus) = setup();
    area.set_item("bookmarks_v1", "{{{").unwrap();
    let records = manager.add(&post("a"));
    assert_eq!(records.len(), 1);
    assert!(area.get_item("bookmarks_v1").unwrap().unwrap().starts_with('['));
}

#[test]
fn test_legacy_records_are_default_filled_and_deduplicated() {
    let (area, manager, _bus) = setup();
    area.set_item(
        "bookmarks_v1",
        r#"[{"id":"a","title":"First"},{"id":"a","title":"Second"},{"title":"no id"},42,{"id":"b"}]"#,
    )
    .unwrap();

    let records = manager.list();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(records[0].title, "First");
    assert_eq!(records[1].bookmarked_at, "");
}

// ─── Storage failures ───

#[test]
fn test_unavailable_storage_yields_empty_and_no_event() {
    let (area, manager, bus) = setup();
    manager.add(&post("a"));
    area.set_available(false);
    let (events, _sub) = record_events(&bus);

    assert!(manager.add(&post("b")).is_empty());
    assert!(manager.remove("a").is_empty());
    manager.clear();
    assert!(!manager.is_member("a"));
    assert_eq!(manager.count(), 0);
    assert!(events.lock().unwrap().is_empty());

    area.set_available(true);
    assert_eq!(manager.count(), 1, "data written before the outage is intact");
}

#[test]
fn test_quota_exceeded_keeps_previous_collection() {
    let area = Arc::new(MemoryStorageArea::with_quota(200));
    let (manager, bus) = setup_with(area);
    manager.add(&post("a"));
    let (events, _sub) = record_events(&bus);

    let mut big = post("b");
    big.excerpt = "x".repeat(500);
    let returned = manager.add(&big);

    assert_eq!(returned.len(), 2, "caller still gets the in-memory result");
    assert_eq!(manager.count(), 1, "storage keeps the last successful write");
    assert!(events.lock().unwrap().is_empty());
}
