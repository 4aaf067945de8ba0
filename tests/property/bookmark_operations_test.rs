//! Property-based tests for Bookmark Manager operations.
//!
//! Arbitrary sequences of add, remove and toggle must keep the collection a
//! set keyed by post id, and every operation must agree with storage.

use std::collections::HashSet;
use std::sync::Arc;

use blogsync::config::SyncConfig;
use blogsync::events::EventBus;
use blogsync::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use blogsync::storage::{MemoryStorageArea, PersistentStore};
use blogsync::types::bookmark::Post;
use proptest::prelude::*;

fn manager() -> BookmarkManager {
    let area = Arc::new(MemoryStorageArea::new());
    BookmarkManager::new(PersistentStore::new(area), EventBus::new(), &SyncConfig::default())
}

/// Small id space so sequences revisit the same posts.
fn arb_id() -> impl Strategy<Value = String> {
    "p[0-9]{1,2}"
}

fn arb_post() -> impl Strategy<Value = Post> {
    (arb_id(), "[a-zA-Z][a-zA-Z0-9 ]{0,20}")
        .prop_map(|(id, title)| Post::new(&id, &title, "2024-01-01T00:00:00"))
}

#[derive(Debug, Clone)]
enum Op {
    Add(Post),
    Remove(String),
    Toggle(Post),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_post().prop_map(Op::Add),
        3 => arb_id().prop_map(Op::Remove),
        3 => arb_post().prop_map(Op::Toggle),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Adding the same post twice leaves the collection as after the first add.
    #[test]
    fn add_is_idempotent(posts in prop::collection::vec(arb_post(), 0..8), extra in arb_post()) {
        let manager = manager();
        for post in &posts {
            manager.add(post);
        }
        let once = manager.add(&extra);
        let twice = manager.add(&extra);
        prop_assert_eq!(once, twice);
        prop_assert!(manager.is_member(&extra.id));
    }

    // Removing a freshly added post restores the previous collection.
    #[test]
    fn add_then_remove_restores_collection(posts in prop::collection::vec(arb_post(), 0..8), extra in arb_post()) {
        let manager = manager();
        for post in &posts {
            manager.add(post);
        }
        prop_assume!(!manager.is_member(&extra.id));

        let before = manager.list();
        manager.add(&extra);
        let after = manager.remove(&extra.id);
        prop_assert_eq!(before, after);
    }

    // Toggling twice returns membership to where it started.
    #[test]
    fn toggle_twice_is_identity(posts in prop::collection::vec(arb_post(), 0..8), target in arb_post()) {
        let manager = manager();
        for post in &posts {
            manager.add(post);
        }
        let was_member = manager.is_member(&target.id);
        let first = manager.toggle(&target);
        let second = manager.toggle(&target);
        prop_assert_eq!(first, !was_member);
        prop_assert_eq!(second, was_member);
        prop_assert_eq!(manager.is_member(&target.id), was_member);
    }

    // Any operation sequence matches a plain set model and never duplicates an id.
    #[test]
    fn operations_match_set_model(ops in prop::collection::vec(arb_op(), 0..40)) {
        let manager = manager();
        let mut model: HashSet<String> = HashSet::new();

        for op in ops {
            match op {
                Op::Add(post) => {
                    manager.add(&post);
                    model.insert(post.id);
                }
                Op::Remove(id) => {
                    manager.remove(&id);
                    model.remove(&id);
                }
                Op::Toggle(post) => {
                    let now_member = manager.toggle(&post);
                    if !model.remove(&post.id) {
                        model.insert(post.id.clone());
                    }
                    prop_assert_eq!(now_member, manager.is_member(&post.id));
                }
                Op::Clear => {
                    manager.clear();
                    model.clear();
                }
            }
        }

        let records = manager.list();
        let ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(ids.len(), records.len(), "duplicate ids in collection");
        prop_assert_eq!(ids, model);
        prop_assert_eq!(manager.count(), records.len());
    }
}
