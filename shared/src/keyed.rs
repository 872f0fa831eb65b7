//! Mutation of embedded sub-entity arrays addressed by numeric id.
//!
//! Products, waiters and similar parents store their sub-entities
//! (variations, ratings, notes, shifts, tables) denormalized as arrays
//! inside the parent document. Every mutation rewrites the whole array:
//! these helpers apply one insert/update/delete in memory, and the
//! repository layer persists the resulting array in a single document
//! update. Concurrent writers to the same array race at whole-array
//! granularity (last write wins); see DESIGN.md.

/// An element addressable by its numeric id within a parent's array.
pub trait Keyed {
    fn key(&self) -> i64;
}

/// Append `item` to the array. Insertion order is append order; the array
/// is never re-sorted.
pub fn insert<T: Keyed>(items: &mut Vec<T>, item: T) {
    debug_assert!(
        items.iter().all(|existing| existing.key() != item.key()),
        "duplicate sub-entity id {}",
        item.key()
    );
    items.push(item);
}

/// Replace the element whose id matches `item`. Returns `false` and leaves
/// the array untouched when no element matches.
pub fn update<T: Keyed>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.key() == item.key()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Remove the element with the given id. Returns `false` when absent.
pub fn remove<T: Keyed>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|existing| existing.key() != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    impl Keyed for Item {
        fn key(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn insert_appends_at_the_end() {
        let mut items = vec![Item { id: 1, name: "a" }];
        insert(&mut items, Item { id: 2, name: "b" });
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, 2);
    }

    #[test]
    fn insert_then_remove_restores_original() {
        let original = vec![Item { id: 1, name: "a" }, Item { id: 7, name: "b" }];
        let mut items = original.clone();
        insert(&mut items, Item { id: 9, name: "c" });
        assert!(remove(&mut items, 9));
        assert_eq!(items, original);
    }

    #[test]
    fn update_replaces_matching_element() {
        let mut items = vec![Item { id: 1, name: "a" }, Item { id: 2, name: "b" }];
        assert!(update(&mut items, Item { id: 2, name: "B" }));
        assert_eq!(items[1].name, "B");
        // Order unchanged
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn update_is_idempotent() {
        let mut once = vec![Item { id: 1, name: "a" }];
        update(&mut once, Item { id: 1, name: "z" });
        let mut twice = once.clone();
        update(&mut twice, Item { id: 1, name: "z" });
        assert_eq!(once, twice);
    }

    #[test]
    fn update_with_unknown_id_is_a_no_op() {
        let original = vec![Item { id: 1, name: "a" }];
        let mut items = original.clone();
        assert!(!update(&mut items, Item { id: 42, name: "x" }));
        assert_eq!(items, original);
    }

    #[test]
    fn remove_missing_id_returns_false() {
        let mut items = vec![Item { id: 1, name: "a" }];
        assert!(!remove(&mut items, 3));
        assert_eq!(items.len(), 1);
    }
}
