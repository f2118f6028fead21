use crate::host::TabId;

/// Most-recent-first activation history for one window's tabs.
///
/// `add` snapshots the list before mutating, so the effects of the last
/// activation can be undone with `rewind`. Removals are deliberately not
/// snapshotted; only add/rewind pairs participate in undo.
#[derive(Debug, Clone, Default)]
pub struct RecencyList {
    items: Vec<TabId>,
    snapshot: Vec<TabId>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently activated tab.
    pub fn first(&self) -> Option<TabId> {
        self.items.first().copied()
    }

    /// The second most recently activated tab.
    pub fn second(&self) -> Option<TabId> {
        self.items.get(1).copied()
    }

    /// Moves `id` to the front, snapshotting the previous order. A tab id
    /// never appears twice.
    pub fn add(&mut self, id: TabId) {
        self.snapshot = self.items.clone();
        self.remove(id);
        self.items.insert(0, id);
    }

    /// Removes `id` if present; no-op otherwise.
    pub fn remove(&mut self, id: TabId) {
        self.items.retain(|&item| item != id);
    }

    /// Restores the order saved by the last `add`. Idempotent until the next
    /// `add`.
    pub fn rewind(&mut self) {
        self.items = self.snapshot.clone();
    }

    /// Tab ids in most-recent-first order.
    pub fn items(&self) -> &[TabId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(list: &RecencyList) -> Vec<u32> {
        list.items().iter().map(|id| id.0).collect()
    }

    #[test]
    fn add_puts_the_tab_in_front() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));

        assert_eq!(list.first(), Some(TabId(2)));
        assert_eq!(list.second(), Some(TabId(1)));
    }

    #[test]
    fn re_adding_moves_instead_of_duplicating() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));
        list.add(TabId(3));
        list.add(TabId(1));

        assert_eq!(ids(&list), vec![1, 3, 2]);
    }

    #[test]
    fn remove_of_absent_id_changes_nothing() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));

        list.remove(TabId(9));
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn rewind_undoes_the_last_add() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));
        list.add(TabId(3));

        list.rewind();
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn second_rewind_is_a_no_op() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));

        list.rewind();
        let after_first = ids(&list);
        list.rewind();
        assert_eq!(ids(&list), after_first);
    }

    #[test]
    fn remove_is_not_undoable() {
        let mut list = RecencyList::new();
        list.add(TabId(1));
        list.add(TabId(2));
        list.remove(TabId(2));

        // The snapshot predates the last add, not the remove.
        list.rewind();
        assert_eq!(ids(&list), vec![1]);
    }

    #[test]
    fn accessors_on_empty_list() {
        let list = RecencyList::new();
        assert_eq!(list.first(), None);
        assert_eq!(list.second(), None);
        assert!(list.is_empty());
    }

    proptest! {
        #[test]
        fn add_never_duplicates(ops in proptest::collection::vec(0u32..16, 0..64)) {
            let mut list = RecencyList::new();
            for id in ops {
                list.add(TabId(id));
            }

            let mut seen = std::collections::HashSet::new();
            prop_assert!(list.items().iter().all(|id| seen.insert(*id)));
        }

        #[test]
        fn add_always_wins_recency(ops in proptest::collection::vec(0u32..16, 1..64)) {
            let mut list = RecencyList::new();
            for &id in &ops {
                list.add(TabId(id));
                prop_assert_eq!(list.first(), Some(TabId(id)));
            }
        }
    }
}
