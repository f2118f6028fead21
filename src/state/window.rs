use crate::host::TabId;
use crate::state::recency::RecencyList;
use crate::state::undo::UndoCell;

/// Per-window tracking state: the activation history plus two cursors, each
/// with one level of undo.
///
/// `active_tab_index` reflects the strip position of `history().first()` as
/// of the last time the host confirmed it. It is transiently stale while a
/// position lookup is in flight; [`WindowState::apply_index_lookup`] is the
/// only place a lookup result lands, and it discards results that a newer
/// activation has already superseded.
#[derive(Debug, Clone, Default)]
pub struct WindowState {
    history: RecencyList,
    in_order_tab: UndoCell<Option<TabId>>,
    active_tab_index: UndoCell<Option<u32>>,
    index_update_in_flight: bool,
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &RecencyList {
        &self.history
    }

    /// The latest tab placed by sequential chaining, used as the neighbor
    /// anchor for the next sequentially-opened tab.
    pub fn in_order_tab(&self) -> Option<TabId> {
        self.in_order_tab.get()
    }

    pub fn set_in_order_tab(&mut self, id: TabId) {
        self.in_order_tab.set(Some(id));
    }

    /// Last confirmed strip position of the window's active tab.
    pub fn active_tab_index(&self) -> Option<u32> {
        self.active_tab_index.get()
    }

    pub fn set_active_tab_index(&mut self, index: u32) {
        self.active_tab_index.set(Some(index));
    }

    pub fn index_update_in_flight(&self) -> bool {
        self.index_update_in_flight
    }

    /// Records `id` as the window's most recent tab and marks a position
    /// lookup as outstanding. The caller starts the actual host lookup and
    /// later feeds its result to [`WindowState::apply_index_lookup`].
    pub fn add_tab(&mut self, id: TabId) {
        self.history.add(id);
        self.in_order_tab.set(Some(id));
        self.index_update_in_flight = true;
    }

    /// Lands the result of a position lookup started by `add_tab`.
    ///
    /// The index is applied only if `id` is still the most recent entry; a
    /// newer activation racing ahead of the lookup's completion makes the
    /// result stale, and stale results are dropped rather than applied.
    pub fn apply_index_lookup(&mut self, id: TabId, index: u32) {
        if self.history.first() == Some(id) {
            self.active_tab_index.set(Some(index));
        }
        self.index_update_in_flight = false;
    }

    /// Forgets `id`. If it was the in-order anchor, the anchor falls back to
    /// the most recent remaining tab.
    pub fn remove_tab(&mut self, id: TabId) {
        self.history.remove(id);
        if self.in_order_tab.get() == Some(id) {
            self.in_order_tab.set(self.history.first());
        }
    }

    /// Undoes the last activation: history and the in-order cursor rewind
    /// unconditionally; the active index rewinds only when no lookup is in
    /// flight, because an in-flight lookup already carries the value that
    /// should survive the rewind.
    pub fn rewind(&mut self) {
        self.history.rewind();
        self.in_order_tab.rewind();

        if !self.index_update_in_flight {
            self.active_tab_index.rewind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tab_tracks_history_and_anchor() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.add_tab(TabId(2));

        assert_eq!(state.history().first(), Some(TabId(2)));
        assert_eq!(state.in_order_tab(), Some(TabId(2)));
        assert!(state.index_update_in_flight());
    }

    #[test]
    fn lookup_result_applies_while_still_current() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.apply_index_lookup(TabId(1), 4);

        assert_eq!(state.active_tab_index(), Some(4));
        assert!(!state.index_update_in_flight());
    }

    #[test]
    fn stale_lookup_result_is_dropped() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.add_tab(TabId(2));

        // Tab 1's lookup lands after tab 2 became the most recent entry.
        state.apply_index_lookup(TabId(1), 7);
        assert_eq!(state.active_tab_index(), None);

        state.apply_index_lookup(TabId(2), 3);
        assert_eq!(state.active_tab_index(), Some(3));
    }

    #[test]
    fn remove_tab_reassigns_the_anchor() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.add_tab(TabId(2));

        state.remove_tab(TabId(2));
        assert_eq!(state.in_order_tab(), Some(TabId(1)));

        state.remove_tab(TabId(1));
        assert_eq!(state.in_order_tab(), None);
    }

    #[test]
    fn remove_of_unrelated_tab_keeps_the_anchor() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.add_tab(TabId(2));

        state.remove_tab(TabId(1));
        assert_eq!(state.in_order_tab(), Some(TabId(2)));
    }

    #[test]
    fn rewind_restores_history_and_cursors() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.apply_index_lookup(TabId(1), 0);
        state.add_tab(TabId(2));
        state.apply_index_lookup(TabId(2), 1);

        state.rewind();

        assert_eq!(state.history().first(), Some(TabId(1)));
        assert_eq!(state.in_order_tab(), Some(TabId(1)));
        assert_eq!(state.active_tab_index(), Some(0));
    }

    #[test]
    fn rewind_leaves_index_alone_while_lookup_in_flight() {
        let mut state = WindowState::new();
        state.add_tab(TabId(1));
        state.apply_index_lookup(TabId(1), 5);

        // A second activation whose lookup has not resolved yet.
        state.add_tab(TabId(2));
        state.rewind();

        // The in-flight lookup owns the index; the stale previous value must
        // not be restored over it.
        assert_eq!(state.active_tab_index(), Some(5));
        assert_eq!(state.history().first(), Some(TabId(1)));
    }
}
