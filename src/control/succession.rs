//! Pure focus-succession decisions for removed tabs.

use crate::config::CloseBehavior;
use crate::host::TabId;
use crate::state::WindowState;

/// Corrective focus action after the active tab closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessionAction {
    /// Defer to the host's native behavior.
    None,
    /// Focus a specific tab.
    Focus(TabId),
    /// Focus whatever tab occupies this strip position now.
    FocusAt(u32),
}

/// Picks what should receive focus after a removal, given window state that
/// has already been rewound and pruned of the removed tab.
pub fn succession(mode: CloseBehavior, state: &WindowState) -> SuccessionAction {
    match mode {
        CloseBehavior::Default => SuccessionAction::None,
        CloseBehavior::LastFocused => state
            .history()
            .first()
            .map_or(SuccessionAction::None, SuccessionAction::Focus),
        // The closed tab's old slot now holds its right-hand neighbor.
        CloseBehavior::Next => state
            .active_tab_index()
            .map_or(SuccessionAction::None, SuccessionAction::FocusAt),
        CloseBehavior::Previous => state
            .active_tab_index()
            .map_or(SuccessionAction::None, |index| {
                SuccessionAction::FocusAt(index.saturating_sub(1))
            }),
    }
}
