//! Pure placement decisions for newly created tabs.
//!
//! Nothing here talks to the host; the controller executes whatever these
//! functions decide.

use crate::config::{FocusBehavior, OpenBehavior, Settings};
use crate::host::{Tab, TabId};
use crate::keys::ModifierState;

/// Urls the browser uses for its built-in start page.
// TODO: recognize start pages for browsers other than Opera.
const START_PAGE_URLS: &[&str] = &["opera://startpage", "opera://startpage/"];

/// Where a new tab should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    NextToActive,
    AtEnd,
}

/// Resolves the configured open mode against the tab kind.
pub fn placement(mode: OpenBehavior, start_page: bool) -> Placement {
    match mode {
        OpenBehavior::NextToActive => Placement::NextToActive,
        OpenBehavior::AtEnd => Placement::AtEnd,
        OpenBehavior::OtherAtEnd => {
            if start_page {
                Placement::NextToActive
            } else {
                Placement::AtEnd
            }
        }
        OpenBehavior::Default => {
            if start_page {
                Placement::AtEnd
            } else {
                Placement::NextToActive
            }
        }
    }
}

pub fn is_start_page(tab: &Tab) -> bool {
    tab.url
        .as_deref()
        .is_some_and(|url| START_PAGE_URLS.contains(&url))
}

/// The neighbor to chain a sequentially-opened tab after, when in-order
/// placement applies: an anchor exists and the new tab was opened directly
/// from the active tab, not from a previously chained tab.
pub fn in_order_neighbor(
    settings: &Settings,
    opener: Option<TabId>,
    active: Option<TabId>,
    in_order: Option<TabId>,
) -> Option<TabId> {
    if !settings.open_in_order {
        return None;
    }
    let anchor = in_order?;
    if opener == active {
        Some(anchor)
    } else {
        None
    }
}

/// A key the user configured as an exception to always-focus is held.
pub fn focus_exception_key_held(settings: &Settings, keys: &ModifierState) -> bool {
    (settings.except_ctrl && keys.ctrl) || (settings.except_shift && keys.shift)
}

/// Whether a freshly created background tab should be focused immediately.
pub fn should_focus_new_tab(settings: &Settings, keys: &ModifierState, tab: &Tab) -> bool {
    !tab.active
        && tab.opener_tab_id.is_some()
        && settings.focus_on_open == FocusBehavior::Always
        && !focus_exception_key_held(settings, keys)
}

/// Whether a tab that popped out into a new window should be pulled back
/// into its opener's window.
pub fn should_prevent_new_window(settings: &Settings, keys: &ModifierState) -> bool {
    settings.prevent_window_popups || (settings.prevent_new_window && keys.shift)
}
