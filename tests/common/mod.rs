//! Shared fixtures for integration tests.

use tabsteer::{Tab, TabId, WindowId};

/// Shorthand tab record builder.
pub fn tab(id: u32, window: u32, index: u32, active: bool) -> Tab {
    Tab::new(TabId(id), WindowId(window), index, active)
}
