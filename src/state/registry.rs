use std::collections::HashMap;

use crate::host::WindowId;
use crate::state::window::WindowState;

/// Per-window state, created lazily on first reference and dropped when the
/// window closes. Nothing outside this map owns a WindowState.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, WindowState>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The window's state, created on first reference.
    pub fn get_mut(&mut self, id: WindowId) -> &mut WindowState {
        self.windows.entry(id).or_default()
    }

    /// State for a window that is already tracked, if any.
    pub fn existing(&self, id: WindowId) -> Option<&WindowState> {
        self.windows.get(&id)
    }

    pub fn existing_mut(&mut self, id: WindowId) -> Option<&mut WindowState> {
        self.windows.get_mut(&id)
    }

    /// Drops a window's state; no-op if the window was never tracked.
    pub fn remove(&mut self, id: WindowId) {
        self.windows.remove(&id);
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
