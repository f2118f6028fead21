use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifier the host assigns to a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier the host assigns to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a tab as reported by the host.
///
/// `index` is the tab's position in its window's strip at the time the host
/// produced the record; it goes stale as soon as anything moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: u32,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opener_tab_id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Tab {
    pub fn new(id: TabId, window_id: WindowId, index: u32, active: bool) -> Self {
        Self {
            id,
            window_id,
            index,
            active,
            opener_tab_id: None,
            url: None,
        }
    }

    pub fn with_opener(mut self, opener: TabId) -> Self {
        self.opener_tab_id = Some(opener);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Predicate for [`TabHost::query_tabs`]. Unset fields match any tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabQuery {
    pub window_id: Option<WindowId>,
    pub index: Option<u32>,
    pub active: Option<bool>,
}

impl TabQuery {
    /// Every active tab, across all windows.
    pub fn active() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    /// The tab occupying a specific strip position.
    pub fn at(window_id: WindowId, index: u32) -> Self {
        Self {
            window_id: Some(window_id),
            index: Some(index),
            active: None,
        }
    }

    pub fn matches(&self, tab: &Tab) -> bool {
        self.window_id.is_none_or(|id| id == tab.window_id)
            && self.index.is_none_or(|index| index == tab.index)
            && self.active.is_none_or(|active| active == tab.active)
    }
}

/// Strip position for a move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePosition {
    /// A concrete index within the strip.
    At(u32),
    /// The host's end-of-strip sentinel.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub window_id: WindowId,
    pub position: MovePosition,
}

impl MoveTarget {
    pub fn at(window_id: WindowId, index: u32) -> Self {
        Self {
            window_id,
            position: MovePosition::At(index),
        }
    }

    pub fn end(window_id: WindowId) -> Self {
        Self {
            window_id,
            position: MovePosition::End,
        }
    }
}

/// Command issued back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    Move { tab_id: TabId, target: MoveTarget },
    Activate { tab_id: TabId },
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::Move { tab_id, target } => match target.position {
                MovePosition::At(index) => write!(
                    f,
                    "move tab {} to window {} index {}",
                    tab_id, target.window_id, index
                ),
                MovePosition::End => {
                    write!(f, "move tab {} to end of window {}", tab_id, target.window_id)
                }
            },
            HostCommand::Activate { tab_id } => write!(f, "activate tab {tab_id}"),
        }
    }
}

/// Errors surfaced by a host backend.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The tab disappeared before the operation could touch it.
    #[error("no tab with id {0}")]
    TabNotFound(TabId),

    /// The window disappeared before the operation could touch it.
    #[error("no window with id {0}")]
    WindowNotFound(WindowId),

    /// The host connection itself is gone.
    #[error("host connection lost: {0}")]
    Disconnected(String),
}

/// Tab automation surface of the hosting browser.
///
/// Implementations must tolerate ids that have already disappeared; the
/// controller's lookups race with tab and window teardown by design, and a
/// failed lookup is always recovered by skipping the one operation that
/// needed it.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Resolve a single tab by id.
    async fn get_tab(&self, id: TabId) -> Result<Tab, HostError>;

    /// Tabs matching the query, in strip order.
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, HostError>;

    /// Move a tab to a new strip position, possibly across windows.
    async fn move_tab(&self, id: TabId, target: MoveTarget) -> Result<(), HostError>;

    /// Give a tab focus.
    async fn activate_tab(&self, id: TabId) -> Result<(), HostError>;
}
