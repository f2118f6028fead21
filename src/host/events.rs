use serde::{Deserialize, Serialize};

use crate::host::api::{Tab, TabId, WindowId};

/// Lifecycle notification from the host browser.
///
/// Mirrors the tab/window event surface of webextension-style automation
/// APIs. The serialized form doubles as the JSONL trace schema, so variant
/// and field names are part of the trace format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A window opened, possibly already holding tabs (session restore).
    WindowCreated {
        window_id: WindowId,
        #[serde(default)]
        tabs: Vec<Tab>,
    },

    /// A window closed.
    WindowRemoved { window_id: WindowId },

    /// A tab was created. The record reflects where the host put it.
    TabCreated { tab: Tab },

    /// A tab was removed.
    TabRemoved {
        tab_id: TabId,
        window_id: WindowId,
        #[serde(default)]
        is_window_closing: bool,
    },

    /// A tab received focus.
    TabActivated { tab_id: TabId, window_id: WindowId },

    /// A tab arrived from another window.
    TabAttached { tab_id: TabId, new_window_id: WindowId },

    /// A tab is leaving for another window.
    TabDetached { tab_id: TabId, old_window_id: WindowId },

    /// A tab changed position within its window.
    TabMoved {
        tab_id: TabId,
        window_id: WindowId,
        from_index: u32,
        to_index: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_round_trip_as_tagged_json() {
        let event = HostEvent::TabMoved {
            tab_id: TabId(3),
            window_id: WindowId(1),
            from_index: 0,
            to_index: 4,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"tab_moved\""));
        assert_eq!(serde_json::from_str::<HostEvent>(&json).unwrap(), event);
    }

    #[test]
    fn window_created_tolerates_missing_tab_list() {
        let event: HostEvent =
            serde_json::from_str(r#"{"type":"window_created","window_id":5}"#).unwrap();
        assert_eq!(
            event,
            HostEvent::WindowCreated {
                window_id: WindowId(5),
                tabs: vec![],
            }
        );
    }
}
