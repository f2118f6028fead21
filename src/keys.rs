//! Modifier-key state relayed from the host's pages.
//!
//! The browser does not expose held keys to the background context, so a
//! content-script collaborator reports keydown/keyup for Ctrl and Shift as
//! out-of-band messages. This module holds the last reported state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    Ctrl,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Keydown,
    Keyup,
}

/// One key transition reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMessage {
    pub action: KeyAction,
    pub key: ModifierKey,
}

/// Last reported held state of the modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub ctrl: bool,
    pub shift: bool,
}

impl ModifierState {
    pub fn apply(&mut self, message: KeyMessage) {
        let held = message.action == KeyAction::Keydown;
        match message.key {
            ModifierKey::Ctrl => self.ctrl = held,
            ModifierKey::Shift => self.shift = held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(action: KeyAction, key: ModifierKey) -> KeyMessage {
        KeyMessage { action, key }
    }

    #[test]
    fn keydown_and_keyup_track_held_state() {
        let mut state = ModifierState::default();

        state.apply(message(KeyAction::Keydown, ModifierKey::Shift));
        assert!(state.shift);
        assert!(!state.ctrl);

        state.apply(message(KeyAction::Keydown, ModifierKey::Ctrl));
        state.apply(message(KeyAction::Keyup, ModifierKey::Shift));
        assert!(state.ctrl);
        assert!(!state.shift);
    }

    #[test]
    fn messages_round_trip_as_json() {
        let msg = message(KeyAction::Keydown, ModifierKey::Ctrl);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"action":"keydown","key":"ctrl"}"#);
        assert_eq!(serde_json::from_str::<KeyMessage>(&json).unwrap(), msg);
    }
}
