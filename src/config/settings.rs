use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::util::paths::config_path;

/// Where new tabs are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenBehavior {
    /// Start-page tabs at the end of the strip, everything else next to the
    /// active tab.
    #[default]
    Default,
    NextToActive,
    AtEnd,
    /// Start-page tabs next to the active tab, everything else at the end.
    OtherAtEnd,
}

impl OpenBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenBehavior::Default => "default",
            OpenBehavior::NextToActive => "next-to-active",
            OpenBehavior::AtEnd => "at-end",
            OpenBehavior::OtherAtEnd => "other-at-end",
        }
    }

    /// Parse from a config string. Unknown values mean `default`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "next-to-active" | "nexttoactive" => OpenBehavior::NextToActive,
            "at-end" | "atend" => OpenBehavior::AtEnd,
            "other-at-end" | "otheratend" => OpenBehavior::OtherAtEnd,
            _ => OpenBehavior::Default,
        }
    }
}

/// What receives focus after the active tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseBehavior {
    /// Defer to the host's native succession.
    #[default]
    Default,
    /// The most recently focused remaining tab.
    LastFocused,
    /// The tab that shifted into the closed tab's old position.
    Next,
    /// The tab just before the closed tab's old position.
    Previous,
}

impl CloseBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseBehavior::Default => "default",
            CloseBehavior::LastFocused => "last-focused",
            CloseBehavior::Next => "next",
            CloseBehavior::Previous => "previous",
        }
    }

    /// Parse from a config string. Unknown values mean `default`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "last-focused" | "lastfocused" => CloseBehavior::LastFocused,
            "next" => CloseBehavior::Next,
            "previous" => CloseBehavior::Previous,
            _ => CloseBehavior::Default,
        }
    }
}

/// Whether newly opened background tabs are focused immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusBehavior {
    #[default]
    Default,
    Always,
}

impl FocusBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusBehavior::Default => "default",
            FocusBehavior::Always => "always",
        }
    }

    /// Parse from a config string. Unknown values mean `default`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always" => FocusBehavior::Always,
            _ => FocusBehavior::Default,
        }
    }
}

/// Behavior configuration, loaded from `~/.tabsteer/config.toml`.
///
/// The core treats this as a read-only snapshot; a changed file is picked up
/// by sending the controller a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub on_open: OpenBehavior,
    pub on_close: CloseBehavior,
    pub focus_on_open: FocusBehavior,
    /// Ignore `focus_on_open = "always"` while Ctrl is held.
    pub except_ctrl: bool,
    /// Ignore `focus_on_open = "always"` while Shift is held.
    pub except_shift: bool,
    /// Chain consecutively-opened tabs after one another instead of stacking
    /// them all next to the active tab.
    pub open_in_order: bool,
    /// Pull tabs that opened in a new window back while Shift is held.
    pub prevent_new_window: bool,
    /// Pull every tab that opened in a new window back into its opener's
    /// window.
    pub prevent_window_popups: bool,
    /// Delay before acting after startup, so session restore can settle.
    pub startup_delay_ms: u64,
    /// Window in which a removal is treated as the cause of the last
    /// activation.
    pub active_changed_timeout_ms: u64,
    /// Log every host event at debug level.
    pub trace_events: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            on_open: OpenBehavior::Default,
            on_close: CloseBehavior::Default,
            focus_on_open: FocusBehavior::Default,
            except_ctrl: true,
            except_shift: false,
            open_in_order: true,
            prevent_new_window: false,
            prevent_window_popups: false,
            startup_delay_ms: 2000,
            active_changed_timeout_ms: 100,
            trace_events: false,
        }
    }
}

/// TOML representation of the config file; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSettings {
    pub on_open: Option<String>,
    pub on_close: Option<String>,
    pub focus_on_open: Option<String>,
    pub except_ctrl: Option<bool>,
    pub except_shift: Option<bool>,
    pub open_in_order: Option<bool>,
    pub prevent_new_window: Option<bool>,
    pub prevent_window_popups: Option<bool>,
    pub startup_delay_ms: Option<u64>,
    pub active_changed_timeout_ms: Option<u64>,
    pub trace_events: Option<bool>,
}

impl Settings {
    /// Loads settings from the default config path. Missing or invalid files
    /// fall back to defaults; this never fails.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Loads settings from a specific path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };

        match toml::from_str::<TomlSettings>(&contents) {
            Ok(parsed) => Self::default().merged(parsed),
            Err(error) => {
                warn!(path = %path.display(), %error, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    fn merged(mut self, toml: TomlSettings) -> Self {
        if let Some(value) = toml.on_open {
            self.on_open = OpenBehavior::parse(&value);
        }
        if let Some(value) = toml.on_close {
            self.on_close = CloseBehavior::parse(&value);
        }
        if let Some(value) = toml.focus_on_open {
            self.focus_on_open = FocusBehavior::parse(&value);
        }
        if let Some(value) = toml.except_ctrl {
            self.except_ctrl = value;
        }
        if let Some(value) = toml.except_shift {
            self.except_shift = value;
        }
        if let Some(value) = toml.open_in_order {
            self.open_in_order = value;
        }
        if let Some(value) = toml.prevent_new_window {
            self.prevent_new_window = value;
        }
        if let Some(value) = toml.prevent_window_popups {
            self.prevent_window_popups = value;
        }
        if let Some(value) = toml.startup_delay_ms {
            self.startup_delay_ms = value;
        }
        if let Some(value) = toml.active_changed_timeout_ms {
            self.active_changed_timeout_ms = value;
        }
        if let Some(value) = toml.trace_events {
            self.trace_events = value;
        }
        self
    }

    /// Merge a parsed TOML fragment over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::default().merged(toml::from_str(contents)?))
    }
}
