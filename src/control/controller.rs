//! Event-driven controller tying host events to placement and focus
//! decisions.
//!
//! The controller consumes a single message stream. Host lifecycle events,
//! modifier-key messages, settings updates, and the completions of the
//! controller's own spawned lookups all arrive on the same channel, so every
//! piece of per-window state is only ever touched from one control loop.
//! The hazards that remain are logical: a lookup can land after the state it
//! was started for has been superseded, which is exactly what the staleness
//! checks in [`WindowState`] guard against.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::{CloseBehavior, Settings};
use crate::control::placement::{self, Placement};
use crate::control::succession::{self, SuccessionAction};
use crate::host::{
    HostError, HostEvent, MoveTarget, Tab, TabHost, TabId, TabQuery, WindowId,
};
use crate::keys::{KeyMessage, ModifierState};
use crate::state::{WindowRegistry, WindowState};

/// Message consumed by the controller's event loop.
#[derive(Debug)]
pub enum ControlMessage {
    /// Lifecycle notification from the host.
    Host(HostEvent),

    /// Modifier-key relay from the content-script collaborator.
    Key(KeyMessage),

    /// Replace the settings snapshot.
    SettingsChanged(Settings),

    /// A tab position lookup started by an activation resolved.
    IndexResolved {
        window_id: WindowId,
        tab_id: TabId,
        index: u32,
    },

    /// The activation debounce window elapsed.
    ActiveDebounceElapsed,

    /// Stop the run loop.
    Shutdown,
}

/// Per-window tab-ordering and focus-history state machine.
pub struct TabEventController {
    settings: Settings,
    host: Arc<dyn TabHost>,
    windows: WindowRegistry,
    keys: ModifierState,
    /// A tab activation happened within the configured debounce window.
    /// Lets tab-removed handling tell whether a removal directly follows an
    /// activation.
    active_changed_recently: bool,
    tx: mpsc::UnboundedSender<ControlMessage>,
    rx: mpsc::UnboundedReceiver<ControlMessage>,
}

impl TabEventController {
    pub fn new(settings: Settings, host: Arc<dyn TabHost>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            settings,
            host,
            windows: WindowRegistry::new(),
            keys: ModifierState::default(),
            active_changed_recently: false,
            tx,
            rx,
        }
    }

    /// Handle for feeding messages into the event loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<ControlMessage> {
        self.tx.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn modifiers(&self) -> &ModifierState {
        &self.keys
    }

    pub fn active_changed_recently(&self) -> bool {
        self.active_changed_recently
    }

    /// Tracked state for a window, if any.
    pub fn window(&self, window_id: WindowId) -> Option<&WindowState> {
        self.windows.existing(window_id)
    }

    /// Primes each window's history with its currently active tab. Run once
    /// at startup, before processing live events.
    pub async fn seed_active_tabs(&mut self) {
        match self.host.query_tabs(TabQuery::active()).await {
            Ok(tabs) => {
                for tab in tabs {
                    self.begin_add_tab(tab.window_id, tab.id);
                }
            }
            Err(error) => warn!(%error, "active tab query failed"),
        }
    }

    /// Runs the event loop until a `Shutdown` message arrives or every
    /// sender is dropped.
    pub async fn run(&mut self) {
        while let Some(message) = self.rx.recv().await {
            if matches!(message, ControlMessage::Shutdown) {
                break;
            }
            self.handle_message(message).await;
        }
    }

    /// Processes every message that is already queued, without waiting for
    /// more. Yields once first so freshly spawned lookups get a chance to
    /// post their results.
    pub async fn drain_ready(&mut self) {
        tokio::task::yield_now().await;
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message).await;
        }
    }

    pub async fn handle_message(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::Host(event) => self.handle_host_event(event).await,
            ControlMessage::Key(message) => self.keys.apply(message),
            ControlMessage::SettingsChanged(settings) => self.settings = settings,
            ControlMessage::IndexResolved {
                window_id,
                tab_id,
                index,
            } => {
                // The window may be gone by the time the lookup lands.
                if let Some(state) = self.windows.existing_mut(window_id) {
                    state.apply_index_lookup(tab_id, index);
                }
            }
            ControlMessage::ActiveDebounceElapsed => self.active_changed_recently = false,
            ControlMessage::Shutdown => {}
        }
    }

    async fn handle_host_event(&mut self, event: HostEvent) {
        if self.settings.trace_events {
            debug!(?event, "host event");
        }

        match event {
            HostEvent::WindowCreated { window_id, tabs } => {
                self.on_window_created(window_id, &tabs)
            }
            HostEvent::WindowRemoved { window_id } => self.windows.remove(window_id),
            HostEvent::TabCreated { tab } => self.on_tab_created(tab).await,
            HostEvent::TabRemoved {
                tab_id, window_id, ..
            } => self.on_tab_removed(tab_id, window_id).await,
            HostEvent::TabActivated { tab_id, window_id } => {
                self.on_tab_activated(tab_id, window_id)
            }
            HostEvent::TabAttached {
                tab_id,
                new_window_id,
            } => self.begin_add_tab(new_window_id, tab_id),
            HostEvent::TabDetached {
                tab_id,
                old_window_id,
            } => self.windows.get_mut(old_window_id).remove_tab(tab_id),
            HostEvent::TabMoved {
                window_id,
                from_index,
                to_index,
                ..
            } => self.on_tab_moved(window_id, from_index, to_index),
        }
    }

    fn on_window_created(&mut self, window_id: WindowId, tabs: &[Tab]) {
        self.windows.get_mut(window_id);

        for tab in tabs.iter().filter(|tab| tab.active) {
            self.begin_add_tab(window_id, tab.id);
            self.windows.get_mut(window_id).set_in_order_tab(tab.id);
        }
    }

    fn on_tab_activated(&mut self, tab_id: TabId, window_id: WindowId) {
        self.begin_add_tab(window_id, tab_id);
        self.windows.get_mut(window_id).set_in_order_tab(tab_id);

        self.active_changed_recently = true;
        let tx = self.tx.clone();
        let timeout = Duration::from_millis(self.settings.active_changed_timeout_ms);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(ControlMessage::ActiveDebounceElapsed);
        });
    }

    fn on_tab_moved(&mut self, window_id: WindowId, from_index: u32, to_index: u32) {
        let state = self.windows.get_mut(window_id);
        if state.active_tab_index() == Some(from_index) {
            state.set_active_tab_index(to_index);
        }
    }

    async fn on_tab_created(&mut self, tab: Tab) {
        self.position_new_tab(&tab).await;
        self.position_new_window_tab(&tab).await;

        if placement::should_focus_new_tab(&self.settings, &self.keys, &tab) {
            if let Err(error) = self.host.activate_tab(tab.id).await {
                warn!(tab_id = %tab.id, %error, "could not focus new tab");
            }
        }
    }

    async fn on_tab_removed(&mut self, tab_id: TabId, window_id: WindowId) {
        // There is no direct signal that the removed tab was the active one.
        // The host focuses a replacement before reporting the removal, so an
        // active-tab close shows up as: recent activation, and the removed
        // tab sitting second in history.
        let action = {
            let was_active = self.active_changed_recently
                && self.windows.get_mut(window_id).history().second() == Some(tab_id);

            let on_close = self.settings.on_close;
            let state = self.windows.get_mut(window_id);

            // Undo the host's replacement activation before pruning, so the
            // succession decision sees the pre-close ordering.
            if was_active && on_close != CloseBehavior::Default {
                state.rewind();
            }
            state.remove_tab(tab_id);

            if was_active {
                succession::succession(on_close, state)
            } else {
                SuccessionAction::None
            }
        };

        match action {
            SuccessionAction::None => {}
            SuccessionAction::Focus(id) => {
                if let Err(error) = self.host.activate_tab(id).await {
                    warn!(tab_id = %id, %error, "could not restore focus");
                }
            }
            SuccessionAction::FocusAt(index) => {
                self.focus_tab_at(window_id, index).await;
            }
        }
    }

    async fn focus_tab_at(&mut self, window_id: WindowId, index: u32) {
        match self.host.query_tabs(TabQuery::at(window_id, index)).await {
            Ok(tabs) => {
                // An empty result means the slot no longer exists; nothing
                // to focus.
                if let Some(tab) = tabs.first() {
                    if let Err(error) = self.host.activate_tab(tab.id).await {
                        warn!(tab_id = %tab.id, %error, "could not restore focus");
                    }
                }
            }
            Err(error) => warn!(%window_id, index, %error, "focus target query failed"),
        }
    }

    async fn position_new_tab(&mut self, tab: &Tab) {
        match placement::placement(self.settings.on_open, placement::is_start_page(tab)) {
            Placement::NextToActive => self.move_next_to_active(tab, tab.window_id).await,
            Placement::AtEnd => self.move_to_end(tab, tab.window_id).await,
        }
    }

    /// Pulls a tab that popped out into its own window back into the
    /// opener's window, when configured to.
    async fn position_new_window_tab(&mut self, tab: &Tab) {
        let Some(opener_id) = tab.opener_tab_id else {
            return;
        };
        if !placement::should_prevent_new_window(&self.settings, &self.keys) {
            return;
        }

        let opener = match self.host.get_tab(opener_id).await {
            Ok(opener) => opener,
            Err(error) => {
                warn!(%opener_id, %error, "opener lookup failed");
                return;
            }
        };

        if tab.window_id != opener.window_id {
            self.move_to_window(tab, opener.window_id).await;
            if let Err(error) = self.host.activate_tab(tab.id).await {
                warn!(tab_id = %tab.id, %error, "could not focus pulled-back tab");
            }
        }
    }

    async fn move_to_window(&mut self, tab: &Tab, window_id: WindowId) {
        match placement::placement(self.settings.on_open, placement::is_start_page(tab)) {
            Placement::NextToActive => self.move_next_to_active(tab, window_id).await,
            Placement::AtEnd => self.move_to_end(tab, window_id).await,
        }
    }

    /// Moves `tab` next to the window's active tab, or next to the in-order
    /// anchor when sequential placement applies.
    async fn move_next_to_active(&mut self, tab: &Tab, window_id: WindowId) {
        let (active, chain) = {
            let state = self.windows.get_mut(window_id);
            let active = state.history().first();
            let chain = placement::in_order_neighbor(
                &self.settings,
                tab.opener_tab_id,
                active,
                state.in_order_tab(),
            );
            (active, chain)
        };

        let mut neighbor = active;
        if let Some(anchor) = chain {
            match self.host.get_tab(anchor).await {
                Ok(found) => neighbor = Some(found.id),
                Err(error) => {
                    warn!(%anchor, %error, "in-order anchor is gone, using active tab")
                }
            }
        }

        let Some(neighbor) = neighbor else {
            return;
        };

        if let Err(error) = self.move_next_to_tab(tab, neighbor).await {
            warn!(tab_id = %tab.id, %neighbor, %error, "could not place tab next to neighbor");
            return;
        }
        self.windows.get_mut(window_id).set_in_order_tab(tab.id);
    }

    async fn move_next_to_tab(&mut self, tab: &Tab, neighbor: TabId) -> Result<(), HostError> {
        let neighbor = self.host.get_tab(neighbor).await?;
        let index = neighbor.index + 1;

        // Skip the command when the tab already sits at the target slot.
        if tab.index != index || tab.window_id != neighbor.window_id {
            self.host
                .move_tab(tab.id, MoveTarget::at(neighbor.window_id, index))
                .await?;
        }
        Ok(())
    }

    async fn move_to_end(&mut self, tab: &Tab, window_id: WindowId) {
        if let Err(error) = self.host.move_tab(tab.id, MoveTarget::end(window_id)).await {
            warn!(tab_id = %tab.id, %error, "could not move tab to end");
        }
    }

    /// Records `tab_id` as its window's most recent tab and starts the
    /// strip-position lookup. The result comes back as `IndexResolved` and
    /// is applied only if the tab is still the most recent entry by then.
    fn begin_add_tab(&mut self, window_id: WindowId, tab_id: TabId) {
        self.windows.get_mut(window_id).add_tab(tab_id);

        let host = Arc::clone(&self.host);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match host.get_tab(tab_id).await {
                Ok(tab) => {
                    let _ = tx.send(ControlMessage::IndexResolved {
                        window_id,
                        tab_id,
                        index: tab.index,
                    });
                }
                Err(error) => warn!(%tab_id, %error, "tab position lookup failed"),
            }
        });
    }
}
