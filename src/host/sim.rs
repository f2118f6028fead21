//! In-memory simulated host for tests and trace replay.
//!
//! Keeps a model of every window's tab strip, answers [`TabHost`] queries
//! from it, and records the commands a controller issues. `apply_event`
//! advances the model to reflect what the real browser had already done when
//! it emitted the event, so a replayed trace sees query results consistent
//! with the recording.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::host::api::{
    HostCommand, HostError, MovePosition, MoveTarget, Tab, TabHost, TabId, TabQuery, WindowId,
};
use crate::host::events::HostEvent;

#[derive(Debug, Clone)]
struct SimTab {
    id: TabId,
    active: bool,
    opener_tab_id: Option<TabId>,
    url: Option<String>,
}

impl SimTab {
    fn from_record(tab: &Tab) -> Self {
        Self {
            id: tab.id,
            active: tab.active,
            opener_tab_id: tab.opener_tab_id,
            url: tab.url.clone(),
        }
    }

    fn record(&self, window_id: WindowId, index: u32) -> Tab {
        Tab {
            id: self.id,
            window_id,
            index,
            active: self.active,
            opener_tab_id: self.opener_tab_id,
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct SimModel {
    windows: BTreeMap<WindowId, Vec<SimTab>>,
    /// Tabs between a detach and the matching attach.
    detached: HashMap<TabId, SimTab>,
    commands: Vec<HostCommand>,
}

impl SimModel {
    fn find(&self, id: TabId) -> Option<(WindowId, usize)> {
        self.windows.iter().find_map(|(window_id, tabs)| {
            tabs.iter()
                .position(|tab| tab.id == id)
                .map(|index| (*window_id, index))
        })
    }

    fn take_tab(&mut self, id: TabId) -> Option<SimTab> {
        let (window_id, index) = self.find(id)?;
        self.windows
            .get_mut(&window_id)
            .map(|tabs| tabs.remove(index))
    }

    fn insert_tab(&mut self, window_id: WindowId, position: Option<usize>, tab: SimTab) {
        let strip = self.windows.entry(window_id).or_default();
        let index = position.unwrap_or(strip.len()).min(strip.len());
        if tab.active {
            for other in strip.iter_mut() {
                other.active = false;
            }
        }
        strip.insert(index, tab);
    }

    fn activate(&mut self, id: TabId) -> bool {
        let Some((window_id, index)) = self.find(id) else {
            return false;
        };
        let Some(strip) = self.windows.get_mut(&window_id) else {
            return false;
        };
        for (position, tab) in strip.iter_mut().enumerate() {
            tab.active = position == index;
        }
        true
    }
}

/// A [`TabHost`] backed by an in-memory browser model.
pub struct SimulatedHost {
    model: Arc<Mutex<SimModel>>,
    lookup_delay: Duration,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            model: Arc::new(Mutex::new(SimModel::default())),
            lookup_delay: Duration::ZERO,
        }
    }

    /// Adds an artificial delay before lookups resolve, widening the async
    /// races the controller has to survive.
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    /// Seeds a window with tabs, in strip order. The `index` field of each
    /// record is ignored; position in the slice wins.
    pub fn add_window(&self, window_id: WindowId, tabs: &[Tab]) {
        let mut model = self.model.lock();
        model
            .windows
            .insert(window_id, tabs.iter().map(SimTab::from_record).collect());
    }

    /// Advances the model to reflect an event the browser has already acted
    /// on. Replay feeds each trace event here before handing it to the
    /// controller.
    pub fn apply_event(&self, event: &HostEvent) {
        let mut model = self.model.lock();
        match event {
            HostEvent::WindowCreated { window_id, tabs } => {
                model
                    .windows
                    .insert(*window_id, tabs.iter().map(SimTab::from_record).collect());
            }
            HostEvent::WindowRemoved { window_id } => {
                model.windows.remove(window_id);
            }
            HostEvent::TabCreated { tab } => {
                model.insert_tab(
                    tab.window_id,
                    Some(tab.index as usize),
                    SimTab::from_record(tab),
                );
            }
            HostEvent::TabRemoved { tab_id, .. } => {
                model.take_tab(*tab_id);
            }
            HostEvent::TabActivated { tab_id, .. } => {
                model.activate(*tab_id);
            }
            HostEvent::TabDetached { tab_id, .. } => {
                if let Some(tab) = model.take_tab(*tab_id) {
                    model.detached.insert(*tab_id, tab);
                }
            }
            HostEvent::TabAttached {
                tab_id,
                new_window_id,
            } => {
                if let Some(tab) = model.detached.remove(tab_id) {
                    model.insert_tab(*new_window_id, None, tab);
                }
            }
            HostEvent::TabMoved {
                tab_id,
                window_id,
                to_index,
                ..
            } => {
                if let Some(tab) = model.take_tab(*tab_id) {
                    model.insert_tab(*window_id, Some(*to_index as usize), tab);
                }
            }
        }
    }

    /// Commands issued so far, in order.
    pub fn commands(&self) -> Vec<HostCommand> {
        self.model.lock().commands.clone()
    }

    /// Drains and returns the recorded commands.
    pub fn take_commands(&self) -> Vec<HostCommand> {
        std::mem::take(&mut self.model.lock().commands)
    }

    /// Current strip order of a window, for assertions.
    pub fn tab_strip(&self, window_id: WindowId) -> Vec<TabId> {
        self.model
            .lock()
            .windows
            .get(&window_id)
            .map(|tabs| tabs.iter().map(|tab| tab.id).collect())
            .unwrap_or_default()
    }

    /// The window's active tab, for assertions.
    pub fn active_tab(&self, window_id: WindowId) -> Option<TabId> {
        self.model
            .lock()
            .windows
            .get(&window_id)?
            .iter()
            .find(|tab| tab.active)
            .map(|tab| tab.id)
    }

    async fn settle(&self) {
        if !self.lookup_delay.is_zero() {
            tokio::time::sleep(self.lookup_delay).await;
        }
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabHost for SimulatedHost {
    async fn get_tab(&self, id: TabId) -> Result<Tab, HostError> {
        self.settle().await;
        let model = self.model.lock();
        let (window_id, index) = model.find(id).ok_or(HostError::TabNotFound(id))?;
        model
            .windows
            .get(&window_id)
            .and_then(|tabs| tabs.get(index))
            .map(|tab| tab.record(window_id, index as u32))
            .ok_or(HostError::TabNotFound(id))
    }

    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<Tab>, HostError> {
        self.settle().await;
        let model = self.model.lock();
        let mut results = Vec::new();
        for (window_id, tabs) in &model.windows {
            for (index, tab) in tabs.iter().enumerate() {
                let record = tab.record(*window_id, index as u32);
                if query.matches(&record) {
                    results.push(record);
                }
            }
        }
        Ok(results)
    }

    async fn move_tab(&self, id: TabId, target: MoveTarget) -> Result<(), HostError> {
        let mut model = self.model.lock();
        if !model.windows.contains_key(&target.window_id) {
            return Err(HostError::WindowNotFound(target.window_id));
        }
        let tab = model.take_tab(id).ok_or(HostError::TabNotFound(id))?;
        let position = match target.position {
            MovePosition::At(index) => Some(index as usize),
            MovePosition::End => None,
        };
        model.insert_tab(target.window_id, position, tab);
        model.commands.push(HostCommand::Move { tab_id: id, target });
        Ok(())
    }

    async fn activate_tab(&self, id: TabId) -> Result<(), HostError> {
        let mut model = self.model.lock();
        if !model.activate(id) {
            return Err(HostError::TabNotFound(id));
        }
        model.commands.push(HostCommand::Activate { tab_id: id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: u32, window: u32, index: u32, active: bool) -> Tab {
        Tab::new(TabId(id), WindowId(window), index, active)
    }

    #[tokio::test]
    async fn get_tab_reports_current_position() {
        let host = SimulatedHost::new();
        host.add_window(WindowId(1), &[tab(10, 1, 0, true), tab(11, 1, 1, false)]);

        let found = host.get_tab(TabId(11)).await.unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.window_id, WindowId(1));

        let missing = host.get_tab(TabId(99)).await;
        assert!(matches!(missing, Err(HostError::TabNotFound(TabId(99)))));
    }

    #[tokio::test]
    async fn move_commands_update_the_model_and_are_recorded() {
        let host = SimulatedHost::new();
        host.add_window(
            WindowId(1),
            &[tab(10, 1, 0, true), tab(11, 1, 1, false), tab(12, 1, 2, false)],
        );

        host.move_tab(TabId(12), MoveTarget::at(WindowId(1), 1))
            .await
            .unwrap();
        assert_eq!(
            host.tab_strip(WindowId(1)),
            vec![TabId(10), TabId(12), TabId(11)]
        );

        host.move_tab(TabId(10), MoveTarget::end(WindowId(1)))
            .await
            .unwrap();
        assert_eq!(
            host.tab_strip(WindowId(1)),
            vec![TabId(12), TabId(11), TabId(10)]
        );

        assert_eq!(host.commands().len(), 2);
    }

    #[tokio::test]
    async fn activate_focuses_exactly_one_tab() {
        let host = SimulatedHost::new();
        host.add_window(WindowId(1), &[tab(10, 1, 0, true), tab(11, 1, 1, false)]);

        host.activate_tab(TabId(11)).await.unwrap();
        assert_eq!(host.active_tab(WindowId(1)), Some(TabId(11)));
        assert_eq!(
            host.take_commands(),
            vec![HostCommand::Activate { tab_id: TabId(11) }]
        );
    }

    #[tokio::test]
    async fn events_advance_the_model() {
        let host = SimulatedHost::new();
        host.apply_event(&HostEvent::WindowCreated {
            window_id: WindowId(1),
            tabs: vec![tab(10, 1, 0, true)],
        });
        host.apply_event(&HostEvent::TabCreated {
            tab: tab(11, 1, 1, false),
        });
        host.apply_event(&HostEvent::TabActivated {
            tab_id: TabId(11),
            window_id: WindowId(1),
        });
        assert_eq!(host.active_tab(WindowId(1)), Some(TabId(11)));

        host.apply_event(&HostEvent::TabDetached {
            tab_id: TabId(11),
            old_window_id: WindowId(1),
        });
        assert_eq!(host.tab_strip(WindowId(1)), vec![TabId(10)]);

        host.apply_event(&HostEvent::WindowCreated {
            window_id: WindowId(2),
            tabs: vec![],
        });
        host.apply_event(&HostEvent::TabAttached {
            tab_id: TabId(11),
            new_window_id: WindowId(2),
        });
        assert_eq!(host.tab_strip(WindowId(2)), vec![TabId(11)]);

        host.apply_event(&HostEvent::TabRemoved {
            tab_id: TabId(10),
            window_id: WindowId(1),
            is_window_closing: false,
        });
        assert!(host.tab_strip(WindowId(1)).is_empty());
    }

    #[tokio::test]
    async fn query_returns_tabs_in_strip_order() {
        let host = SimulatedHost::new();
        host.add_window(WindowId(1), &[tab(10, 1, 0, true), tab(11, 1, 1, false)]);
        host.add_window(WindowId(2), &[tab(20, 2, 0, true)]);

        let active = host.query_tabs(TabQuery::active()).await.unwrap();
        assert_eq!(
            active.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![TabId(10), TabId(20)]
        );

        let at = host.query_tabs(TabQuery::at(WindowId(1), 1)).await.unwrap();
        assert_eq!(at.len(), 1);
        assert_eq!(at[0].id, TabId(11));
    }
}
