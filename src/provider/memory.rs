// In-memory tab strip
// Emulates the external provider for tests and the demo binary: an ordered
// tab list, groups, an active tab, notification fan-out, and a record of
// mutation calls so tests can assert exact provider traffic.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::types::errors::ProviderError;
use crate::types::events::{TabDelta, TabStripEvent};
use crate::types::tab::{GroupColor, GroupId, Tab, TabGroup, TabId, TabStatus, WindowId};

use super::TabStripProvider;

/// One mutation observed through the provider surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Activate(TabId),
    Move(TabId, usize),
    Group(TabId, GroupId),
    Ungroup(TabId),
    SetGroupCollapsed(GroupId, bool),
    Close(TabId),
}

struct StripState {
    tabs: Vec<Tab>,
    groups: Vec<TabGroup>,
    active_tab_id: Option<TabId>,
    next_tab_id: TabId,
    next_group_id: GroupId,
}

/// In-memory tab strip emulation.
///
/// Mirrors the strip rules the engine depends on: joining a group relocates
/// the tab to the end of the group's run, groups left without members are
/// removed, and closing the active tab activates its nearest neighbor.
/// Helper methods (not part of the trait) simulate changes made outside the
/// side panel and emit the matching notifications.
pub struct MemoryTabStrip {
    window_id: WindowId,
    state: Mutex<StripState>,
    subscribers: Mutex<Vec<UnboundedSender<TabStripEvent>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MemoryTabStrip {
    pub fn new(window_id: WindowId) -> Self {
        Self {
            window_id,
            state: Mutex::new(StripState {
                tabs: Vec::new(),
                groups: Vec::new(),
                active_tab_id: None,
                next_tab_id: 1,
                next_group_id: 100,
            }),
            subscribers: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn state(&self) -> MutexGuard<'_, StripState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn emit(&self, event: TabStripEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn emit_all(&self, events: Vec<TabStripEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Removes groups that no longer own any tab, queueing a removal
    /// notification for each.
    fn sweep_empty_groups(state: &mut StripState, events: &mut Vec<TabStripEvent>) {
        let mut removed = Vec::new();
        state.groups.retain(|group| {
            let has_member = state.tabs.iter().any(|t| t.group_id == Some(group.id));
            if !has_member {
                removed.push(group.id);
            }
            has_member
        });
        for group_id in removed {
            events.push(TabStripEvent::GroupRemoved { group_id });
        }
    }

    fn remove_tab_inner(&self, tab_id: TabId) -> Result<Vec<TabStripEvent>, ProviderError> {
        let mut state = self.state();
        let idx = state
            .tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or(ProviderError::TabNotFound(tab_id))?;

        let was_active = state.active_tab_id == Some(tab_id);
        state.tabs.remove(idx);

        let mut events = vec![TabStripEvent::TabRemoved { tab_id }];

        if was_active {
            if state.tabs.is_empty() {
                state.active_tab_id = None;
            } else {
                // Nearest neighbor: the tab that slid into the closed slot,
                // or the new last tab.
                let neighbor_idx = idx.min(state.tabs.len() - 1);
                let neighbor_id = state.tabs[neighbor_idx].id;
                state.active_tab_id = Some(neighbor_id);
                events.push(TabStripEvent::TabActivated {
                    tab_id: neighbor_id,
                    window_id: self.window_id,
                });
            }
        }

        Self::sweep_empty_groups(&mut state, &mut events);
        Ok(events)
    }

    // --- Test-side helpers: external changes, notified like the real strip ---

    /// Appends an ungrouped tab at the end of the strip. The first tab
    /// added becomes the active tab.
    pub fn add_tab(&self, title: &str, url: &str) -> TabId {
        self.add_tab_with_group(title, url, None)
    }

    /// Appends a tab already belonging to a group. Callers seed members
    /// contiguously, as the real strip would keep them.
    pub fn add_tab_in_group(&self, title: &str, url: &str, group_id: GroupId) -> TabId {
        self.add_tab_with_group(title, url, Some(group_id))
    }

    fn add_tab_with_group(&self, title: &str, url: &str, group_id: Option<GroupId>) -> TabId {
        let (tab, window_id, activated) = {
            let mut state = self.state();
            let id = state.next_tab_id;
            state.next_tab_id += 1;
            let tab = Tab {
                id,
                title: title.to_string(),
                url: url.to_string(),
                favicon: None,
                status: TabStatus::Complete,
                last_accessed: Some(Self::now_ms()),
                group_id,
            };
            state.tabs.push(tab.clone());
            // The first tab in an empty strip becomes active, and the strip
            // notifies that activation like any other.
            let activated = state.active_tab_id.is_none();
            if activated {
                state.active_tab_id = Some(id);
            }
            (tab, self.window_id, activated)
        };
        let id = tab.id;
        self.emit(TabStripEvent::TabCreated { tab, window_id });
        if activated {
            self.emit(TabStripEvent::TabActivated {
                tab_id: id,
                window_id,
            });
        }
        id
    }

    /// Creates an expanded group with no members yet.
    pub fn spawn_group(&self, title: &str, color: GroupColor) -> GroupId {
        let group = {
            let mut state = self.state();
            let id = state.next_group_id;
            state.next_group_id += 1;
            let group = TabGroup {
                id,
                title: title.to_string(),
                color,
                collapsed: false,
                window_id: self.window_id,
            };
            state.groups.push(group.clone());
            group
        };
        let id = group.id;
        self.emit(TabStripEvent::GroupCreated { group });
        id
    }

    /// Starts a navigation: the tab's URL changes and it begins loading.
    pub fn navigate(&self, tab_id: TabId, url: &str) {
        let delta = TabDelta {
            url: Some(url.to_string()),
            status: Some(TabStatus::Loading),
            ..TabDelta::default()
        };
        let mut state = self.state();
        if let Some(tab) = state.tabs.iter_mut().find(|t| t.id == tab_id) {
            delta.apply_to(tab);
            drop(state);
            self.emit(TabStripEvent::TabUpdated { tab_id, delta });
        }
    }

    /// Completes a navigation started with [`navigate`](Self::navigate).
    pub fn finish_loading(&self, tab_id: TabId) {
        let delta = TabDelta {
            status: Some(TabStatus::Complete),
            last_accessed: Some(Self::now_ms()),
            ..TabDelta::default()
        };
        let mut state = self.state();
        if let Some(tab) = state.tabs.iter_mut().find(|t| t.id == tab_id) {
            delta.apply_to(tab);
            drop(state);
            self.emit(TabStripEvent::TabUpdated { tab_id, delta });
        }
    }

    /// The user switches tabs on the real strip (keyboard shortcut, direct
    /// click). Emits the activation notification without a recorded call.
    pub fn user_activates(&self, tab_id: TabId) {
        let mut state = self.state();
        if state.tabs.iter().any(|t| t.id == tab_id) && state.active_tab_id != Some(tab_id) {
            state.active_tab_id = Some(tab_id);
            drop(state);
            self.emit(TabStripEvent::TabActivated {
                tab_id,
                window_id: self.window_id,
            });
        }
    }

    /// The user drags a tab on the real strip.
    pub fn user_moves_tab(&self, tab_id: TabId, index: usize) {
        let mut state = self.state();
        if let Some(idx) = state.tabs.iter().position(|t| t.id == tab_id) {
            let tab = state.tabs.remove(idx);
            let target = index.min(state.tabs.len());
            state.tabs.insert(target, tab);
            drop(state);
            self.emit(TabStripEvent::TabMoved {
                tab_id,
                window_id: self.window_id,
            });
        }
    }

    /// The user closes a tab on the real strip.
    pub fn user_closes_tab(&self, tab_id: TabId) {
        if let Ok(events) = self.remove_tab_inner(tab_id) {
            self.emit_all(events);
        }
    }

    /// The strip swaps a tab's identity (e.g. discard/restore), keeping its
    /// position and fields. Returns the new id.
    pub fn replace_tab(&self, removed_id: TabId) -> Option<TabId> {
        let mut state = self.state();
        let idx = state.tabs.iter().position(|t| t.id == removed_id)?;
        let added_id = state.next_tab_id;
        state.next_tab_id += 1;
        state.tabs[idx].id = added_id;
        if state.active_tab_id == Some(removed_id) {
            state.active_tab_id = Some(added_id);
        }
        drop(state);
        self.emit(TabStripEvent::TabReplaced {
            added_tab_id: added_id,
            removed_tab_id: removed_id,
        });
        Some(added_id)
    }

    /// The user collapses or expands a group on the real strip.
    pub fn fold_group(&self, group_id: GroupId, collapsed: bool) {
        let mut state = self.state();
        if let Some(group) = state.groups.iter_mut().find(|g| g.id == group_id) {
            group.collapsed = collapsed;
            drop(state);
            self.emit(TabStripEvent::GroupUpdated { group_id });
        }
    }

    /// The user renames a group on the real strip.
    pub fn retitle_group(&self, group_id: GroupId, title: &str) {
        let mut state = self.state();
        if let Some(group) = state.groups.iter_mut().find(|g| g.id == group_id) {
            group.title = title.to_string();
            drop(state);
            self.emit(TabStripEvent::GroupUpdated { group_id });
        }
    }

    /// Backdates a tab's last-access time. Silent: access metadata changes
    /// are not notified by the strip.
    pub fn set_last_accessed(&self, tab_id: TabId, at_ms: i64) {
        let mut state = self.state();
        if let Some(tab) = state.tabs.iter_mut().find(|t| t.id == tab_id) {
            tab.last_accessed = Some(at_ms);
        }
    }

    /// A window gains focus.
    pub fn focus_window(&self, window_id: WindowId) {
        self.emit(TabStripEvent::WindowFocusChanged { window_id });
    }

    // --- Assertion accessors ---

    pub fn tabs(&self) -> Vec<Tab> {
        self.state().tabs.clone()
    }

    pub fn groups(&self) -> Vec<TabGroup> {
        self.state().groups.clone()
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.state().active_tab_id
    }

    /// Drains and returns the mutation calls recorded so far.
    pub fn take_calls(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TabStripProvider for MemoryTabStrip {
    async fn list_tabs(&self, window_id: WindowId) -> Result<Vec<Tab>, ProviderError> {
        if window_id != self.window_id {
            return Ok(Vec::new());
        }
        Ok(self.state().tabs.clone())
    }

    async fn list_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, ProviderError> {
        if window_id != self.window_id {
            return Ok(Vec::new());
        }
        Ok(self.state().groups.clone())
    }

    async fn active_tab(&self) -> Result<Option<Tab>, ProviderError> {
        let state = self.state();
        Ok(state
            .active_tab_id
            .and_then(|id| state.tabs.iter().find(|t| t.id == id).cloned()))
    }

    async fn tab_by_id(&self, tab_id: TabId) -> Result<Option<Tab>, ProviderError> {
        Ok(self.state().tabs.iter().find(|t| t.id == tab_id).cloned())
    }

    async fn current_window_id(&self) -> Result<Option<WindowId>, ProviderError> {
        Ok(Some(self.window_id))
    }

    async fn activate(&self, tab_id: TabId) -> Result<(), ProviderError> {
        self.record(RecordedCall::Activate(tab_id));
        let mut state = self.state();
        if !state.tabs.iter().any(|t| t.id == tab_id) {
            return Err(ProviderError::TabNotFound(tab_id));
        }
        // Activating the already-active tab changes nothing and, like the
        // real strip, produces no notification.
        if state.active_tab_id == Some(tab_id) {
            return Ok(());
        }
        state.active_tab_id = Some(tab_id);
        drop(state);
        self.emit(TabStripEvent::TabActivated {
            tab_id,
            window_id: self.window_id,
        });
        Ok(())
    }

    async fn move_tab(&self, tab_id: TabId, index: usize) -> Result<(), ProviderError> {
        self.record(RecordedCall::Move(tab_id, index));
        let mut state = self.state();
        let idx = state
            .tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or(ProviderError::TabNotFound(tab_id))?;
        let tab = state.tabs.remove(idx);
        let target = index.min(state.tabs.len());
        state.tabs.insert(target, tab);
        drop(state);
        self.emit(TabStripEvent::TabMoved {
            tab_id,
            window_id: self.window_id,
        });
        Ok(())
    }

    async fn group_tab(&self, tab_id: TabId, group_id: GroupId) -> Result<(), ProviderError> {
        self.record(RecordedCall::Group(tab_id, group_id));
        let mut events = Vec::new();
        {
            let mut state = self.state();
            if !state.groups.iter().any(|g| g.id == group_id) {
                return Err(ProviderError::GroupNotFound(group_id));
            }
            let idx = state
                .tabs
                .iter()
                .position(|t| t.id == tab_id)
                .ok_or(ProviderError::TabNotFound(tab_id))?;

            state.tabs[idx].group_id = Some(group_id);
            events.push(TabStripEvent::TabUpdated {
                tab_id,
                delta: TabDelta {
                    group_id: Some(Some(group_id)),
                    ..TabDelta::default()
                },
            });

            // The strip keeps groups contiguous: a joining tab lands at the
            // end of the group's existing run.
            let last_other = state
                .tabs
                .iter()
                .enumerate()
                .filter(|(i, t)| *i != idx && t.group_id == Some(group_id))
                .map(|(i, _)| i)
                .max();
            if let Some(last) = last_other {
                let target = if idx < last { last } else { last + 1 };
                if idx != target {
                    let tab = state.tabs.remove(idx);
                    state.tabs.insert(target, tab);
                    events.push(TabStripEvent::TabMoved {
                        tab_id,
                        window_id: self.window_id,
                    });
                }
            }

            Self::sweep_empty_groups(&mut state, &mut events);
        }
        self.emit_all(events);
        Ok(())
    }

    async fn ungroup_tab(&self, tab_id: TabId) -> Result<(), ProviderError> {
        self.record(RecordedCall::Ungroup(tab_id));
        let mut events = Vec::new();
        {
            let mut state = self.state();
            let tab = state
                .tabs
                .iter_mut()
                .find(|t| t.id == tab_id)
                .ok_or(ProviderError::TabNotFound(tab_id))?;
            tab.group_id = None;
            events.push(TabStripEvent::TabUpdated {
                tab_id,
                delta: TabDelta {
                    group_id: Some(None),
                    ..TabDelta::default()
                },
            });
            Self::sweep_empty_groups(&mut state, &mut events);
        }
        self.emit_all(events);
        Ok(())
    }

    async fn set_group_collapsed(
        &self,
        group_id: GroupId,
        collapsed: bool,
    ) -> Result<(), ProviderError> {
        self.record(RecordedCall::SetGroupCollapsed(group_id, collapsed));
        let mut state = self.state();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or(ProviderError::GroupNotFound(group_id))?;
        group.collapsed = collapsed;
        drop(state);
        self.emit(TabStripEvent::GroupUpdated { group_id });
        Ok(())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<(), ProviderError> {
        self.record(RecordedCall::Close(tab_id));
        let events = self.remove_tab_inner(tab_id)?;
        self.emit_all(events);
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<TabStripEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}
