//! Snapshot store for the side panel.
//!
//! Holds the last tab and group state received from the provider. The strip
//! itself is the source of truth; this store is only a mirror that the
//! projector and the drag planner read from. Writers either replace a whole
//! collection after a refresh or patch a single entry in place.

use crate::types::events::TabDelta;
use crate::types::tab::{GroupId, Tab, TabGroup, TabId};

/// Last-known tab strip state, in external strip order.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    tabs: Vec<Tab>,
    groups: Vec<TabGroup>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn groups(&self) -> &[TabGroup] {
        &self.groups
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn group(&self, group_id: GroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Replaces the tab collection wholesale after a provider query.
    pub fn replace_tabs(&mut self, tabs: Vec<Tab>) {
        self.tabs = tabs;
    }

    /// Replaces the group collection wholesale after a provider query.
    pub fn replace_groups(&mut self, groups: Vec<TabGroup>) {
        self.groups = groups;
    }

    /// Drops a tab from the snapshot. Unknown ids are a no-op; the removal
    /// notification may outrun the refresh that would have added the tab.
    pub fn remove_tab(&mut self, tab_id: TabId) -> bool {
        match self.tabs.iter().position(|t| t.id == tab_id) {
            Some(idx) => {
                self.tabs.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Merges a field delta into one tab. Unknown ids are a no-op.
    pub fn merge_tab(&mut self, tab_id: TabId, delta: &TabDelta) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == tab_id) {
            Some(tab) => {
                delta.apply_to(tab);
                true
            }
            None => false,
        }
    }

    /// Optimistically applies a drop: pulls the tab out, rewrites its group
    /// membership and reinserts it at `index` in external order. The index is
    /// clamped so a stale plan cannot push the tab out of bounds.
    pub fn apply_reorder(&mut self, tab_id: TabId, group_id: Option<GroupId>, index: usize) -> bool {
        let Some(idx) = self.tabs.iter().position(|t| t.id == tab_id) else {
            return false;
        };
        let mut tab = self.tabs.remove(idx);
        tab.group_id = group_id;
        let target = index.min(self.tabs.len());
        self.tabs.insert(target, tab);
        true
    }
}
