//! Change notification bridge.
//!
//! Applies provider notifications to the engine: cheap targeted patches
//! where the notification carries enough data, full refreshes where it does
//! not. Events for other windows are dropped here so a busy sibling window
//! can never perturb this panel's hover session.

use log::debug;

use crate::provider::TabStripProvider;
use crate::types::events::{TabDelta, TabStripEvent};
use crate::types::tab::{TabId, WindowId};

use super::TabEngine;

impl<P: TabStripProvider> TabEngine<P> {
    /// Applies one provider notification to the snapshot and hover session.
    pub async fn apply_event(&mut self, event: TabStripEvent) {
        match event {
            TabStripEvent::TabCreated { tab, window_id } => {
                if self.is_current_window(window_id) {
                    debug!("Tab {} created; refreshing", tab.id);
                    self.full_refresh().await;
                }
            }
            TabStripEvent::TabRemoved { tab_id } => self.handle_tab_removed(tab_id),
            TabStripEvent::TabUpdated { tab_id, delta } => {
                self.handle_tab_updated(tab_id, delta).await;
            }
            TabStripEvent::TabMoved { window_id, .. } => {
                if self.is_current_window(window_id) {
                    self.full_refresh().await;
                }
            }
            TabStripEvent::TabReplaced {
                added_tab_id,
                removed_tab_id,
            } => {
                self.handle_tab_replaced(added_tab_id, removed_tab_id).await;
            }
            TabStripEvent::TabActivated { tab_id, window_id } => {
                if self.is_current_window(window_id) {
                    self.hover.tab_activated(tab_id).await;
                }
            }
            TabStripEvent::WindowFocusChanged { window_id } => {
                if self.is_current_window(window_id) {
                    self.full_refresh().await;
                }
            }
            TabStripEvent::GroupCreated { .. }
            | TabStripEvent::GroupUpdated { .. }
            | TabStripEvent::GroupRemoved { .. } => {
                self.refresh_groups().await;
            }
        }
    }

    fn is_current_window(&self, window_id: WindowId) -> bool {
        self.window_id == Some(window_id)
    }

    fn handle_tab_removed(&mut self, tab_id: TabId) {
        self.snapshot.remove_tab(tab_id);
        self.hover.forget_tab(tab_id);
    }

    async fn handle_tab_updated(&mut self, tab_id: TabId, delta: TabDelta) {
        if !delta.is_relevant() {
            return;
        }
        let group_changed = delta.changes_group();
        self.snapshot.merge_tab(tab_id, &delta);
        self.hover.merge_original(tab_id, &delta);
        if group_changed {
            // Membership moves can create or empty out groups.
            self.refresh_groups().await;
        }
    }

    async fn handle_tab_replaced(&mut self, added_tab_id: TabId, removed_tab_id: TabId) {
        self.full_refresh().await;
        let replacement = self.snapshot.tab(added_tab_id).cloned();
        self.hover
            .repoint_tab(removed_tab_id, added_tab_id, replacement.as_ref());
    }
}
