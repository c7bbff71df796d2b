//! Side panel tab engine.
//!
//! Owns the mirrored strip snapshot, the hover preview session, the drag
//! session and the per-group expansion state, and exposes the gesture and
//! notification entry points the panel driver feeds. The engine never owns
//! the tabs themselves; every mutation goes through the provider and comes
//! back as a notification.

pub mod bridge;
pub mod hover;
pub mod projector;
pub mod reorder;
pub mod snapshot;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::time::Instant;

use crate::provider::TabStripProvider;
use crate::types::render::{row_badges, RenderItem, RowBadges};
use crate::types::settings::PanelSettings;
use crate::types::tab::{GroupId, Tab, TabGroup, TabId, WindowId};

use hover::HoverPreview;
use reorder::DragSession;
use snapshot::SnapshotStore;

/// Engine for one side panel bound to one browser window.
pub struct TabEngine<P> {
    provider: Arc<P>,
    snapshot: SnapshotStore,
    hover: HoverPreview<P>,
    drag: DragSession,
    expansion_overrides: HashMap<GroupId, bool>,
    window_id: Option<WindowId>,
}

impl<P: TabStripProvider> TabEngine<P> {
    pub fn new(provider: Arc<P>, settings: &PanelSettings) -> Self {
        let hover = HoverPreview::new(provider.clone(), settings.hover_delay());
        Self {
            provider,
            snapshot: SnapshotStore::new(),
            hover,
            drag: DragSession::default(),
            expansion_overrides: HashMap::new(),
            window_id: None,
        }
    }

    /// Applies a settings change. Only the hover delay matters to the
    /// engine; an already scheduled hover keeps its deadline.
    pub fn set_settings(&mut self, settings: &PanelSettings) {
        self.hover.set_delay(settings.hover_delay());
    }

    /// Binds the engine to the current window, records the tab the user is
    /// on and takes the first snapshot.
    pub async fn initialize(&mut self) {
        match self.provider.current_window_id().await {
            Ok(Some(window_id)) => self.window_id = Some(window_id),
            Ok(None) => warn!("No current window; the panel starts empty"),
            Err(err) => error!("Failed to resolve the current window: {}", err),
        }
        match self.provider.active_tab().await {
            Ok(active) => self.hover.seed_original(active),
            Err(err) => error!("Failed to query the active tab: {}", err),
        }
        self.full_refresh().await;
    }

    /// Re-reads tabs and groups from the provider, replacing the snapshot
    /// wholesale. On failure the prior snapshot stays so the panel keeps
    /// rendering the last state it knew.
    pub async fn full_refresh(&mut self) {
        if self.window_id.is_none() {
            match self.provider.current_window_id().await {
                Ok(id) => self.window_id = id,
                Err(err) => {
                    error!("Failed to resolve the current window: {}", err);
                    return;
                }
            }
        }
        let Some(window_id) = self.window_id else {
            return;
        };
        match self.provider.list_tabs(window_id).await {
            Ok(tabs) => self.snapshot.replace_tabs(tabs),
            Err(err) => {
                error!("Failed to list tabs: {}", err);
                return;
            }
        }
        self.refresh_groups_for(window_id).await;
    }

    /// Re-reads only the group collection.
    pub async fn refresh_groups(&mut self) {
        let Some(window_id) = self.window_id else {
            return;
        };
        self.refresh_groups_for(window_id).await;
    }

    async fn refresh_groups_for(&mut self, window_id: WindowId) {
        match self.provider.list_groups(window_id).await {
            Ok(groups) => {
                // An override survives only while its group exists and it
                // still disagrees with the strip's own collapsed state.
                // Once the strip catches up the override is redundant, and
                // dropping it lets later external folds win.
                self.expansion_overrides
                    .retain(|id, expanded| {
                        groups.iter().any(|g| g.id == *id && *expanded != !g.collapsed)
                    });
                self.snapshot.replace_groups(groups);
            }
            Err(err) => error!("Failed to list groups: {}", err),
        }
    }

    /// The flat list the panel renders, in strip order with headers woven
    /// in and collapsed members omitted.
    pub fn render_list(&self) -> Vec<RenderItem> {
        projector::project(
            self.snapshot.tabs(),
            self.snapshot.groups(),
            &self.effective_expansion(),
        )
    }

    /// Effective expansion per group: the recorded toggle override where one
    /// exists, otherwise the inverse of the strip's collapsed flag.
    pub fn effective_expansion(&self) -> HashMap<GroupId, bool> {
        self.snapshot
            .groups()
            .iter()
            .map(|g| {
                let expanded = self
                    .expansion_overrides
                    .get(&g.id)
                    .copied()
                    .unwrap_or(!g.collapsed);
                (g.id, expanded)
            })
            .collect()
    }

    pub fn tabs(&self) -> &[Tab] {
        self.snapshot.tabs()
    }

    pub fn groups(&self) -> &[TabGroup] {
        self.snapshot.groups()
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window_id
    }

    pub fn original_tab(&self) -> Option<&Tab> {
        self.hover.original_tab()
    }

    pub fn preview_tab_id(&self) -> Option<TabId> {
        self.hover.preview_tab_id()
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Row decoration flags for one tab, derived from the hover session and
    /// the tab's own state.
    pub fn badges(&self, tab: &Tab, now_ms: i64) -> RowBadges {
        row_badges(
            tab,
            self.hover.original_tab().map(|t| t.id),
            self.hover.preview_tab_id(),
            now_ms,
        )
    }

    /// Pointer entered a tab row.
    pub async fn on_hover(&mut self, tab_id: TabId) {
        self.hover.hover(tab_id).await;
    }

    /// Pointer left the tab list.
    pub async fn on_hover_end(&mut self) {
        self.hover.hover_end().await;
    }

    /// The user clicked a tab row. The click anchors the hover session on
    /// that tab; the activation itself is issued by the UI and comes back
    /// through the notification stream as a user switch.
    pub fn on_click(&mut self, tab_id: TabId) {
        match self.snapshot.tab(tab_id) {
            Some(tab) => {
                let tab = tab.clone();
                self.hover.click(&tab);
            }
            None => debug!("Click on unknown tab {}", tab_id),
        }
    }

    /// The user pressed a row's close button.
    pub async fn on_close_tab(&mut self, tab_id: TabId) {
        if let Err(err) = self.provider.close_tab(tab_id).await {
            error!("Failed to close tab {}: {}", tab_id, err);
        }
    }

    /// The user toggled a group header. Records the override immediately so
    /// the UI responds, then pushes the new collapsed state to the strip.
    pub async fn on_group_toggle(&mut self, group_id: GroupId) {
        let Some(group) = self.snapshot.group(group_id) else {
            debug!("Toggle on unknown group {}", group_id);
            return;
        };
        let was_expanded = self
            .expansion_overrides
            .get(&group_id)
            .copied()
            .unwrap_or(!group.collapsed);
        self.expansion_overrides.insert(group_id, !was_expanded);
        if let Err(err) = self.provider.set_group_collapsed(group_id, was_expanded).await {
            error!("Failed to fold group {}: {}", group_id, err);
        }
    }

    /// Earliest pending deadline, for the driver's sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hover.next_deadline()
    }

    /// Runs deadline work due by `now`: debounced hovers and the switch
    /// guard failsafe.
    pub async fn handle_deadline(&mut self, now: Instant) {
        self.hover.handle_deadline(now).await;
    }
}
