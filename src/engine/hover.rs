//! Hover preview state machine.
//!
//! Pointing at a tab row activates that tab after a short debounce; moving
//! the pointer away restores the tab the user actually selected last. The
//! provider reports our own programmatic activations back to us through the
//! same notification stream as real user switches, so every activation this
//! module issues raises a guard flag that swallows exactly one incoming
//! activation notice. A failsafe deadline clears the guard if the notice
//! never arrives.

use std::sync::Arc;

use log::{debug, error, warn};
use tokio::time::{Duration, Instant};

use crate::provider::TabStripProvider;
use crate::types::events::TabDelta;
use crate::types::tab::{Tab, TabId};

/// How long a raised switch guard may wait for its activation notice before
/// it is dropped as lost.
pub const SWITCH_GUARD_FAILSAFE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingHover {
    tab_id: TabId,
    deadline: Instant,
}

/// Debounced hover-to-preview session over one provider.
pub struct HoverPreview<P> {
    provider: Arc<P>,
    delay: Duration,
    original_tab: Option<Tab>,
    preview_tab_id: Option<TabId>,
    pending: Option<PendingHover>,
    guard_raised: bool,
    guard_deadline: Option<Instant>,
    switch_in_flight: bool,
}

impl<P: TabStripProvider> HoverPreview<P> {
    pub fn new(provider: Arc<P>, delay: Duration) -> Self {
        Self {
            provider,
            delay,
            original_tab: None,
            preview_tab_id: None,
            pending: None,
            guard_raised: false,
            guard_deadline: None,
            switch_in_flight: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Updates the debounce delay. An already scheduled hover keeps the
    /// deadline it was given.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn original_tab(&self) -> Option<&Tab> {
        self.original_tab.as_ref()
    }

    pub fn preview_tab_id(&self) -> Option<TabId> {
        self.preview_tab_id
    }

    /// The tab the user perceives as current: the preview while one is
    /// showing, otherwise the recorded original.
    pub fn effective_active_id(&self) -> Option<TabId> {
        self.preview_tab_id
            .or_else(|| self.original_tab.as_ref().map(|t| t.id))
    }

    pub fn pending_hover_id(&self) -> Option<TabId> {
        self.pending.map(|p| p.tab_id)
    }

    /// Records the tab that was active when the panel opened.
    pub fn seed_original(&mut self, tab: Option<Tab>) {
        self.original_tab = tab;
    }

    /// Handles the pointer entering a tab row. Schedules a preview switch
    /// after the debounce delay; a later hover replaces the schedule, so only
    /// the row the pointer rests on ever activates.
    pub async fn hover(&mut self, tab_id: TabId) {
        if Some(tab_id) == self.effective_active_id() {
            return;
        }
        if self.switch_in_flight {
            debug!("Hover on tab {} dropped while a switch is in flight", tab_id);
            return;
        }
        self.pending = Some(PendingHover {
            tab_id,
            deadline: Instant::now() + self.delay,
        });
        if self.delay.is_zero() {
            self.fire_pending().await;
        }
    }

    /// Fires the scheduled hover, if any, activating the hovered tab as a
    /// preview.
    pub async fn fire_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.raise_guard();
        self.switch_in_flight = true;
        match self.provider.activate(pending.tab_id).await {
            Ok(()) => self.preview_tab_id = Some(pending.tab_id),
            Err(err) => {
                error!("Failed to activate preview tab {}: {}", pending.tab_id, err);
                self.clear_guard();
            }
        }
        self.switch_in_flight = false;
    }

    /// Handles the pointer leaving the tab list. Cancels any scheduled hover
    /// and, if a preview is showing, switches back to the original tab.
    pub async fn hover_end(&mut self) {
        self.pending = None;
        if self.preview_tab_id.is_none() {
            return;
        }
        let Some(original_id) = self.original_tab.as_ref().map(|t| t.id) else {
            debug!("Hover ended with a preview but no original tab to restore");
            return;
        };
        self.raise_guard();
        self.switch_in_flight = true;
        match self.provider.activate(original_id).await {
            Ok(()) => self.preview_tab_id = None,
            Err(err) => {
                error!("Failed to restore original tab {}: {}", original_id, err);
                self.clear_guard();
            }
        }
        self.switch_in_flight = false;
    }

    /// Handles a deliberate click on a tab row. The clicked tab becomes the
    /// new original and any preview session ends; the activation itself is
    /// the UI's own doing and arrives back through the notification stream.
    pub fn click(&mut self, tab: &Tab) {
        self.pending = None;
        self.original_tab = Some(tab.clone());
        self.preview_tab_id = None;
    }

    /// Handles an activation notice from the provider. A raised guard means
    /// the notice echoes our own preview or restore call and is swallowed;
    /// otherwise the user switched tabs by hand and the session re-anchors
    /// on the new tab.
    pub async fn tab_activated(&mut self, tab_id: TabId) {
        if self.guard_raised {
            self.clear_guard();
            return;
        }
        self.pending = None;
        match self.provider.tab_by_id(tab_id).await {
            Ok(Some(tab)) => {
                self.original_tab = Some(tab);
                self.preview_tab_id = None;
            }
            Ok(None) => debug!("Activated tab {} no longer exists", tab_id),
            Err(err) => error!("Failed to fetch activated tab {}: {}", tab_id, err),
        }
    }

    /// Drops every reference to a closed tab so the session cannot restore
    /// or preview it later.
    pub fn forget_tab(&mut self, tab_id: TabId) {
        if self.original_tab.as_ref().map(|t| t.id) == Some(tab_id) {
            self.original_tab = None;
        }
        if self.preview_tab_id == Some(tab_id) {
            self.preview_tab_id = None;
        }
        if self.pending.map(|p| p.tab_id) == Some(tab_id) {
            self.pending = None;
        }
    }

    /// Re-points the session after the strip swapped one tab id for another,
    /// as happens when a discarded tab is revived. `replacement` is the
    /// refreshed tab for the new id when the snapshot has it.
    pub fn repoint_tab(&mut self, removed_id: TabId, added_id: TabId, replacement: Option<&Tab>) {
        if self.original_tab.as_ref().map(|t| t.id) == Some(removed_id) {
            self.original_tab = replacement.cloned();
        }
        if self.preview_tab_id == Some(removed_id) {
            self.preview_tab_id = Some(added_id);
        }
        if let Some(pending) = self.pending.as_mut() {
            if pending.tab_id == removed_id {
                pending.tab_id = added_id;
            }
        }
    }

    /// Folds a field delta into the recorded original so a later restore
    /// reflects current data.
    pub fn merge_original(&mut self, tab_id: TabId, delta: &TabDelta) {
        if let Some(original) = self.original_tab.as_mut() {
            if original.id == tab_id {
                delta.apply_to(original);
            }
        }
    }

    /// Earliest instant at which `handle_deadline` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.map(|p| p.deadline);
        match (pending, self.guard_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    /// Runs whatever deadlines have passed by `now`: expires a stale guard
    /// and fires a due hover.
    pub async fn handle_deadline(&mut self, now: Instant) {
        if self.guard_deadline.is_some_and(|d| d <= now) {
            warn!("Switch guard failsafe fired; activation notice never arrived");
            self.clear_guard();
        }
        if self.pending.is_some_and(|p| p.deadline <= now) {
            self.fire_pending().await;
        }
    }

    fn raise_guard(&mut self) {
        self.guard_raised = true;
        self.guard_deadline = Some(Instant::now() + SWITCH_GUARD_FAILSAFE);
    }

    fn clear_guard(&mut self) {
        self.guard_raised = false;
        self.guard_deadline = None;
    }
}
