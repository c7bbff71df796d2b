//! Drag reorder and regroup planning.
//!
//! A drop hands us two render-list keys and, for header targets, the pointer
//! geometry. Planning replays the drop against the projected list to decide
//! where the tab lands in external strip order and which group it belongs to
//! afterwards, then the engine realizes the plan through provider mutations.
//! Planning always runs against a fully expanded projection so collapsed
//! rows cannot skew external indices.

use std::collections::HashMap;

use log::{debug, error};

use crate::provider::TabStripProvider;
use crate::types::errors::ProviderError;
use crate::types::render::RenderItem;
use crate::types::tab::{GroupId, Tab, TabId};

use super::{projector, TabEngine};

/// Pointer geometry of a drop relative to the row under the pointer. Only
/// consulted when the drop target is a group header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropGeometry {
    pub pointer_y: f64,
    pub target_top: f64,
    pub target_height: f64,
}

impl DropGeometry {
    /// Whether the pointer sits past the vertical midpoint of the target
    /// row. Past the midpoint of a header means "into the group".
    fn past_target_center(&self) -> bool {
        self.pointer_y >= self.target_top + self.target_height / 2.0
    }
}

/// Transient drag state between drag-start and drag-end, published so the
/// panel can style the dragged row and the drop target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragSession {
    pub active_item: Option<RenderItem>,
    pub over_item: Option<RenderItem>,
}

/// The provider mutations one drop resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPlan {
    pub tab_id: TabId,
    pub new_group: Option<GroupId>,
    pub membership_changed: bool,
    pub external_index: usize,
}

/// Plans a drop of `active_id` onto `over_id` within the projected `items`.
///
/// Returns `None` when the drop changes nothing: self-drops, header drags,
/// unknown keys, and drops that leave both group membership and external
/// position as they are. `tabs` is the snapshot in external order and
/// anchors the resulting index.
pub fn plan_drop(
    items: &[RenderItem],
    tabs: &[Tab],
    active_id: &str,
    over_id: &str,
    geometry: Option<DropGeometry>,
) -> Option<DropPlan> {
    if active_id == over_id {
        return None;
    }
    let active_pos = items.iter().position(|i| i.key() == active_id)?;
    let over_pos = items.iter().position(|i| i.key() == over_id)?;
    let active_tab = items[active_pos].as_tab()?;

    let without_active: Vec<&RenderItem> = items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != active_pos)
        .map(|(_, item)| item)
        .collect();
    let over_wo = without_active.iter().position(|i| i.key() == over_id)?;

    let insertion = match &items[over_pos] {
        RenderItem::Tab(_) => {
            if active_pos == over_pos + 1 {
                // Dropped onto the row directly above: position is already
                // right, only membership can change.
                over_wo + 1
            } else if active_pos < over_pos {
                over_wo + 1
            } else {
                over_wo
            }
        }
        RenderItem::Group(_) => {
            let into_group = geometry.map(|g| g.past_target_center()).unwrap_or(true);
            if into_group {
                over_wo + 1
            } else {
                over_wo
            }
        }
    };

    let new_group = match &items[over_pos] {
        RenderItem::Tab(target) => target.group_id,
        RenderItem::Group(_) => group_at_insertion(&without_active, insertion),
    };

    let external_index = without_active[..insertion]
        .iter()
        .filter(|i| i.is_tab())
        .count();

    let membership_changed = new_group != active_tab.group_id;
    let current_index = tabs.iter().position(|t| t.id == active_tab.id)?;
    if !membership_changed && external_index == current_index {
        return None;
    }

    Some(DropPlan {
        tab_id: active_tab.id,
        new_group,
        membership_changed,
        external_index,
    })
}

/// Resolves which group an insertion slot falls inside by walking upward
/// from the slot. A header directly above adopts the tab into that group, a
/// run of grouped tabs adopts it into theirs, and an ungrouped tab or the
/// top of the list means no group.
fn group_at_insertion(items: &[&RenderItem], insertion: usize) -> Option<GroupId> {
    let mut run_group: Option<GroupId> = None;
    for item in items[..insertion].iter().rev() {
        match item {
            RenderItem::Group(group) => {
                return match run_group {
                    None => Some(group.id),
                    Some(run) if run == group.id => Some(group.id),
                    Some(_) => None,
                };
            }
            RenderItem::Tab(tab) => match (tab.group_id, run_group) {
                (None, _) => return None,
                (Some(g), None) => run_group = Some(g),
                (Some(g), Some(run)) if g == run => {}
                (Some(_), Some(_)) => return None,
            },
        }
    }
    None
}

impl<P: TabStripProvider> TabEngine<P> {
    /// Begins a drag over the rendered list.
    pub fn on_drag_start(&mut self, key: &str) {
        match self.render_list().into_iter().find(|i| i.key() == key) {
            Some(item) => {
                self.drag = DragSession {
                    active_item: Some(item),
                    over_item: None,
                };
            }
            None => debug!("Drag started on unknown key {}", key),
        }
    }

    /// Updates the row currently hovered by the drag, `None` when the
    /// pointer leaves the list.
    pub fn on_drag_over(&mut self, key: Option<&str>) {
        if self.drag.active_item.is_none() {
            return;
        }
        self.drag.over_item =
            key.and_then(|k| self.render_list().into_iter().find(|i| i.key() == k));
    }

    /// Completes a drag. The session is cleared no matter how the drop
    /// resolves; a planned drop is applied to the snapshot optimistically
    /// and then pushed to the provider, falling back to a full refresh when
    /// any mutation fails partway.
    pub async fn on_drag_end(
        &mut self,
        active_id: &str,
        over_id: Option<&str>,
        geometry: Option<DropGeometry>,
    ) {
        self.drag = DragSession::default();
        let Some(over_id) = over_id else {
            return;
        };
        let planning = projector::project(
            self.snapshot.tabs(),
            self.snapshot.groups(),
            &HashMap::new(),
        );
        let Some(plan) = plan_drop(
            &planning,
            self.snapshot.tabs(),
            active_id,
            over_id,
            geometry,
        ) else {
            return;
        };

        self.snapshot
            .apply_reorder(plan.tab_id, plan.new_group, plan.external_index);

        if let Err(err) = self.apply_drop_plan(&plan).await {
            error!(
                "Drop of tab {} failed: {}; refreshing from the strip",
                plan.tab_id, err
            );
            self.full_refresh().await;
        }
    }

    async fn apply_drop_plan(&self, plan: &DropPlan) -> Result<(), ProviderError> {
        if plan.membership_changed {
            match plan.new_group {
                Some(group_id) => self.provider.group_tab(plan.tab_id, group_id).await?,
                None => self.provider.ungroup_tab(plan.tab_id).await?,
            }
        }
        self.provider.move_tab(plan.tab_id, plan.external_index).await
    }
}
