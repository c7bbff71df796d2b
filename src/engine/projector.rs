//! Flat list projection.
//!
//! Folds the snapshot's tabs and groups into the single ordered sequence the
//! panel renders. Group headers are woven in where their first member appears
//! in strip order, so the projection never reorders tabs relative to the
//! strip itself.

use std::collections::{HashMap, HashSet};

use crate::types::render::RenderItem;
use crate::types::tab::{GroupId, Tab, TabGroup};

/// Projects tabs and groups into render order.
///
/// A group header is emitted immediately before its first member tab. Members
/// of a group whose effective expansion is `false` are omitted while the
/// header stays, which is how a collapsed group renders as a single row.
/// Groups absent from `expansion` count as expanded; a tab whose group id is
/// not in `groups` is treated as ungrouped. Groups that currently own no tabs
/// are appended at the end so they remain visible drop targets.
pub fn project(
    tabs: &[Tab],
    groups: &[TabGroup],
    expansion: &HashMap<GroupId, bool>,
) -> Vec<RenderItem> {
    let known: HashMap<GroupId, &TabGroup> = groups.iter().map(|g| (g.id, g)).collect();

    let mut items = Vec::with_capacity(tabs.len() + groups.len());
    let mut emitted: HashSet<GroupId> = HashSet::new();
    let mut current_group: Option<GroupId> = None;

    for tab in tabs {
        match tab.group_id.filter(|id| known.contains_key(id)) {
            Some(group_id) => {
                if current_group != Some(group_id) && !emitted.contains(&group_id) {
                    if let Some(group) = known.get(&group_id) {
                        items.push(RenderItem::Group((*group).clone()));
                        emitted.insert(group_id);
                    }
                }
                current_group = Some(group_id);
                let expanded = expansion.get(&group_id).copied().unwrap_or(true);
                if expanded {
                    items.push(RenderItem::Tab(tab.clone()));
                }
            }
            None => {
                current_group = None;
                items.push(RenderItem::Tab(tab.clone()));
            }
        }
    }

    for group in groups {
        if !emitted.contains(&group.id) {
            items.push(RenderItem::Group(group.clone()));
        }
    }

    items
}
