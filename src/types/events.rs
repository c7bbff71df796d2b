use serde::{Deserialize, Serialize};

use super::tab::{GroupId, Tab, TabGroup, TabId, TabStatus, WindowId};

/// One change notification from the tab-strip provider.
///
/// Delivery is not guaranteed to be strictly ordered; consumers must
/// tolerate patches for ids that no longer exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TabStripEvent {
    TabCreated { tab: Tab, window_id: WindowId },
    TabRemoved { tab_id: TabId },
    TabUpdated { tab_id: TabId, delta: TabDelta },
    TabMoved { tab_id: TabId, window_id: WindowId },
    TabReplaced { added_tab_id: TabId, removed_tab_id: TabId },
    TabActivated { tab_id: TabId, window_id: WindowId },
    WindowFocusChanged { window_id: WindowId },
    GroupCreated { group: TabGroup },
    GroupUpdated { group_id: GroupId },
    GroupRemoved { group_id: GroupId },
}

/// Field-level patch carried by a tab-updated notification.
///
/// `None` fields were not reported as changed. The nested options on
/// `favicon` and `group_id` distinguish "unchanged" from "cleared".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabDelta {
    pub title: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<Option<String>>,
    pub status: Option<TabStatus>,
    pub last_accessed: Option<i64>,
    pub group_id: Option<Option<GroupId>>,
}

impl TabDelta {
    /// True when the patch touches a field the side panel renders.
    pub fn is_relevant(&self) -> bool {
        self.title.is_some()
            || self.url.is_some()
            || self.favicon.is_some()
            || self.status.is_some()
            || self.group_id.is_some()
    }

    /// True when the patch changes group membership.
    pub fn changes_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Merges the reported changes into a snapshot tab.
    pub fn apply_to(&self, tab: &mut Tab) {
        if let Some(title) = &self.title {
            tab.title = title.clone();
        }
        if let Some(url) = &self.url {
            tab.url = url.clone();
        }
        if let Some(favicon) = &self.favicon {
            tab.favicon = favicon.clone();
        }
        if let Some(status) = self.status {
            tab.status = status;
        }
        if let Some(accessed) = self.last_accessed {
            tab.last_accessed = Some(accessed);
        }
        if let Some(group_id) = self.group_id {
            tab.group_id = group_id;
        }
    }
}
