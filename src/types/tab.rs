use serde::{Deserialize, Serialize};

/// External identifier of a tab, assigned by the tab-strip provider.
pub type TabId = i64;

/// External identifier of a tab group.
pub type GroupId = i64;

/// External identifier of a browser window.
pub type WindowId = i64;

/// How long a tab may go unvisited before it counts as stale.
pub const STALE_TAB_THRESHOLD_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Represents one browser tab as reported by the tab-strip provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub favicon: Option<String>,
    #[serde(default)]
    pub status: TabStatus,
    pub last_accessed: Option<i64>,
    pub group_id: Option<GroupId>,
}

impl Tab {
    /// True when the tab has gone unvisited for longer than
    /// [`STALE_TAB_THRESHOLD_MS`]. Tabs that never reported a last-access
    /// time are never stale.
    pub fn is_stale(&self, now_ms: i64) -> bool {
        match self.last_accessed {
            Some(accessed) => now_ms.saturating_sub(accessed) > STALE_TAB_THRESHOLD_MS,
            None => false,
        }
    }
}

/// Load state of a tab, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    Unloaded,
    Error,
}

impl Default for TabStatus {
    fn default() -> Self {
        TabStatus::Complete
    }
}

/// A tab group in the strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    pub title: String,
    pub color: GroupColor,
    pub collapsed: bool,
    pub window_id: WindowId,
}

/// Fixed palette of group colors supported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}
