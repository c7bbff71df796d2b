use serde::{Deserialize, Serialize};

use super::tab::{Tab, TabGroup, TabId, TabStatus};

/// One entry in the projected side-panel list: either a group header or a
/// tab row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderItem {
    Group(TabGroup),
    Tab(Tab),
}

impl RenderItem {
    /// Stable string key for list reconciliation in the presentation layer.
    pub fn key(&self) -> String {
        match self {
            RenderItem::Group(group) => format!("group-{}", group.id),
            RenderItem::Tab(tab) => format!("tab-{}", tab.id),
        }
    }

    pub fn is_tab(&self) -> bool {
        matches!(self, RenderItem::Tab(_))
    }

    pub fn as_tab(&self) -> Option<&Tab> {
        match self {
            RenderItem::Tab(tab) => Some(tab),
            RenderItem::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&TabGroup> {
        match self {
            RenderItem::Group(group) => Some(group),
            RenderItem::Tab(_) => None,
        }
    }
}

/// Presentation-facing state flags for one tab row. Flags are independent
/// and may combine; precedence is the presentation layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowBadges {
    pub original: bool,
    pub preview: bool,
    pub loading: bool,
    pub error: bool,
    pub stale: bool,
}

/// Classifies one tab row against the current hover session.
pub fn row_badges(
    tab: &Tab,
    original_tab_id: Option<TabId>,
    preview_tab_id: Option<TabId>,
    now_ms: i64,
) -> RowBadges {
    RowBadges {
        original: original_tab_id == Some(tab.id),
        preview: preview_tab_id == Some(tab.id),
        loading: tab.status == TabStatus::Loading,
        error: matches!(tab.status, TabStatus::Unloaded | TabStatus::Error),
        stale: tab.is_stale(now_ms),
    }
}
