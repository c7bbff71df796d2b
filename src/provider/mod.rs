// Tab-strip provider abstraction
// The engine reads and mutates the external tab strip exclusively through
// this trait and consumes its change notifications.

pub mod memory;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::errors::ProviderError;
use crate::types::events::TabStripEvent;
use crate::types::tab::{GroupId, Tab, TabGroup, TabId, WindowId};

/// Trait defining the tab-strip provider interface.
///
/// The provider owns the true ordered list of tabs and groups per window.
/// Every call is fallible: a tab or window can disappear between a query
/// and its use. The engine never treats one of its own mutations as final
/// until the provider confirms it through a notification or a re-query.
#[allow(async_fn_in_trait)]
pub trait TabStripProvider {
    /// Tabs of the window, ordered by external strip position.
    async fn list_tabs(&self, window_id: WindowId) -> Result<Vec<Tab>, ProviderError>;
    async fn list_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, ProviderError>;
    async fn active_tab(&self) -> Result<Option<Tab>, ProviderError>;
    async fn tab_by_id(&self, tab_id: TabId) -> Result<Option<Tab>, ProviderError>;
    async fn current_window_id(&self) -> Result<Option<WindowId>, ProviderError>;
    async fn activate(&self, tab_id: TabId) -> Result<(), ProviderError>;
    /// Moves a tab to `index`, counted over tabs only (headers are not
    /// addressable positions).
    async fn move_tab(&self, tab_id: TabId, index: usize) -> Result<(), ProviderError>;
    async fn group_tab(&self, tab_id: TabId, group_id: GroupId) -> Result<(), ProviderError>;
    async fn ungroup_tab(&self, tab_id: TabId) -> Result<(), ProviderError>;
    async fn set_group_collapsed(
        &self,
        group_id: GroupId,
        collapsed: bool,
    ) -> Result<(), ProviderError>;
    async fn close_tab(&self, tab_id: TabId) -> Result<(), ProviderError>;
    /// Opens a fresh subscription to the change notification stream.
    fn subscribe(&self) -> UnboundedReceiver<TabStripEvent>;
}
