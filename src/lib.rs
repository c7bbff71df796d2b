//! tabdeck — a browser side panel engine for tabs and tab groups.
//!
//! Mirrors an externally owned tab strip into a flat render list, previews
//! tabs on hover with restore-on-leave, and turns list drops into strip
//! reorder and regroup mutations. The strip itself stays the source of
//! truth; every mutation goes through a [`provider::TabStripProvider`] and
//! comes back as a notification.

pub mod engine;
pub mod panel;
pub mod platform;
pub mod provider;
pub mod services;
pub mod types;
