use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default hover-to-preview debounce in milliseconds.
pub const DEFAULT_HOVER_PREVIEW_DELAY_MS: u64 = 250;

/// Color pairing applied before the user picks one.
pub const DEFAULT_COLOR_PAIRING_ID: &str = "charcoal-violet-amber";

/// User-tunable side-panel settings.
///
/// The engine consumes the hover delay; the color pairing id is persisted
/// on behalf of the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelSettings {
    #[serde(default = "default_hover_delay")]
    pub hover_preview_delay_ms: u64,
    #[serde(default = "default_color_pairing")]
    pub color_pairing_id: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            hover_preview_delay_ms: DEFAULT_HOVER_PREVIEW_DELAY_MS,
            color_pairing_id: DEFAULT_COLOR_PAIRING_ID.to_string(),
        }
    }
}

impl PanelSettings {
    /// Debounce between row hover and preview activation. The unsigned
    /// millisecond representation keeps the value a non-negative whole
    /// number; zero previews immediately.
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_preview_delay_ms)
    }
}

fn default_hover_delay() -> u64 {
    DEFAULT_HOVER_PREVIEW_DELAY_MS
}

fn default_color_pairing() -> String {
    DEFAULT_COLOR_PAIRING_ID.to_string()
}
