use std::fmt;

use super::tab::{GroupId, TabId};

// === ProviderError ===

/// Errors reported by the tab-strip provider.
#[derive(Debug)]
pub enum ProviderError {
    /// Tab with the given ID was not found.
    TabNotFound(TabId),
    /// Group with the given ID was not found.
    GroupNotFound(GroupId),
    /// No current window could be resolved.
    WindowNotFound,
    /// The provider backend rejected or failed the operation.
    Backend(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
            ProviderError::GroupNotFound(id) => write!(f, "Tab group not found: {}", id),
            ProviderError::WindowNotFound => write!(f, "No current window"),
            ProviderError::Backend(msg) => write!(f, "Provider backend error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

// === SettingsError ===

/// Errors related to settings persistence.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
