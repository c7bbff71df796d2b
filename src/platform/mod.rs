// tabdeck platform abstraction
// Provides the platform-specific config path for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for tabdeck.
///
/// - **Linux**: `~/.config/tabdeck` (or `$XDG_CONFIG_HOME/tabdeck`)
/// - **macOS**: `~/Library/Application Support/tabdeck`
/// - **Windows**: `%APPDATA%/tabdeck`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}
