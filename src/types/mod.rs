// tabdeck shared type definitions
// Each submodule defines types used across the engine and its services.

pub mod errors;
pub mod events;
pub mod render;
pub mod settings;
pub mod tab;
