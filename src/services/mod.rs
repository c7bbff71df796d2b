// tabdeck services
// Services sit beside the engine: persistent user settings for now.

pub mod settings_store;
