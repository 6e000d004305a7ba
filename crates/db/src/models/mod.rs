pub mod bot_settings;
pub mod recommendation;
