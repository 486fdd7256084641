// Outbound collaborators: Discord and the settings file
pub mod discord;
pub mod settings_store;
