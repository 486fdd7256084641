// Errors surfaced to whoever invoked a command or clicked a button

use poise::serenity_prelude as serenity;

use crate::api::discord::GatewayError;
use crate::api::settings_store::StoreError;
use crate::models::guild::ConfigField;

/// Everything a command or button click can fail with. The `Display` text is
/// what the invoking user sees in the private reply.
#[derive(Debug, thiserror::Error)]
pub enum RoleButtonError {
    #[error("{0}")]
    Validation(String),

    #[error("Configuration incomplete: missing {0}.")]
    ConfigIncomplete(ConfigField),

    #[error("Channel <#{0}> no longer exists or I can't access it.")]
    ChannelNotFound(serenity::ChannelId),

    #[error("Message {message_id} was not found in <#{channel_id}>. It may have been deleted.")]
    MessageNotFound {
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    },

    #[error("The role <@&{0}> no longer exists in this server.")]
    RoleNotFound(serenity::RoleId),

    #[error("No role is configured for this button yet. Ask an admin to run `/set-button-role`.")]
    RoleNotConfigured,

    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to save settings: {0}")]
    Store(#[from] StoreError),
}
