// Publish workflow - post the role message, then attach (or re-attach) the button

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::api::discord::{DiscordGateway, GatewayError};
use crate::api::settings_store::SettingsStore;
use crate::models::button::RoleButton;
use crate::models::guild::ConfigField;
use crate::utils::errors::RoleButtonError;

/// Where a publish step left the role message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub channel_id: serenity::ChannelId,
    pub message_id: serenity::MessageId,
    /// Button carried by the message, if any
    pub button: Option<RoleButton>,
}

/// Send the configured message text to the configured channel.
///
/// When the button is already fully configured it goes out with the message,
/// otherwise the plain message is sent and `attach_button` adds it later.
pub async fn publish_message<G>(
    gateway: &G,
    store: &SettingsStore,
    guild_id: serenity::GuildId,
) -> Result<Published, RoleButtonError>
where
    G: DiscordGateway + ?Sized,
{
    let config = store.get(guild_id).await.unwrap_or_default();

    let channel_id = config
        .channel_id
        .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::Channel))?;
    let text = config
        .message_text
        .as_deref()
        .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::MessageText))?;

    if !gateway.channel_accessible(channel_id).await? {
        return Err(RoleButtonError::ChannelNotFound(channel_id));
    }

    let button = config.role_button().ok();
    // The channel can vanish or lock the bot out after the check above
    let message_id = gateway
        .send_message(channel_id, text, button.as_ref())
        .await
        .map_err(|e| match e {
            GatewayError::Missing => RoleButtonError::ChannelNotFound(channel_id),
            other => other.into(),
        })?;

    store
        .update(guild_id, |c| c.record_published(channel_id, message_id))
        .await?;

    info!(
        "Published role message {} in channel {} for guild {} (button: {})",
        message_id,
        channel_id,
        guild_id,
        button.is_some()
    );

    Ok(Published {
        channel_id,
        message_id,
        button,
    })
}

/// Put the configured button on the published message, or on `target` when
/// given. The message's components are replaced, so repeating this never
/// stacks a second button.
pub async fn attach_button<G>(
    gateway: &G,
    store: &SettingsStore,
    guild_id: serenity::GuildId,
    target: Option<serenity::MessageId>,
) -> Result<Published, RoleButtonError>
where
    G: DiscordGateway + ?Sized,
{
    let config = store.get(guild_id).await.unwrap_or_default();

    let channel_id = config
        .channel_id
        .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::Channel))?;
    let message_id = target
        .or(config.published_message_id)
        .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::PublishedMessage))?;
    let button = config.role_button()?;

    if !gateway.message_exists(channel_id, message_id).await? {
        return Err(RoleButtonError::MessageNotFound {
            channel_id,
            message_id,
        });
    }

    gateway
        .set_message_button(channel_id, message_id, &button)
        .await
        .map_err(|e| match e {
            GatewayError::Missing => RoleButtonError::MessageNotFound {
                channel_id,
                message_id,
            },
            other => other.into(),
        })?;

    store
        .update(guild_id, |c| c.record_published(channel_id, message_id))
        .await?;

    info!(
        "Attached role button for role {} to message {} in guild {}",
        button.role_id, message_id, guild_id
    );

    Ok(Published {
        channel_id,
        message_id,
        button: Some(button),
    })
}
