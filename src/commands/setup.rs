// Configuration commands - one per GuildConfig field

use poise::serenity_prelude as serenity;

use super::{confirm, reply_private, update_config};
use crate::models::button::ButtonColor;
use crate::utils::errors::RoleButtonError;
use crate::{Context, Error};

/// Choose the channel the role message is posted in
#[poise::command(
    slash_command,
    rename = "set-channel",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_channel(
    ctx: Context<'_>,
    #[description = "Text or announcement channel for the role message"]
    #[channel_types("Text", "News")]
    channel: serenity::Channel,
) -> Result<(), Error> {
    let guild_channel = channel.guild();
    let result = update_config(ctx, "channel", |config| {
        let gc = guild_channel.as_ref().ok_or_else(|| {
            RoleButtonError::Validation("Pick a channel from this server.".to_string())
        })?;
        check_channel(ctx.guild_id(), gc.guild_id, gc.kind)?;
        config.set_channel(gc.id)
    })
    .await
    .map(|config| {
        let channel_id = config.channel_id.map(|id| id.to_string()).unwrap_or_default();
        confirm(format!("Role message channel set to <#{}>.", channel_id), &config)
    });

    reply_private(ctx, result).await
}

/// Set the text of the role message
#[poise::command(
    slash_command,
    rename = "set-message-text",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_message_text(
    ctx: Context<'_>,
    #[description = "Message body (up to 2000 characters)"] text: String,
) -> Result<(), Error> {
    let result = update_config(ctx, "message text", |config| config.set_message_text(&text))
        .await
        .map(|config| confirm("Message text saved.", &config));

    reply_private(ctx, result).await
}

/// Set the label shown on the role button
#[poise::command(
    slash_command,
    rename = "set-button-label",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_button_label(
    ctx: Context<'_>,
    #[description = "Button label (up to 80 characters)"] label: String,
) -> Result<(), Error> {
    let result = update_config(ctx, "button label", |config| config.set_button_label(&label))
        .await
        .map(|config| {
            let label = config.button_label.clone().unwrap_or_default();
            confirm(format!("Button label set to **{}**.", label), &config)
        });

    reply_private(ctx, result).await
}

async fn autocomplete_color(_ctx: Context<'_>, partial: &str) -> impl Iterator<Item = String> {
    let partial = partial.trim().to_ascii_lowercase();
    ButtonColor::ALL
        .iter()
        .map(|color| color.name().to_string())
        .filter(|name| name.starts_with(&partial))
        .collect::<Vec<_>>()
        .into_iter()
}

/// Set the role button color
#[poise::command(
    slash_command,
    rename = "set-button-color",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_button_color(
    ctx: Context<'_>,
    #[description = "primary, secondary, success or danger"]
    #[autocomplete = "autocomplete_color"]
    color: String,
) -> Result<(), Error> {
    let result = update_config(ctx, "button color", |config| config.set_button_color(&color))
        .await
        .map(|config| confirm(format!("Button color set to **{}**.", config.color()), &config));

    reply_private(ctx, result).await
}

/// Choose the role the button hands out
#[poise::command(
    slash_command,
    rename = "set-button-role",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_button_role(
    ctx: Context<'_>,
    #[description = "Role granted by the button"] role: serenity::Role,
) -> Result<(), Error> {
    let result = update_config(ctx, "button role", |config| {
        check_role(ctx.guild_id(), role.id, role.guild_id, role.managed)?;
        config.set_role(role.id)
    })
    .await
    .map(|config| confirm(format!("Button role set to <@&{}>.", role.id), &config));

    reply_private(ctx, result).await
}

/// The role message has to go to a text channel of the invoking server
fn check_channel(
    guild_id: Option<serenity::GuildId>,
    channel_guild: serenity::GuildId,
    kind: serenity::ChannelType,
) -> Result<(), RoleButtonError> {
    if guild_id != Some(channel_guild) {
        return Err(RoleButtonError::Validation(
            "Pick a channel from this server.".to_string(),
        ));
    }
    if !matches!(kind, serenity::ChannelType::Text | serenity::ChannelType::News) {
        return Err(RoleButtonError::Validation(
            "The role message needs a text or announcement channel.".to_string(),
        ));
    }
    Ok(())
}

/// `@everyone` and integration roles can't be handed out
fn check_role(
    guild_id: Option<serenity::GuildId>,
    role_id: serenity::RoleId,
    role_guild: serenity::GuildId,
    managed: bool,
) -> Result<(), RoleButtonError> {
    if guild_id != Some(role_guild) {
        return Err(RoleButtonError::Validation(
            "Pick a role from this server.".to_string(),
        ));
    }
    if role_id.get() == role_guild.get() {
        return Err(RoleButtonError::Validation(
            "@everyone can't be handed out by a button.".to_string(),
        ));
    }
    if managed {
        return Err(RoleButtonError::Validation(
            "That role is managed by an integration and can't be assigned.".to_string(),
        ));
    }
    Ok(())
}
