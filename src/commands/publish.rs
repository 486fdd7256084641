// Publish commands - post the role message and attach the button to it

use poise::serenity_prelude as serenity;

use super::{guild_of, reply_private};
use crate::features::publish::{self, Published};
use crate::utils::errors::RoleButtonError;
use crate::utils::formatters::{message_link, parse_message_ref};
use crate::{Context, Error};

/// Post the role message in the configured channel
#[poise::command(
    slash_command,
    rename = "publish-message",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn publish_message(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let result = run_publish(ctx).await;
    reply_private(ctx, result).await
}

async fn run_publish(ctx: Context<'_>) -> Result<String, RoleButtonError> {
    let guild_id = guild_of(ctx)?;
    let data = ctx.data();
    let published = publish::publish_message(&data.gateway, &data.store, guild_id).await?;

    Ok(describe(guild_id, &published))
}

/// Attach the role button to the published message (or another message of the channel)
#[poise::command(
    slash_command,
    rename = "attach-button",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn attach_button(
    ctx: Context<'_>,
    #[description = "ID or link of a message in the configured channel (defaults to the published one)"]
    message: Option<String>,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let result = run_attach(ctx, message.as_deref()).await;
    reply_private(ctx, result).await
}

async fn run_attach(ctx: Context<'_>, message: Option<&str>) -> Result<String, RoleButtonError> {
    let guild_id = guild_of(ctx)?;
    let data = ctx.data();

    let target = match message {
        Some(raw) => {
            let channel_id = data.store.get(guild_id).await.and_then(|c| c.channel_id);
            Some(resolve_target(raw, channel_id)?)
        }
        None => None,
    };

    let published = publish::attach_button(&data.gateway, &data.store, guild_id, target).await?;
    Ok(describe(guild_id, &published))
}

/// Turn a user supplied message id/link into a message of `channel_id`
fn resolve_target(
    raw: &str,
    channel_id: Option<serenity::ChannelId>,
) -> Result<serenity::MessageId, RoleButtonError> {
    let (linked_channel, message_id) = parse_message_ref(raw).ok_or_else(|| {
        RoleButtonError::Validation(format!("`{}` is not a message ID or message link.", raw.trim()))
    })?;

    if let (Some(linked), Some(configured)) = (linked_channel, channel_id) {
        if linked != configured {
            return Err(RoleButtonError::Validation(format!(
                "That message is in <#{}>, but the role message channel is <#{}>.",
                linked, configured
            )));
        }
    }

    Ok(message_id)
}

fn describe(guild_id: serenity::GuildId, published: &Published) -> String {
    let link = message_link(guild_id, published.channel_id, published.message_id);
    match &published.button {
        Some(button) => format!(
            "✅ The **{}** button ({}) for <@&{}> is live on {}",
            button.label, button.color, button.role_id, link
        ),
        None => format!(
            "✅ Role message posted: {}\nSet a button label and role, then run `/attach-button`.",
            link
        ),
    }
}
