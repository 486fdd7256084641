use poise::serenity_prelude as serenity;

use super::{guild_of, reply_private};
use crate::models::guild::GuildConfig;
use crate::utils::config::colors;
use crate::utils::formatters::{message_link, truncate};
use crate::{Context, Error};

/// Show this server's role button configuration
#[poise::command(
    slash_command,
    rename = "show-settings",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn show_settings(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = match guild_of(ctx) {
        Ok(id) => id,
        Err(e) => return reply_private(ctx, Err(e)).await,
    };

    let config = ctx.data().store.get(guild_id).await.unwrap_or_default();
    let embed = settings_embed(guild_id, &config);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

fn not_set() -> String {
    "Not set".to_string()
}

fn settings_embed(guild_id: serenity::GuildId, config: &GuildConfig) -> serenity::CreateEmbed {
    let channel = config
        .channel_id
        .map(|id| format!("<#{}>", id))
        .unwrap_or_else(not_set);
    let text = config
        .message_text
        .as_deref()
        .map(|t| truncate(t, 1000))
        .unwrap_or_else(not_set);
    let label = config.button_label.clone().unwrap_or_else(not_set);
    let color = match config.button_color {
        Some(color) => color.to_string(),
        None => format!("{} (default)", config.color()),
    };
    let role = config
        .role_id
        .map(|id| format!("<@&{}>", id))
        .unwrap_or_else(not_set);
    let published = match (config.channel_id, config.published_message_id) {
        (Some(channel_id), Some(message_id)) => message_link(guild_id, channel_id, message_id),
        _ => "Not published".to_string(),
    };

    let missing = config.missing_fields();
    let (status, color_code) = if missing.is_empty() {
        ("Ready to publish".to_string(), colors::SUCCESS)
    } else {
        let list: Vec<String> = missing.iter().map(|f| format!("• {}", f)).collect();
        (format!("Missing:\n{}", list.join("\n")), colors::WARNING)
    };

    serenity::CreateEmbed::new()
        .title("Role Button Settings")
        .field("Channel", channel, true)
        .field("Button Label", label, true)
        .field("Button Color", color, true)
        .field("Role", role, true)
        .field("Published Message", published, false)
        .field("Message Text", text, false)
        .field("Status", status, false)
        .color(color_code)
}
