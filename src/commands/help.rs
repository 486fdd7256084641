// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::models::button::RolePolicy;
use crate::utils::config::colors;

/// Show how to set up the role button
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let clicking = match ctx.data().policy {
        RolePolicy::Toggle => "Clicking the button gives you the role, clicking again takes it away.",
        RolePolicy::GrantOnly => "Clicking the button gives you the role.",
    };

    let embed = serenity::CreateEmbed::new()
        .title("🔘 Role Button - Help")
        .description("Post a message with a button that gives members a role")
        .color(colors::PRIMARY)
        .field(
            "⚙️ Setup",
            "`/set-channel` - Channel for the role message\n\
            `/set-message-text` - Text of the message\n\
            `/set-button-label` - Text on the button\n\
            `/set-button-color` - primary, secondary, success or danger\n\
            `/set-button-role` - Role the button hands out",
            false,
        )
        .field(
            "📤 Publishing",
            "`/publish-message` - Post the message (with the button if it is ready)\n\
            `/attach-button` - Add or update the button on the posted message",
            false,
        )
        .field(
            "🔍 Status",
            "`/show-settings` - View the current configuration",
            false,
        )
        .field(
            "👆 Clicking",
            clicking,
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Setup commands need the Manage Server permission",
        ));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}
