// Slash commands
pub mod help;
pub mod publish;
pub mod settings;
pub mod setup;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::models::guild::GuildConfig;
use crate::utils::errors::RoleButtonError;
use crate::{Context, Error};

pub(crate) fn guild_of(ctx: Context<'_>) -> Result<serenity::GuildId, RoleButtonError> {
    ctx.guild_id().ok_or(RoleButtonError::GuildOnly)
}

/// Load-mutate-save the invoking guild's configuration
pub(crate) async fn update_config<F>(
    ctx: Context<'_>,
    what: &str,
    mutate: F,
) -> Result<GuildConfig, RoleButtonError>
where
    F: FnOnce(&mut GuildConfig) -> Result<(), RoleButtonError> + Send,
{
    let guild_id = guild_of(ctx)?;
    let config = ctx.data().store.update(guild_id, mutate).await?;
    info!("Updated {} for guild {} by {}", what, guild_id, ctx.author().id);
    Ok(config)
}

/// Confirmation line plus a hint at what is still left to configure
pub(crate) fn confirm(done: impl AsRef<str>, config: &GuildConfig) -> String {
    let missing = config.missing_fields();
    let next = match missing.first() {
        Some(field) => format!("Next: {}.", field),
        None if config.published_message_id.is_none() => {
            "Everything is set. Run `/publish-message` to post it.".to_string()
        }
        None => "Run `/attach-button` to update the posted button.".to_string(),
    };
    format!("✅ {}\n{}", done.as_ref(), next)
}

/// Answer privately with the confirmation, or with why the command was rejected
pub(crate) async fn reply_private(
    ctx: Context<'_>,
    result: Result<String, RoleButtonError>,
) -> Result<(), Error> {
    let content = match result {
        Ok(message) => message,
        Err(e) => {
            let command = &ctx.command().qualified_name;
            match &e {
                RoleButtonError::Gateway(_) | RoleButtonError::Store(_) => {
                    error!("/{} failed in guild {:?}: {}", command, ctx.guild_id(), e);
                }
                _ => warn!("/{} rejected in guild {:?}: {}", command, ctx.guild_id(), e),
            }
            rejection(&e)
        }
    };

    ctx.send(private(content)).await?;
    Ok(())
}

fn rejection(e: &RoleButtonError) -> String {
    format!("❌ {}", e)
}

/// A reply only the invoking member can see
fn private(content: String) -> poise::CreateReply {
    poise::CreateReply::default().content(content).ephemeral(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_points_at_next_step() {
        let mut config = GuildConfig::default();
        config.set_button_label("Join").unwrap();
        let text = confirm("Button label set.", &config);
        assert!(text.starts_with("✅ Button label set."));
        assert!(text.contains("/set-channel"));

        config.set_channel(serenity::ChannelId::new(1)).unwrap();
        config.set_message_text("Welcome").unwrap();
        config.set_role(serenity::RoleId::new(2)).unwrap();
        assert!(confirm("Done.", &config).contains("/publish-message"));

        config
            .record_published(serenity::ChannelId::new(1), serenity::MessageId::new(3))
            .unwrap();
        assert!(confirm("Done.", &config).contains("/attach-button"));
    }

    #[test]
    fn test_rejections_stay_private() {
        let reply = private(rejection(&RoleButtonError::GuildOnly));
        assert_eq!(reply.ephemeral, Some(true));
        let content = reply.content.unwrap();
        assert!(content.starts_with("❌ "));
        assert!(content.contains(&RoleButtonError::GuildOnly.to_string()));
    }
}
