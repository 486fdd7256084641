// Role button handler - toggles the configured role for whoever clicks the button

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::api::discord::DiscordGateway;
use crate::api::settings_store::SettingsStore;
use crate::models::button::{is_role_button, RolePolicy};
use crate::utils::errors::RoleButtonError;
use crate::{Data, Error};

/// What a click did to the member's roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Granted(serenity::RoleId),
    Removed(serenity::RoleId),
    /// Grant-only policy and the member already had the role
    AlreadyHeld(serenity::RoleId),
}

impl ClickOutcome {
    pub fn message(&self) -> String {
        match self {
            ClickOutcome::Granted(role) => format!("✅ You now have the <@&{}> role.", role),
            ClickOutcome::Removed(role) => format!("➖ The <@&{}> role was removed.", role),
            ClickOutcome::AlreadyHeld(role) => format!("You already have the <@&{}> role.", role),
        }
    }
}

/// Apply one click by `user_id` in `guild_id`.
///
/// The role comes from the guild's stored configuration, never from the
/// button itself, so buttons keep working across restarts and role changes.
pub async fn handle_click<G>(
    gateway: &G,
    store: &SettingsStore,
    policy: RolePolicy,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> Result<ClickOutcome, RoleButtonError>
where
    G: DiscordGateway + ?Sized,
{
    let role_id = store
        .get(guild_id)
        .await
        .and_then(|config| config.role_id)
        .ok_or(RoleButtonError::RoleNotConfigured)?;

    if !gateway.role_exists(guild_id, role_id).await? {
        return Err(RoleButtonError::RoleNotFound(role_id));
    }

    let has_role = gateway.member_has_role(guild_id, user_id, role_id).await?;
    let outcome = match (has_role, policy) {
        (false, _) => {
            gateway.add_role(guild_id, user_id, role_id).await?;
            ClickOutcome::Granted(role_id)
        }
        (true, RolePolicy::Toggle) => {
            gateway.remove_role(guild_id, user_id, role_id).await?;
            ClickOutcome::Removed(role_id)
        }
        (true, RolePolicy::GrantOnly) => ClickOutcome::AlreadyHeld(role_id),
    };

    info!(
        "Role button in guild {} for user {}: {:?}",
        guild_id, user_id, outcome
    );
    Ok(outcome)
}

/// Handle a component interaction if it came from a role button
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    if !is_role_button(&interaction.data.custom_id) {
        return Ok(());
    }

    // Role lookups can outlast the initial response window
    interaction.defer_ephemeral(ctx).await?;

    let result = match interaction.guild_id {
        Some(guild_id) => {
            handle_click(
                &data.gateway,
                &data.store,
                data.policy,
                guild_id,
                interaction.user.id,
            )
            .await
        }
        None => Err(RoleButtonError::GuildOnly),
    };

    let content = match result {
        Ok(outcome) => outcome.message(),
        Err(e) => {
            match &e {
                RoleButtonError::Gateway(_) | RoleButtonError::Store(_) => {
                    error!("Role button failed for user {}: {}", interaction.user.id, e);
                }
                _ => warn!("Role button rejected for user {}: {}", interaction.user.id, e),
            }
            format!("❌ {}", e)
        }
    };

    interaction
        .edit_response(ctx, serenity::EditInteractionResponse::new().content(content))
        .await?;

    Ok(())
}
