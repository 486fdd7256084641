// Outbound Discord calls used by the publish workflow and the button handler

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::models::button::RoleButton;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Discord did not answer within {0:?}. Please try again.")]
    Timeout(Duration),
    #[error("Discord request failed: {0}")]
    Discord(#[from] ::serenity::Error),
    /// The target was deleted or the bot lost access to it between checking
    /// and writing
    #[error("Discord says the target is gone or hidden from the bot")]
    Missing,
}

/// The subset of Discord the bot talks to.
///
/// Lookups answer `Ok(false)` when the target is gone or hidden from the bot;
/// `Err` is reserved for failures of the call itself.
#[async_trait]
pub trait DiscordGateway: Send + Sync {
    async fn channel_accessible(&self, channel_id: serenity::ChannelId)
        -> Result<bool, GatewayError>;

    /// Post `text`, optionally with the role button attached.
    /// `GatewayError::Missing` when the channel refuses the message.
    async fn send_message(
        &self,
        channel_id: serenity::ChannelId,
        text: &str,
        button: Option<&RoleButton>,
    ) -> Result<serenity::MessageId, GatewayError>;

    async fn message_exists(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    ) -> Result<bool, GatewayError>;

    /// Replace the message's components with the single role button.
    /// `GatewayError::Missing` when the message is gone or off-limits.
    async fn set_message_button(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
        button: &RoleButton,
    ) -> Result<(), GatewayError>;

    async fn role_exists(
        &self,
        guild_id: serenity::GuildId,
        role_id: serenity::RoleId,
    ) -> Result<bool, GatewayError>;

    async fn member_has_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<bool, GatewayError>;

    async fn add_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<(), GatewayError>;

    async fn remove_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<(), GatewayError>;
}

const AUDIT_LOG_REASON: &str = "Role button";

/// `DiscordGateway` over serenity's HTTP client. Every call is bounded by
/// `timeout` so a stalled request turns into an error reply.
pub struct SerenityGateway {
    http: Arc<serenity::Http>,
    timeout: Duration,
}

impl SerenityGateway {
    pub fn new(http: Arc<serenity::Http>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, ::serenity::Error>> + Send,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(GatewayError::from),
            Err(_) => Err(GatewayError::Timeout(self.timeout)),
        }
    }

    /// Like `call`, but 403/404 answers become `None`
    async fn lookup<T>(
        &self,
        request: impl Future<Output = Result<T, ::serenity::Error>> + Send,
    ) -> Result<Option<T>, GatewayError> {
        match self.call(request).await {
            Ok(value) => Ok(Some(value)),
            Err(GatewayError::Discord(e)) if is_missing(&e) => {
                debug!("Discord lookup came back empty: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Like `call`, but 403/404 answers become `GatewayError::Missing`
    async fn write<T>(
        &self,
        request: impl Future<Output = Result<T, ::serenity::Error>> + Send,
    ) -> Result<T, GatewayError> {
        self.lookup(request).await?.ok_or(GatewayError::Missing)
    }
}

/// Deleted targets answer 404; ones the bot can no longer see answer 403.
fn is_missing(err: &::serenity::Error) -> bool {
    match err {
        ::serenity::Error::Http(::serenity::http::HttpError::UnsuccessfulRequest(response)) => {
            matches!(response.status_code.as_u16(), 403 | 404)
        }
        _ => false,
    }
}

#[async_trait]
impl DiscordGateway for SerenityGateway {
    async fn channel_accessible(
        &self,
        channel_id: serenity::ChannelId,
    ) -> Result<bool, GatewayError> {
        let channel = self.lookup(self.http.get_channel(channel_id)).await?;
        Ok(channel.is_some())
    }

    async fn send_message(
        &self,
        channel_id: serenity::ChannelId,
        text: &str,
        button: Option<&RoleButton>,
    ) -> Result<serenity::MessageId, GatewayError> {
        let mut builder = serenity::CreateMessage::new().content(text);
        if let Some(button) = button {
            builder = builder.components(vec![button.action_row()]);
        }

        let message = self
            .write(channel_id.send_message(&self.http, builder))
            .await?;
        Ok(message.id)
    }

    async fn message_exists(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    ) -> Result<bool, GatewayError> {
        let message = self
            .lookup(channel_id.message(&self.http, message_id))
            .await?;
        Ok(message.is_some())
    }

    async fn set_message_button(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
        button: &RoleButton,
    ) -> Result<(), GatewayError> {
        let builder = serenity::EditMessage::new().components(vec![button.action_row()]);
        self.write(channel_id.edit_message(&self.http, message_id, builder))
            .await?;
        Ok(())
    }

    async fn role_exists(
        &self,
        guild_id: serenity::GuildId,
        role_id: serenity::RoleId,
    ) -> Result<bool, GatewayError> {
        let roles = self.call(guild_id.roles(&self.http)).await?;
        Ok(roles.contains_key(&role_id))
    }

    async fn member_has_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<bool, GatewayError> {
        let member = self.call(guild_id.member(&self.http, user_id)).await?;
        Ok(member.roles.contains(&role_id))
    }

    async fn add_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<(), GatewayError> {
        self.call(
            self.http
                .add_member_role(guild_id, user_id, role_id, Some(AUDIT_LOG_REASON)),
        )
        .await
    }

    async fn remove_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
    ) -> Result<(), GatewayError> {
        self.call(
            self.http
                .remove_member_role(guild_id, user_id, role_id, Some(AUDIT_LOG_REASON)),
        )
        .await
    }
}
