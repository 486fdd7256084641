use std::fmt;

use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};

use crate::models::button::{ButtonColor, RoleButton};
use crate::utils::errors::RoleButtonError;

/// Discord rejects button labels longer than this
pub const MAX_LABEL_LEN: usize = 80;
/// Discord rejects message content longer than this
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Guild (Server) specific role button configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GuildConfig {
    /// Channel the role message is posted in
    pub channel_id: Option<serenity::ChannelId>,
    /// Body of the role message
    pub message_text: Option<String>,
    pub button_label: Option<String>,
    /// Unset means primary
    pub button_color: Option<ButtonColor>,
    /// Role handed out by the button
    pub role_id: Option<serenity::RoleId>,
    /// Message in `channel_id` carrying the button
    pub published_message_id: Option<serenity::MessageId>,
}

/// A configuration field a publish step can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Channel,
    MessageText,
    ButtonLabel,
    ButtonRole,
    PublishedMessage,
}

impl ConfigField {
    /// Command that fills the field in
    pub fn command(self) -> &'static str {
        match self {
            ConfigField::Channel => "/set-channel",
            ConfigField::MessageText => "/set-message-text",
            ConfigField::ButtonLabel => "/set-button-label",
            ConfigField::ButtonRole => "/set-button-role",
            ConfigField::PublishedMessage => "/publish-message",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigField::Channel => "channel",
            ConfigField::MessageText => "message text",
            ConfigField::ButtonLabel => "button label",
            ConfigField::ButtonRole => "button role",
            ConfigField::PublishedMessage => "published message",
        };
        write!(f, "{} (use `{}`)", name, self.command())
    }
}

impl GuildConfig {
    /// Moving to another channel forgets the message published in the old one.
    pub fn set_channel(&mut self, channel_id: serenity::ChannelId) -> Result<(), RoleButtonError> {
        if self.channel_id != Some(channel_id) {
            self.published_message_id = None;
        }
        self.channel_id = Some(channel_id);
        Ok(())
    }

    pub fn set_message_text(&mut self, text: &str) -> Result<(), RoleButtonError> {
        self.message_text = Some(checked_text("Message text", text, MAX_MESSAGE_LEN)?);
        Ok(())
    }

    pub fn set_button_label(&mut self, label: &str) -> Result<(), RoleButtonError> {
        self.button_label = Some(checked_text("Button label", label, MAX_LABEL_LEN)?);
        Ok(())
    }

    pub fn set_button_color(&mut self, color: &str) -> Result<(), RoleButtonError> {
        self.button_color = Some(color.parse()?);
        Ok(())
    }

    pub fn set_role(&mut self, role_id: serenity::RoleId) -> Result<(), RoleButtonError> {
        self.role_id = Some(role_id);
        Ok(())
    }

    /// Record the message now carrying the role message or button. It must
    /// live in the configured channel.
    pub fn record_published(
        &mut self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    ) -> Result<(), RoleButtonError> {
        if self.channel_id != Some(channel_id) {
            return Err(RoleButtonError::Validation(
                "The channel changed while publishing. Run the command again.".to_string(),
            ));
        }
        self.published_message_id = Some(message_id);
        Ok(())
    }

    pub fn color(&self) -> ButtonColor {
        self.button_color.unwrap_or_default()
    }

    /// The button as currently configured. Needs a label and a role.
    pub fn role_button(&self) -> Result<RoleButton, RoleButtonError> {
        let label = self
            .button_label
            .clone()
            .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::ButtonLabel))?;
        let role_id = self
            .role_id
            .ok_or(RoleButtonError::ConfigIncomplete(ConfigField::ButtonRole))?;

        Ok(RoleButton {
            label,
            color: self.color(),
            role_id,
        })
    }

    /// Fields still needed before a message with a button can go out
    pub fn missing_fields(&self) -> Vec<ConfigField> {
        let mut missing = Vec::new();
        if self.channel_id.is_none() {
            missing.push(ConfigField::Channel);
        }
        if self.message_text.is_none() {
            missing.push(ConfigField::MessageText);
        }
        if self.button_label.is_none() {
            missing.push(ConfigField::ButtonLabel);
        }
        if self.role_id.is_none() {
            missing.push(ConfigField::ButtonRole);
        }
        missing
    }
}

fn checked_text(what: &str, raw: &str, max_len: usize) -> Result<String, RoleButtonError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(RoleButtonError::Validation(format!("{} cannot be empty.", what)));
    }

    let len = text.chars().count();
    if len > max_len {
        return Err(RoleButtonError::Validation(format!(
            "{} is {} characters long; the limit is {}.",
            what, len, max_len
        )));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u64) -> serenity::ChannelId {
        serenity::ChannelId::new(id)
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut config = GuildConfig::default();
        assert!(config.set_button_color("purple").is_err());
        assert_eq!(config.button_color, None);
        assert_eq!(config.color(), ButtonColor::Primary);

        config.set_button_color("danger").unwrap();
        let err = config.set_button_color("mauve").unwrap_err();
        assert!(matches!(err, RoleButtonError::Validation(_)));
        assert_eq!(config.color(), ButtonColor::Danger);
    }

    #[test]
    fn test_text_limits() {
        let mut config = GuildConfig::default();
        assert!(config.set_button_label("   ").is_err());
        assert!(config.set_button_label(&"x".repeat(MAX_LABEL_LEN + 1)).is_err());
        assert_eq!(config.button_label, None);

        config.set_button_label("  Join  ").unwrap();
        assert_eq!(config.button_label.as_deref(), Some("Join"));

        // Limits count characters, not bytes
        config.set_button_label(&"ä".repeat(MAX_LABEL_LEN)).unwrap();

        assert!(config.set_message_text(&"a".repeat(MAX_MESSAGE_LEN + 1)).is_err());
        config.set_message_text("Welcome").unwrap();
        assert_eq!(config.message_text.as_deref(), Some("Welcome"));
    }

    #[test]
    fn test_channel_change_clears_published_message() {
        let mut config = GuildConfig::default();
        config.set_channel(channel(10)).unwrap();
        config
            .record_published(channel(10), serenity::MessageId::new(99))
            .unwrap();

        // Same channel again keeps the message
        config.set_channel(channel(10)).unwrap();
        assert_eq!(config.published_message_id, Some(serenity::MessageId::new(99)));

        config.set_channel(channel(11)).unwrap();
        assert_eq!(config.published_message_id, None);
    }

    #[test]
    fn test_record_published_requires_configured_channel() {
        let mut config = GuildConfig::default();
        config.set_channel(channel(10)).unwrap();
        assert!(config
            .record_published(channel(11), serenity::MessageId::new(5))
            .is_err());
        assert_eq!(config.published_message_id, None);
    }

    #[test]
    fn test_role_button_names_missing_field() {
        let mut config = GuildConfig::default();
        assert!(matches!(
            config.role_button(),
            Err(RoleButtonError::ConfigIncomplete(ConfigField::ButtonLabel))
        ));

        config.set_button_label("Join").unwrap();
        assert!(matches!(
            config.role_button(),
            Err(RoleButtonError::ConfigIncomplete(ConfigField::ButtonRole))
        ));

        config.set_role(serenity::RoleId::new(7)).unwrap();
        let button = config.role_button().unwrap();
        assert_eq!(button.label, "Join");
        assert_eq!(button.color, ButtonColor::Primary);
        assert_eq!(button.role_id, serenity::RoleId::new(7));
    }

    #[test]
    fn test_missing_fields() {
        let mut config = GuildConfig::default();
        assert_eq!(config.missing_fields().len(), 4);

        config.set_channel(channel(1)).unwrap();
        config.set_message_text("Welcome").unwrap();
        assert_eq!(
            config.missing_fields(),
            vec![ConfigField::ButtonLabel, ConfigField::ButtonRole]
        );
    }

    #[test]
    fn test_deserialize_partial_record() {
        let config: GuildConfig =
            serde_json::from_str(r#"{"channel_id": "123", "button_color": "success"}"#).unwrap();
        assert_eq!(config.channel_id, Some(channel(123)));
        assert_eq!(config.color(), ButtonColor::Success);
        assert_eq!(config.role_id, None);
    }
}
