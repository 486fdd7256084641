use std::fmt;
use std::str::FromStr;

use poise::serenity_prelude as serenity;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::errors::RoleButtonError;

/// Custom id prefix of every button this bot publishes
pub const CUSTOM_ID_PREFIX: &str = "role_button";

/// Custom id used by buttons published before role ids were embedded
const LEGACY_CUSTOM_ID: &str = "auth_button";

/// Button colors Discord allows on a non-link button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
}

impl ButtonColor {
    pub const ALL: [ButtonColor; 4] = [
        ButtonColor::Primary,
        ButtonColor::Secondary,
        ButtonColor::Success,
        ButtonColor::Danger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ButtonColor::Primary => "primary",
            ButtonColor::Secondary => "secondary",
            ButtonColor::Success => "success",
            ButtonColor::Danger => "danger",
        }
    }

    pub fn style(self) -> serenity::ButtonStyle {
        match self {
            ButtonColor::Primary => serenity::ButtonStyle::Primary,
            ButtonColor::Secondary => serenity::ButtonStyle::Secondary,
            ButtonColor::Success => serenity::ButtonStyle::Success,
            ButtonColor::Danger => serenity::ButtonStyle::Danger,
        }
    }
}

impl fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ButtonColor {
    type Err = RoleButtonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.name() == wanted)
            .ok_or_else(|| {
                RoleButtonError::Validation(format!(
                    "`{}` is not a button color. Use one of: primary, secondary, success, danger.",
                    s.trim()
                ))
            })
    }
}

// Anything in the settings file that isn't a known color name (other strings,
// numbers, objects) falls back to the default instead of failing the whole load.
impl<'de> Deserialize<'de> for ButtonColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default())
    }
}

/// How a click on the role button changes the member's roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolePolicy {
    /// Add the role when missing, remove it when held
    #[default]
    Toggle,
    /// Only ever add the role
    GrantOnly,
}

impl FromStr for RolePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "toggle" => Ok(RolePolicy::Toggle),
            "grant_only" | "grant" => Ok(RolePolicy::GrantOnly),
            other => Err(other.to_string()),
        }
    }
}

/// The button attached to the published message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleButton {
    pub label: String,
    pub color: ButtonColor,
    pub role_id: serenity::RoleId,
}

impl RoleButton {
    pub fn custom_id(&self) -> String {
        format!("{}:{}", CUSTOM_ID_PREFIX, self.role_id)
    }

    /// A single action row holding only this button. Sending it as the
    /// message's whole component list replaces any button attached earlier.
    pub fn action_row(&self) -> serenity::CreateActionRow {
        serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(self.custom_id())
            .label(self.label.clone())
            .style(self.color.style())])
    }
}

/// Whether a component custom id belongs to a role button
pub fn is_role_button(custom_id: &str) -> bool {
    if custom_id == CUSTOM_ID_PREFIX || custom_id == LEGACY_CUSTOM_ID {
        return true;
    }

    custom_id
        .strip_prefix(CUSTOM_ID_PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .is_some_and(|id| id.parse::<u64>().is_ok_and(|id| id != 0))
}
