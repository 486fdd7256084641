// Centralized configuration for the role button bot

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::button::RolePolicy;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
pub const DEFAULT_DISCORD_TIMEOUT_SECS: u64 = 10;

/// Problems with the process environment. Fatal: the bot must not connect.
#[derive(Debug, thiserror::Error)]
pub enum StartupConfigError {
    #[error("DISCORD_TOKEN must be set")]
    MissingToken,
    #[error("{key} has an invalid value `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings read from the environment (and `.env`) at startup
pub struct BotConfig {
    pub token: String,
    /// JSON file holding every guild's configuration
    pub settings_path: PathBuf,
    pub policy: RolePolicy,
    /// Upper bound for each outbound Discord call
    pub discord_timeout: Duration,
}

// Keeps the token out of logs
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("settings_path", &self.settings_path)
            .field("policy", &self.policy)
            .field("discord_timeout", &self.discord_timeout)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, StartupConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupConfigError> {
        let token = lookup("DISCORD_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(StartupConfigError::MissingToken)?;

        let settings_path = lookup("SETTINGS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        let policy = match lookup("ROLE_BUTTON_POLICY") {
            Some(raw) => raw
                .parse::<RolePolicy>()
                .map_err(|value| StartupConfigError::InvalidValue {
                    key: "ROLE_BUTTON_POLICY",
                    value,
                })?,
            None => RolePolicy::default(),
        };

        let timeout_secs = match lookup("DISCORD_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(StartupConfigError::InvalidValue {
                    key: "DISCORD_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_DISCORD_TIMEOUT_SECS,
        };

        Ok(Self {
            token,
            settings_path,
            policy,
            discord_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Discord embed colors
pub mod colors {
    pub const PRIMARY: u32 = 0x00bfff;
    pub const SUCCESS: u32 = 0x2ecc71;
    pub const WARNING: u32 = 0xffa500;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<BotConfig, StartupConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_token() {
        assert!(matches!(config_from(&[]), Err(StartupConfigError::MissingToken)));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "   ")]),
            Err(StartupConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.settings_path, PathBuf::from("settings.json"));
        assert_eq!(config.policy, RolePolicy::Toggle);
        assert_eq!(config.discord_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("SETTINGS_PATH", "/data/roles.json"),
            ("ROLE_BUTTON_POLICY", "grant_only"),
            ("DISCORD_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.settings_path, PathBuf::from("/data/roles.json"));
        assert_eq!(config.policy, RolePolicy::GrantOnly);
        assert_eq!(config.discord_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[("DISCORD_TOKEN", "abc"), ("ROLE_BUTTON_POLICY", "maybe")])
            .unwrap_err();
        assert!(matches!(
            err,
            StartupConfigError::InvalidValue { key: "ROLE_BUTTON_POLICY", .. }
        ));

        let err = config_from(&[("DISCORD_TOKEN", "abc"), ("DISCORD_TIMEOUT_SECS", "0")])
            .unwrap_err();
        assert!(matches!(
            err,
            StartupConfigError::InvalidValue { key: "DISCORD_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = config_from(&[("DISCORD_TOKEN", "super-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
