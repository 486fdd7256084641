// Flat-file settings store
// One JSON document maps guild id -> GuildConfig and is rewritten whole on every change

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::guild::GuildConfig;
use crate::utils::errors::RoleButtonError;

/// Guild id (as string) -> configuration. Ordered so the file is stable.
pub type GuildSettings = BTreeMap<String, GuildConfig>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("could not encode settings: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Owns every guild's configuration and the file backing it
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    guilds: Mutex<GuildSettings>,
}

impl SettingsStore {
    /// Read the whole mapping. A missing or blank file is an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let guilds = read_settings(&path).await?;
        debug!("Loaded settings for {} guild(s) from {}", guilds.len(), path.display());

        Ok(Self {
            path,
            guilds: Mutex::new(guilds),
        })
    }

    /// Startup entry point: like `load`, but an unreadable file degrades to
    /// an empty store instead of stopping the bot.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()).await {
            Ok(store) => {
                info!("Settings store ready at {}", path.display());
                store
            }
            Err(e) => {
                warn!(
                    "Ignoring settings file {}: {}. Starting with empty settings.",
                    path.display(),
                    e
                );
                Self {
                    path,
                    guilds: Mutex::new(GuildSettings::new()),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, guild_id: serenity::GuildId) -> Option<GuildConfig> {
        self.guilds.lock().await.get(&guild_id.to_string()).cloned()
    }

    /// Copy of the whole mapping
    #[allow(dead_code)]
    pub async fn snapshot(&self) -> GuildSettings {
        self.guilds.lock().await.clone()
    }

    /// Write the current mapping to disk
    #[allow(dead_code)]
    pub async fn save(&self) -> Result<(), StoreError> {
        let guilds = self.guilds.lock().await;
        write_settings(&self.path, &guilds).await
    }

    /// Load-mutate-save for one guild, creating its config on first use.
    ///
    /// The lock is held across the write so two guilds updating at once can't
    /// lose each other's changes. If `mutate` fails nothing changes; if the
    /// write fails the in-memory entry is rolled back.
    pub async fn update<F>(
        &self,
        guild_id: serenity::GuildId,
        mutate: F,
    ) -> Result<GuildConfig, RoleButtonError>
    where
        F: FnOnce(&mut GuildConfig) -> Result<(), RoleButtonError>,
    {
        let key = guild_id.to_string();
        let mut guilds = self.guilds.lock().await;

        let previous = guilds.get(&key).cloned();
        let mut config = previous.clone().unwrap_or_default();
        mutate(&mut config)?;

        guilds.insert(key.clone(), config.clone());
        if let Err(e) = write_settings(&self.path, &guilds).await {
            match previous {
                Some(previous) => guilds.insert(key, previous),
                None => guilds.remove(&key),
            };
            return Err(e.into());
        }

        Ok(config)
    }
}

async fn read_settings(path: &Path) -> Result<GuildSettings, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GuildSettings::new()),
        Err(e) => return Err(e.into()),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(GuildSettings::new());
    }

    serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)
}

async fn write_settings(path: &Path, guilds: &GuildSettings) -> Result<(), StoreError> {
    let mut json = serde_json::to_vec_pretty(guilds).map_err(StoreError::Encode)?;
    json.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(id: u64) -> serenity::GuildId {
        serenity::GuildId::new(id)
    }

    fn temp_path() -> (PathBuf, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (dir.path().join("settings.json"), dir)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (path, _dir) = temp_path();
        let store = SettingsStore::load(&path).await.unwrap();
        assert!(store.snapshot().await.is_empty());
        assert!(store.get(guild(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let (path, _dir) = temp_path();
        tokio::fs::write(&path, b"{ this is not json").await.unwrap();

        let err = SettingsStore::load(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));

        // Startup path degrades instead of failing
        let store = SettingsStore::open(&path).await;
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_odd_color_value_keeps_other_guilds() {
        let (path, _dir) = temp_path();
        tokio::fs::write(
            &path,
            br#"{
  "1": {"channel_id": "10", "message_text": "Welcome", "role_id": "500"},
  "2": {"button_color": 7}
}"#,
        )
        .await
        .unwrap();

        let store = SettingsStore::load(&path).await.unwrap();
        let one = store.get(guild(1)).await.unwrap();
        assert_eq!(one.channel_id, Some(serenity::ChannelId::new(10)));
        assert_eq!(one.role_id, Some(serenity::RoleId::new(500)));
        let two = store.get(guild(2)).await.unwrap();
        assert_eq!(two.color(), crate::models::button::ButtonColor::Primary);

        store.update(guild(3), |c| c.set_button_label("Join")).await.unwrap();
        let reloaded = SettingsStore::load(&path).await.unwrap();
        assert_eq!(reloaded.get(guild(1)).await.unwrap(), one);
        assert!(reloaded.get(guild(3)).await.is_some());
    }

    #[tokio::test]
    async fn test_update_persists_whole_mapping() {
        let (path, _dir) = temp_path();
        let store = SettingsStore::load(&path).await.unwrap();

        store
            .update(guild(1), |c| c.set_message_text("Welcome"))
            .await
            .unwrap();
        store
            .update(guild(2), |c| c.set_button_label("Join"))
            .await
            .unwrap();

        let reloaded = SettingsStore::load(&path).await.unwrap();
        let one = reloaded.get(guild(1)).await.unwrap();
        let two = reloaded.get(guild(2)).await.unwrap();
        assert_eq!(one.message_text.as_deref(), Some("Welcome"));
        assert_eq!(one.button_label, None);
        assert_eq!(two.button_label.as_deref(), Some("Join"));
        assert_eq!(two.message_text, None);
    }

    #[tokio::test]
    async fn test_guilds_are_isolated() {
        let (path, _dir) = temp_path();
        let store = SettingsStore::load(&path).await.unwrap();

        store
            .update(guild(2), |c| {
                c.set_channel(serenity::ChannelId::new(20))?;
                c.set_button_color("success")
            })
            .await
            .unwrap();
        let before = store.get(guild(2)).await.unwrap();

        store
            .update(guild(1), |c| {
                c.set_channel(serenity::ChannelId::new(10))?;
                c.set_button_color("danger")?;
                c.set_role(serenity::RoleId::new(5))
            })
            .await
            .unwrap();

        assert_eq!(store.get(guild(2)).await.unwrap(), before);
        let reloaded = SettingsStore::load(&path).await.unwrap();
        assert_eq!(reloaded.get(guild(2)).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_rejected_mutation_changes_nothing() {
        let (path, _dir) = temp_path();
        let store = SettingsStore::load(&path).await.unwrap();
        store
            .update(guild(1), |c| c.set_button_color("secondary"))
            .await
            .unwrap();
        let bytes_before = tokio::fs::read(&path).await.unwrap();

        let result = store
            .update(guild(1), |c| c.set_button_color("rainbow"))
            .await;
        assert!(matches!(result, Err(RoleButtonError::Validation(_))));

        let config = store.get(guild(1)).await.unwrap();
        assert_eq!(config.button_color, Some(crate::models::button::ButtonColor::Secondary));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), bytes_before);

        // A first command that fails must not create an entry
        let result = store.update(guild(9), |c| c.set_button_label("")).await;
        assert!(result.is_err());
        assert!(store.get(guild(9)).await.is_none());
    }

    #[tokio::test]
    async fn test_save_after_load_keeps_bytes() {
        let (path, _dir) = temp_path();
        let store = SettingsStore::load(&path).await.unwrap();
        store
            .update(guild(3), |c| {
                c.set_channel(serenity::ChannelId::new(30))?;
                c.set_message_text("Pick a role")?;
                c.set_button_label("Join")?;
                c.set_role(serenity::RoleId::new(300))
            })
            .await
            .unwrap();
        store.update(guild(1), |c| c.set_button_color("danger")).await.unwrap();
        let written = tokio::fs::read(&path).await.unwrap();

        let reloaded = SettingsStore::load(&path).await.unwrap();
        reloaded.save().await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), written);
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("settings.json");
        let store = SettingsStore::load(&path).await.unwrap();
        store.update(guild(1), |c| c.set_button_label("Join")).await.unwrap();
        assert!(path.exists());
    }
}
