use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::{SlotStore, SETTINGS_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: String,
    pub theme: String,
    /// Minimum classifier confidence for a detection to count.
    pub sensitivity: f64,
    pub auto_save: bool,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "en".into(),
            theme: "dark".into(),
            sensitivity: 0.5,
            auto_save: true,
            notifications: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub language: Option<String>,
    pub theme: Option<String>,
    pub sensitivity: Option<f64>,
    pub auto_save: Option<bool>,
    pub notifications: Option<bool>,
}

/// Settings kept in their own slot, shallow-merged over the defaults on
/// every read so older or partial objects still load.
#[derive(Clone)]
pub struct SettingsStore {
    slots: Arc<dyn SlotStore>,
}

impl SettingsStore {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self { slots }
    }

    pub async fn get(&self) -> Settings {
        match self.load().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Falling back to default settings: {err:#}");
                Settings::default()
            }
        }
    }

    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut settings = self.get().await;
        if let Some(language) = patch.language {
            settings.language = language;
        }
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
        if let Some(sensitivity) = patch.sensitivity {
            settings.sensitivity = sensitivity.clamp(0.0, 1.0);
        }
        if let Some(auto_save) = patch.auto_save {
            settings.auto_save = auto_save;
        }
        if let Some(notifications) = patch.notifications {
            settings.notifications = notifications;
        }

        self.persist(&settings).await?;
        Ok(settings)
    }

    async fn load(&self) -> Result<Settings> {
        let Some(raw) = self.slots.get(SETTINGS_KEY).await? else {
            return Ok(Settings::default());
        };

        let stored: Map<String, Value> =
            serde_json::from_str(&raw).context("stored settings are not a JSON object")?;
        let mut merged = match serde_json::to_value(Settings::default())? {
            Value::Object(defaults) => defaults,
            _ => Map::new(),
        };
        merged.extend(stored);

        serde_json::from_value(Value::Object(merged)).context("stored settings have invalid fields")
    }

    async fn persist(&self, settings: &Settings) -> Result<()> {
        let serialized = serde_json::to_string(settings)?;
        self.slots
            .set(SETTINGS_KEY, serialized)
            .await
            .context("Failed to write settings")
    }
}
