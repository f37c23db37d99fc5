//! Layout preferences persisted per installation, and global app settings.

use crate::client::ApiClient;
use crate::error::Result;
use crate::lock;
use crate::transport::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::RwLock;

pub const LAYOUT_ENDPOINT: &str = "/api/layout/1/";
pub const SETTINGS_ENDPOINT: &str = "/api/settings/";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutPreferences {
    #[serde(default)]
    pub primary_colour: Option<String>,
    #[serde(default)]
    pub surface_colour: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        LayoutPreferences {
            primary_colour: Some("emerald".into()),
            surface_colour: None,
            theme: Theme::Light,
        }
    }
}

#[derive(Serialize)]
struct ThemePayload {
    theme: Theme,
}

pub struct LayoutService {
    client: ApiClient,
    prefs: RwLock<LayoutPreferences>,
}

impl LayoutService {
    pub fn new(client: ApiClient) -> Self {
        LayoutService {
            client,
            prefs: RwLock::new(LayoutPreferences::default()),
        }
    }

    pub async fn load(&self) -> Result<LayoutPreferences> {
        let prefs: LayoutPreferences = self.client.get_json(LAYOUT_ENDPOINT, QueryParams::new()).await?;
        *lock::write(&self.prefs) = prefs.clone();
        Ok(prefs)
    }

    pub fn preferences(&self) -> LayoutPreferences {
        lock::read(&self.prefs).clone()
    }

    pub fn is_dark_theme(&self) -> bool {
        lock::read(&self.prefs).theme == Theme::Dark
    }

    /// Switch theme locally, then persist it. A failed sync is logged and returned; the local choice stays.
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        lock::write(&self.prefs).theme = theme;
        self.client
            .put_json(LAYOUT_ENDPOINT, &ThemePayload { theme })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "layout sync failed"))?;
        Ok(())
    }

    pub async fn toggle_dark_mode(&self) -> Result<Theme> {
        let next = lock::read(&self.prefs).theme.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}

/// Server-side settings exposed to the front end, kept as raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSettings(pub Map<String, Value>);

impl AppSettings {
    pub async fn fetch(client: &ApiClient) -> Result<Self> {
        client.get_json(SETTINGS_ENDPOINT, QueryParams::new()).await
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
