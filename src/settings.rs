use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const APP_SENTINEL: &str = "hnfeed";

/// Contents of `settings.toml`. Every field is optional; command-line flags
/// win over anything set here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            theme: None,
            api_base: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        if settings.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                settings.app
            );
        }
        Ok(settings)
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("hnfeed")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}
