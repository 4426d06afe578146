use std::fs;
use std::path::{Path, PathBuf};

use landing_i18n::{
    DEFAULT_LOCALE, LocaleInfo, LocaleRouter, LocaleTable, LocaleTableError, PREFERENCE_KEY,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BASE_PATH: &str = "LANDING_BASE_PATH";
pub const ENV_BASE_URL: &str = "LANDING_BASE_URL";
pub const ENV_STORAGE_KEY: &str = "LANDING_STORAGE_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read site config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML site config")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON site config")]
    Json(#[from] serde_json::Error),

    #[error("invalid locale table")]
    Table(#[from] LocaleTableError),

    #[error("site config does not define a base_url")]
    MissingBaseUrl,
}

/// Static description of one landing site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Path the site is served under (`/WhereWasI`); empty for the domain root.
    pub base_path: String,
    /// Absolute URL of the root page, used for canonical links and the sitemap.
    pub base_url: Option<String>,
    pub storage_key: String,
    pub default_locale: String,
    /// Directory of `{tag}.json` catalogs, relative to the config file.
    pub translations_dir: Option<PathBuf>,
    /// Replaces the built-in locale table when set.
    pub locales: Option<Vec<LocaleInfo>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            base_url: None,
            storage_key: PREFERENCE_KEY.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            translations_dir: None,
            locales: None,
        }
    }
}

impl SiteConfig {
    /// Load from a `.json` or `.toml` file (anything else is read as TOML).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            _ => Self::from_toml_str(&contents)?,
        };
        if let Some(dir) = config.translations_dir.as_mut()
            && dir.is_relative()
            && let Some(parent) = path.parent()
        {
            *dir = parent.join(&*dir);
        }
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Apply `LANDING_*` environment overrides on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(value) = env_value(ENV_BASE_PATH) {
            self.base_path = value;
        }
        if let Some(value) = env_value(ENV_BASE_URL) {
            self.base_url = Some(value);
        }
        if let Some(value) = env_value(ENV_STORAGE_KEY) {
            self.storage_key = value;
        }
        self
    }

    pub fn locale_table(&self) -> Result<LocaleTable, ConfigError> {
        match &self.locales {
            Some(entries) => Ok(LocaleTable::new(entries.clone(), &self.default_locale)?),
            None if self.default_locale == DEFAULT_LOCALE => Ok(LocaleTable::builtin()),
            None => {
                let entries = LocaleTable::builtin().iter().cloned().collect();
                Ok(LocaleTable::new(entries, &self.default_locale)?)
            }
        }
    }

    pub fn router(&self) -> Result<LocaleRouter, ConfigError> {
        Ok(LocaleRouter::new(self.locale_table()?, &self.base_path))
    }

    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
