use std::fs;
use std::path::{Path, PathBuf};

use landing_i18n::Locale;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read translations {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid translations {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One locale's message catalog: a nested JSON object addressed by dotted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Translations {
    locale: String,
    root: Value,
}

impl Translations {
    pub fn empty(locale: &Locale) -> Self {
        Self {
            locale: locale.to_string(),
            root: Value::Object(Default::default()),
        }
    }

    pub fn from_json_str(locale: &Locale, src: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            locale: locale.to_string(),
            root: serde_json::from_str(src)?,
        })
    }

    /// Locale whose catalog was actually loaded, after any fallback.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.as_object()?.get(part))
    }

    pub fn text<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.lookup(key).and_then(Value::as_str).unwrap_or(fallback)
    }
}

/// Directory of `{tag}.json` catalogs.
#[derive(Debug, Clone)]
pub struct TranslationSource {
    dir: PathBuf,
    default_locale: Locale,
}

impl TranslationSource {
    pub fn new(dir: impl Into<PathBuf>, default_locale: Locale) -> Self {
        Self {
            dir: dir.into(),
            default_locale,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_file(&self, locale: &Locale) -> Result<Translations, TranslationError> {
        let path = self.dir.join(format!("{locale}.json"));
        let raw = fs::read_to_string(&path).map_err(|source| TranslationError::Read {
            path: path.clone(),
            source,
        })?;
        Translations::from_json_str(locale, &raw)
            .map_err(|source| TranslationError::Parse { path, source })
    }

    /// Load a locale's catalog, falling back to the default locale and then to
    /// an empty catalog.
    pub fn load(&self, locale: &Locale) -> Translations {
        match self.load_file(locale) {
            Ok(translations) => {
                debug!(%locale, "loaded translations");
                return translations;
            }
            Err(err) => warn!(%locale, error = %err, "could not load translations"),
        }
        if *locale == self.default_locale {
            return Translations::empty(locale);
        }
        warn!(%locale, fallback = %self.default_locale, "falling back to default translations");
        self.load_file(&self.default_locale).unwrap_or_else(|err| {
            warn!(locale = %self.default_locale, error = %err, "default translations unavailable");
            Translations::empty(&self.default_locale)
        })
    }
}
