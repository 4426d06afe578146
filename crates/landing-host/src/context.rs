use std::collections::HashMap;
use std::sync::Arc;

use landing_i18n::Locale;
use parking_lot::Mutex;
use tracing::warn;

use crate::store::PreferenceStore;
use crate::translations::{TranslationSource, Translations};

/// Inputs describing one page load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub query: Option<String>,
    pub browser_locale: String,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, browser_locale: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            browser_locale: browser_locale.into(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoredRead {
    Value(Option<String>),
    Unavailable,
}

/// State scoped to a single page load: the request, the preference as it was
/// read at load time, and the translation catalogs fetched while rendering.
#[derive(Debug)]
pub struct PageContext {
    request: PageRequest,
    stored: StoredRead,
    translations: Mutex<HashMap<Locale, Arc<Translations>>>,
}

impl PageContext {
    /// Read the stored preference once; a failing store marks the context as
    /// running without storage.
    pub fn load(request: PageRequest, store: &dyn PreferenceStore, key: &str) -> Self {
        let stored = match store.get(key) {
            Ok(value) => StoredRead::Value(value),
            Err(err) => {
                warn!(key, error = %err, "preference storage unavailable");
                StoredRead::Unavailable
            }
        };
        Self {
            request,
            stored,
            translations: Mutex::new(HashMap::new()),
        }
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn query(&self) -> Option<&str> {
        self.request.query.as_deref()
    }

    pub fn browser_locale(&self) -> &str {
        &self.request.browser_locale
    }

    pub fn stored_raw(&self) -> Option<&str> {
        match &self.stored {
            StoredRead::Value(value) => value.as_deref(),
            StoredRead::Unavailable => None,
        }
    }

    pub fn storage_available(&self) -> bool {
        self.stored != StoredRead::Unavailable
    }

    /// Catalog for `locale`, loaded at most once per page load.
    pub fn translations(&self, source: &TranslationSource, locale: &Locale) -> Arc<Translations> {
        let mut cache = self.translations.lock();
        Arc::clone(
            cache
                .entry(locale.clone())
                .or_insert_with(|| Arc::new(source.load(locale))),
        )
    }
}
