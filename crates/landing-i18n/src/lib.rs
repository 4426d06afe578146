//! Locale resolution for the product landing sites.
//!
//! Every page load asks one question: is the visitor looking at the right
//! locale's page? [`LocaleRouter::resolve`] answers it from the page path, the
//! stored preference and the browser language, and says what to persist. The
//! free functions below use the built-in table served from the domain root.

mod detect;
mod error;
mod resolve;
mod site;
mod table;

use once_cell::sync::Lazy;

pub use detect::{current_locale_in, detect_locale_in, normalize_locale};
pub use error::{LocaleTableError, SelectError, SiteError};
pub use resolve::{Action, LocaleRouter, Resolution};
pub use site::{Alternate, SelectorOption};
pub use table::{DEFAULT_LOCALE, Locale, LocaleInfo, LocaleTable};

/// Storage key the resolved locale is persisted under.
pub const PREFERENCE_KEY: &str = "preferred-locale";

static BUILTIN_ROUTER: Lazy<LocaleRouter> = Lazy::new(LocaleRouter::default);

pub fn current_locale(path: &str) -> Locale {
    BUILTIN_ROUTER.current_locale(path)
}

pub fn detect_locale(browser_locale: &str) -> Locale {
    BUILTIN_ROUTER.detect_locale(browser_locale)
}

pub fn redirect_target(locale: &Locale) -> String {
    BUILTIN_ROUTER.redirect_target(locale)
}

/// Resolve against the built-in table; `stored` is the raw persisted value.
pub fn resolve(path: &str, stored: Option<&str>, browser_locale: &str) -> Resolution {
    let router = &*BUILTIN_ROUTER;
    let stored = router.stored_preference(stored);
    router.resolve(path, stored.as_ref(), browser_locale)
}
