//! Page-load runtime for the landing sites.
//!
//! `landing-i18n` decides; this crate wires the decision to the outside
//! world: the site configuration, the visitor's preference store, the
//! navigation surface and the per-page translation catalogs.

pub mod browser;
pub mod config;
pub mod context;
pub mod gate;
pub mod navigate;
pub mod store;
pub mod translations;

pub use browser::{browser_locale_with_sources, select_browser_locale};
pub use config::{ConfigError, SiteConfig};
pub use context::{PageContext, PageRequest};
pub use gate::{LocaleGate, PageOutcome};
pub use navigate::{Navigator, RecordingNavigator};
pub use store::{DisabledStore, FileStore, MemoryStore, PreferenceStore, StoreError};
pub use translations::{TranslationError, TranslationSource, Translations};

pub use landing_i18n::{Action, Locale, LocaleRouter, Resolution, SelectError};
