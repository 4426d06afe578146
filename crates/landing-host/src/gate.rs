use landing_i18n::{Action, Locale, LocaleRouter, Resolution, SelectError};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SiteConfig};
use crate::context::{PageContext, PageRequest};
use crate::navigate::Navigator;
use crate::store::PreferenceStore;

/// What a page load ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub resolution: Resolution,
    /// The preference store accepted the write requested by the resolution.
    pub persisted: bool,
    pub navigated: bool,
    /// Storage failed during this load and the gate fell back.
    pub degraded: bool,
}

/// Runs locale resolution for a page load and applies its side effects.
#[derive(Debug, Clone)]
pub struct LocaleGate {
    router: LocaleRouter,
    storage_key: String,
}

impl LocaleGate {
    pub fn new(router: LocaleRouter, storage_key: impl Into<String>) -> Self {
        Self {
            router,
            storage_key: storage_key.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.router()?, config.storage_key.clone()))
    }

    pub fn router(&self) -> &LocaleRouter {
        &self.router
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Start a page load, reading the stored preference.
    pub fn open(&self, request: PageRequest, store: &dyn PreferenceStore) -> PageContext {
        PageContext::load(request, store, &self.storage_key)
    }

    pub fn on_page_load(
        &self,
        ctx: &PageContext,
        store: &dyn PreferenceStore,
        navigator: &dyn Navigator,
    ) -> PageOutcome {
        if !ctx.storage_available() {
            let locale = self.router.current_locale(ctx.path());
            warn!(path = ctx.path(), %locale, "staying on current locale without storage");
            return PageOutcome {
                resolution: Resolution {
                    locale,
                    action: Action::Stay,
                    persist: None,
                },
                persisted: false,
                navigated: false,
                degraded: true,
            };
        }

        let stored = self.router.stored_preference(ctx.stored_raw());
        let resolution = self.router.resolve_request(
            ctx.path(),
            ctx.query(),
            stored.as_ref(),
            ctx.browser_locale(),
        );
        debug!(
            path = ctx.path(),
            stored = ?stored.as_ref().map(Locale::as_str),
            browser_locale = ctx.browser_locale(),
            locale = %resolution.locale,
            action = resolution.action.kind(),
            "resolved page locale"
        );
        self.apply(resolution, store, navigator)
    }

    /// Apply a choice made from the language selector. Unsupported tags leave
    /// the store and the page untouched.
    pub fn switch_to(
        &self,
        tag: &str,
        store: &dyn PreferenceStore,
        navigator: &dyn Navigator,
    ) -> Result<PageOutcome, SelectError> {
        let resolution = self.router.select(tag).inspect_err(|err| {
            warn!(tag, error = %err, "ignoring language selection");
        })?;
        Ok(self.apply(resolution, store, navigator))
    }

    fn apply(
        &self,
        resolution: Resolution,
        store: &dyn PreferenceStore,
        navigator: &dyn Navigator,
    ) -> PageOutcome {
        let mut degraded = false;
        let persisted = match &resolution.persist {
            Some(locale) => match store.set(&self.storage_key, locale.as_str()) {
                Ok(()) => {
                    info!(key = %self.storage_key, %locale, "persisted locale preference");
                    true
                }
                Err(err) => {
                    warn!(key = %self.storage_key, %locale, error = %err, "failed to persist locale preference");
                    degraded = true;
                    false
                }
            },
            None => false,
        };
        let navigated = match resolution.action.target() {
            Some(target) => {
                info!(to = target, action = resolution.action.kind(), "navigating");
                navigator.navigate(target);
                true
            }
            None => false,
        };
        PageOutcome {
            resolution,
            persisted,
            navigated,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigate::RecordingNavigator;
    use crate::store::{DisabledStore, MemoryStore};

    fn gate() -> LocaleGate {
        LocaleGate::new(LocaleRouter::default(), "preferred-locale")
    }

    #[test]
    fn disabled_storage_stays_on_current_locale() {
        let gate = gate();
        let navigator = RecordingNavigator::new();
        let ctx = gate.open(PageRequest::new("/ja/pricing", "ko-KR"), &DisabledStore);
        let outcome = gate.on_page_load(&ctx, &DisabledStore, &navigator);
        assert_eq!(outcome.resolution.action, Action::Stay);
        assert_eq!(outcome.resolution.locale, "ja");
        assert!(outcome.degraded);
        assert!(!outcome.navigated);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn unsupported_switch_leaves_state_alone() {
        let gate = gate();
        let store = MemoryStore::with_entry("preferred-locale", "fr");
        let navigator = RecordingNavigator::new();
        assert!(gate.switch_to("tlh", &store, &navigator).is_err());
        assert_eq!(store.get("preferred-locale").unwrap().as_deref(), Some("fr"));
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn switch_persists_and_navigates() {
        let gate = gate();
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::new();
        let outcome = gate.switch_to("vi", &store, &navigator).unwrap();
        assert!(outcome.persisted && outcome.navigated);
        assert_eq!(store.get("preferred-locale").unwrap().as_deref(), Some("vi"));
        assert_eq!(navigator.last().as_deref(), Some("/vi/"));
    }
}
