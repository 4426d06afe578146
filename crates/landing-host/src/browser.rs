use std::env;

use landing_i18n::normalize_locale;

pub const ENV_BROWSER_LOCALE: &str = "LANDING_BROWSER_LOCALE";

/// Reported language for a page load: an explicit value wins, then the
/// override variable, then the system locale. Empty when nothing is known,
/// which resolves to the default locale.
pub fn select_browser_locale(explicit: Option<&str>) -> String {
    let env_locale = env::var(ENV_BROWSER_LOCALE).ok();
    let system = system_locale();
    browser_locale_with_sources(explicit, env_locale.as_deref(), system.as_deref())
}

pub fn browser_locale_with_sources(
    explicit: Option<&str>,
    env_locale: Option<&str>,
    system_locale: Option<&str>,
) -> String {
    [explicit, env_locale, system_locale]
        .into_iter()
        .flatten()
        .map(normalize_locale)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn system_locale() -> Option<String> {
    for key in ["LC_ALL", "LANG", "LC_MESSAGES"] {
        if let Ok(value) = env::var(key) {
            let normalized = normalize_locale(&value);
            // `C` and `POSIX` carry no language preference.
            if normalized.is_empty() || normalized == "C" || normalized == "POSIX" {
                continue;
            }
            return Some(normalized);
        }
    }
    None
}
