use crate::detect::{current_locale_in, detect_locale_in};
use crate::error::SelectError;
use crate::table::{Locale, LocaleTable};

const QUERY_LOCALE_KEY: &str = "lang";
const HTML_SUFFIX: &str = ".html";

/// What the page should do after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The visitor is on the right page.
    Stay,
    /// Navigate to another locale's page.
    Redirect { target: String },
    /// Same locale; re-request the path with a trailing `/` so relative links
    /// on locale-prefixed pages resolve.
    NormalizeTrailingSlash { target: String },
}

impl Action {
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Stay => None,
            Self::Redirect { target } | Self::NormalizeTrailingSlash { target } => Some(target),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stay => "stay",
            Self::Redirect { .. } => "redirect",
            Self::NormalizeTrailingSlash { .. } => "normalize-trailing-slash",
        }
    }
}

/// Outcome of one page-load resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,
    pub action: Action,
    /// Value to write to the preference store, if it should change.
    pub persist: Option<Locale>,
}

impl Resolution {
    fn stay(locale: Locale, persist: Option<Locale>) -> Self {
        Self {
            locale,
            action: Action::Stay,
            persist,
        }
    }
}

/// A locale table bound to the base path the site is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRouter {
    table: LocaleTable,
    base_path: String,
}

impl LocaleRouter {
    pub fn new(table: LocaleTable, base_path: &str) -> Self {
        Self {
            table,
            base_path: normalize_base_path(base_path),
        }
    }

    pub fn table(&self) -> &LocaleTable {
        &self.table
    }

    /// Base path with a leading `/` and no trailing `/`; empty for the domain root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn current_locale(&self, path: &str) -> Locale {
        current_locale_in(&self.table, path)
    }

    pub fn detect_locale(&self, browser_locale: &str) -> Locale {
        detect_locale_in(&self.table, browser_locale)
    }

    /// Absolute path of a locale's landing page.
    pub fn redirect_target(&self, locale: &Locale) -> String {
        if self.table.is_default(locale) {
            format!("{}/", self.base_path)
        } else {
            format!("{}/{}/", self.base_path, locale)
        }
    }

    /// Interpret a raw stored value; anything outside the table reads as unset.
    pub fn stored_preference(&self, raw: Option<&str>) -> Option<Locale> {
        raw.map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| self.table.get(value))
    }

    /// Decide which locale the visitor should see and whether to navigate.
    ///
    /// A non-default locale in the path always wins over the stored
    /// preference; the preference only steers visitors who land on the root.
    pub fn resolve(
        &self,
        path: &str,
        stored: Option<&Locale>,
        browser_locale: &str,
    ) -> Resolution {
        let current = self.current_locale(path);
        if !self.table.is_default(&current) {
            if !is_terminated(path) {
                return Resolution {
                    locale: current,
                    action: Action::NormalizeTrailingSlash {
                        target: format!("{path}/"),
                    },
                    persist: None,
                };
            }
            let persist = (stored != Some(&current)).then(|| current.clone());
            return Resolution::stay(current, persist);
        }

        match stored {
            Some(stored) if *stored != current => Resolution {
                locale: stored.clone(),
                action: Action::Redirect {
                    target: self.redirect_target(stored),
                },
                persist: None,
            },
            Some(_) => Resolution::stay(current, None),
            None => {
                let detected = self.detect_locale(browser_locale);
                if detected != current {
                    Resolution {
                        action: Action::Redirect {
                            target: self.redirect_target(&detected),
                        },
                        persist: Some(detected.clone()),
                        locale: detected,
                    }
                } else {
                    Resolution::stay(current.clone(), Some(current))
                }
            }
        }
    }

    /// Like [`LocaleRouter::resolve`], but an explicit `lang=<tag>` query
    /// parameter naming a supported locale takes precedence over everything.
    pub fn resolve_request(
        &self,
        path: &str,
        query: Option<&str>,
        stored: Option<&Locale>,
        browser_locale: &str,
    ) -> Resolution {
        let Some(chosen) = query
            .and_then(query_locale)
            .and_then(|tag| self.table.find_ignore_case(tag))
        else {
            return self.resolve(path, stored, browser_locale);
        };
        let current = self.current_locale(path);
        let persist = (stored != Some(&chosen)).then(|| chosen.clone());
        if chosen != current {
            return Resolution {
                action: Action::Redirect {
                    target: self.redirect_target(&chosen),
                },
                locale: chosen,
                persist,
            };
        }
        if !self.table.is_default(&current) && !is_terminated(path) {
            return Resolution {
                locale: current,
                action: Action::NormalizeTrailingSlash {
                    target: format!("{path}/"),
                },
                persist,
            };
        }
        Resolution::stay(current, persist)
    }

    /// A choice made from the language selector.
    pub fn select(&self, tag: &str) -> Result<Resolution, SelectError> {
        let locale = self
            .table
            .find_ignore_case(tag.trim())
            .ok_or_else(|| SelectError::Unsupported {
                tag: tag.to_string(),
            })?;
        Ok(Resolution {
            action: Action::Redirect {
                target: self.redirect_target(&locale),
            },
            persist: Some(locale.clone()),
            locale,
        })
    }
}

impl Default for LocaleRouter {
    fn default() -> Self {
        Self::new(LocaleTable::builtin(), "")
    }
}

pub(crate) fn normalize_base_path(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// A path ends cleanly when it has a trailing `/` or names an HTML document
/// (`/ja/index.html`).
fn is_terminated(path: &str) -> bool {
    path.ends_with('/') || path.ends_with(HTML_SUFFIX)
}

fn query_locale(query: &str) -> Option<&str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == QUERY_LOCALE_KEY)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> LocaleRouter {
        LocaleRouter::default()
    }

    fn locale(tag: &str) -> Locale {
        LocaleTable::builtin().get(tag).unwrap()
    }

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("WhereWasI/"), "/WhereWasI");
        assert_eq!(normalize_base_path(" /FitnessStory "), "/FitnessStory");
    }

    #[test]
    fn redirect_target_maps_default_to_root() {
        let nested = LocaleRouter::new(LocaleTable::builtin(), "/WhereWasI/");
        assert_eq!(nested.redirect_target(&locale("en")), "/WhereWasI/");
        assert_eq!(nested.redirect_target(&locale("zh-Hans")), "/WhereWasI/zh-Hans/");
        assert_eq!(router().redirect_target(&locale("fr")), "/fr/");
    }

    #[test]
    fn stored_preference_ignores_unknown_values() {
        let router = router();
        assert_eq!(router.stored_preference(Some("fr")), Some(locale("fr")));
        assert_eq!(router.stored_preference(Some("klingon")), None);
        assert_eq!(router.stored_preference(Some("")), None);
        assert_eq!(router.stored_preference(None), None);
    }

    #[test]
    fn missing_trailing_slash_is_normalized() {
        let resolution = router().resolve("/ja/pricing", None, "en-US");
        assert_eq!(resolution.locale, "ja");
        assert_eq!(
            resolution.action,
            Action::NormalizeTrailingSlash {
                target: "/ja/pricing/".to_string()
            }
        );
        assert_eq!(resolution.persist, None);
    }

    #[test]
    fn html_documents_are_not_normalized() {
        let resolution = router().resolve("/ja/index.html", None, "en-US");
        assert_eq!(resolution.action, Action::Stay);
        assert_eq!(resolution.persist, Some(locale("ja")));
    }

    #[test]
    fn dotted_directory_segments_are_normalized() {
        let resolution = router().resolve("/ja/v1.2", None, "en");
        assert_eq!(resolution.locale, "ja");
        assert_eq!(
            resolution.action,
            Action::NormalizeTrailingSlash {
                target: "/ja/v1.2/".to_string()
            }
        );
        assert_eq!(resolution.persist, None);
    }

    #[test]
    fn stored_preference_redirects_from_root() {
        let fr = locale("fr");
        let resolution = router().resolve("/", Some(&fr), "ja-JP");
        assert_eq!(resolution.locale, "fr");
        assert_eq!(
            resolution.action,
            Action::Redirect {
                target: "/fr/".to_string()
            }
        );
        assert_eq!(resolution.persist, None);
    }

    #[test]
    fn browser_language_redirects_first_visit() {
        let resolution = router().resolve("/", None, "ko-KR");
        assert_eq!(resolution.action.target(), Some("/ko/"));
        assert_eq!(resolution.persist, Some(locale("ko")));
    }

    #[test]
    fn first_visit_in_default_language_stays_and_persists() {
        let resolution = router().resolve("/", None, "en-GB");
        assert_eq!(resolution.action, Action::Stay);
        assert_eq!(resolution.persist, Some(locale("en")));
    }

    #[test]
    fn locale_page_wins_over_stored_preference() {
        let fr = locale("fr");
        let resolution = router().resolve("/de/", Some(&fr), "fr-FR");
        assert_eq!(resolution.action, Action::Stay);
        assert_eq!(resolution.locale, "de");
        assert_eq!(resolution.persist, Some(locale("de")));
    }

    #[test]
    fn matching_preference_is_not_rewritten() {
        let de = locale("de");
        assert_eq!(router().resolve("/de/", Some(&de), "").persist, None);
        let en = locale("en");
        let resolution = router().resolve("/", Some(&en), "ja");
        assert_eq!(resolution.action, Action::Stay);
        assert_eq!(resolution.persist, None);
    }

    #[test]
    fn query_choice_overrides_path_and_store() {
        let fr = locale("fr");
        let resolution = router().resolve_request("/de/", Some("?lang=ja"), Some(&fr), "fr");
        assert_eq!(resolution.action.target(), Some("/ja/"));
        assert_eq!(resolution.persist, Some(locale("ja")));

        let resolution = router().resolve_request("/", Some("utm=x&lang=en"), Some(&fr), "fr");
        assert_eq!(resolution.action, Action::Stay);
        assert_eq!(resolution.persist, Some(locale("en")));
    }

    #[test]
    fn query_choice_still_normalizes_trailing_slash() {
        let resolution = router().resolve_request("/ja", Some("lang=ja"), None, "");
        assert_eq!(resolution.action.target(), Some("/ja/"));
        assert_eq!(resolution.action.kind(), "normalize-trailing-slash");
        assert_eq!(resolution.persist, Some(locale("ja")));
    }

    #[test]
    fn unknown_query_choice_falls_back_to_resolve() {
        let fr = locale("fr");
        let resolution = router().resolve_request("/", Some("lang=xx"), Some(&fr), "");
        assert_eq!(resolution.action.target(), Some("/fr/"));
        let resolution = router().resolve_request("/", Some("lang="), None, "ko");
        assert_eq!(resolution.action.target(), Some("/ko/"));
    }

    #[test]
    fn select_accepts_supported_and_rejects_others() {
        let resolution = router().select("zh-hant").unwrap();
        assert_eq!(resolution.locale, "zh-Hant");
        assert_eq!(resolution.action.target(), Some("/zh-Hant/"));
        assert_eq!(resolution.persist, Some(locale("zh-Hant")));
        assert_eq!(router().select("en").unwrap().action.target(), Some("/"));
        assert_eq!(
            router().select("tlh"),
            Err(SelectError::Unsupported {
                tag: "tlh".to_string()
            })
        );
    }
}
