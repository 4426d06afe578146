use crate::table::{Locale, LocaleTable};

const SIMPLIFIED_CHINESE: &str = "zh-Hans";
const TRADITIONAL_CHINESE: &str = "zh-Hant";
const TRADITIONAL_MARKERS: [&str; 3] = ["TW", "HK", "HANT"];

/// Trim a reported language, drop any POSIX encoding or modifier suffix and
/// use `-` as the subtag separator (`zh_TW.UTF-8` -> `zh-TW`).
pub fn normalize_locale(value: &str) -> String {
    let trimmed = value.trim();
    let stripped = trimmed.split(['.', '@']).next().unwrap_or(trimmed);
    stripped.trim().replace('_', "-")
}

/// Locale encoded in a page path.
///
/// Returns the first table entry whose `/{tag}/` segment occurs in `path`, or
/// whose `/{tag}` ends it; the default locale otherwise. The default locale is
/// served from the root and has no segment of its own.
pub fn current_locale_in(table: &LocaleTable, path: &str) -> Locale {
    let default = table.default_locale();
    for entry in table.iter().filter(|entry| entry.tag != default.as_str()) {
        let segment = format!("/{}/", entry.tag);
        if path.contains(&segment) || path.ends_with(&segment[..segment.len() - 1]) {
            return entry.locale();
        }
    }
    default
}

/// Best supported locale for a browser-reported language.
///
/// Exact tag, then primary subtag, then the Chinese script heuristic, then the
/// default. Never fails; unrecognised input lands on the default.
pub fn detect_locale_in(table: &LocaleTable, browser_locale: &str) -> Locale {
    let normalized = normalize_locale(browser_locale);
    if normalized.is_empty() {
        return table.default_locale();
    }
    if let Some(locale) = table.find_ignore_case(&normalized) {
        return locale;
    }
    let primary = normalized.split('-').next().unwrap_or_default();
    if !primary.is_empty()
        && let Some(locale) = table.find_ignore_case(primary)
    {
        return locale;
    }
    if normalized.to_ascii_lowercase().starts_with("zh") {
        let upper = normalized.to_ascii_uppercase();
        let tag = if TRADITIONAL_MARKERS
            .iter()
            .any(|marker| upper.contains(marker))
        {
            TRADITIONAL_CHINESE
        } else {
            SIMPLIFIED_CHINESE
        };
        if let Some(locale) = table.get(tag) {
            return locale;
        }
    }
    table.default_locale()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::LocaleInfo;

    fn detect(value: &str) -> Locale {
        detect_locale_in(&LocaleTable::builtin(), value)
    }

    fn current(path: &str) -> Locale {
        current_locale_in(&LocaleTable::builtin(), path)
    }

    #[test]
    fn normalize_locale_strips_encoding_and_separators() {
        assert_eq!(normalize_locale(" zh_TW.UTF-8 "), "zh-TW");
        assert_eq!(normalize_locale("de_DE@euro"), "de-DE");
        assert_eq!(normalize_locale("pt-BR"), "pt-BR");
        assert_eq!(normalize_locale(""), "");
    }

    #[test]
    fn detect_prefers_exact_match() {
        assert_eq!(detect("zh-Hans"), "zh-Hans");
        assert_eq!(detect("zh-hant"), "zh-Hant");
        assert_eq!(detect("ja"), "ja");
    }

    #[test]
    fn detect_falls_back_to_primary_subtag() {
        assert_eq!(detect("fr-CA"), "fr");
        assert_eq!(detect("en-US"), "en");
        assert_eq!(detect("pt_BR.UTF-8"), "pt");
        assert_eq!(detect("KO-kr"), "ko");
    }

    #[test]
    fn detect_handles_chinese_regions() {
        assert_eq!(detect("zh-TW"), "zh-Hant");
        assert_eq!(detect("zh-HK"), "zh-Hant");
        assert_eq!(detect("zh-Hant-MO"), "zh-Hant");
        assert_eq!(detect("zh-CN"), "zh-Hans");
        assert_eq!(detect("zh-SG"), "zh-Hans");
        assert_eq!(detect("zh"), "zh-Hans");
    }

    #[test]
    fn detect_defaults_for_unknown_or_empty() {
        assert_eq!(detect("xx-YY"), "en");
        assert_eq!(detect(""), "en");
        assert_eq!(detect("   "), "en");
        assert_eq!(detect("-"), "en");
    }

    #[test]
    fn chinese_heuristic_requires_table_entries() {
        let table = LocaleTable::new(
            vec![LocaleInfo::new("en", "English"), LocaleInfo::new("ja", "Japanese")],
            "en",
        )
        .unwrap();
        assert_eq!(detect_locale_in(&table, "zh-TW"), "en");
    }

    #[test]
    fn current_locale_reads_path_segments() {
        assert_eq!(current("/ja/"), "ja");
        assert_eq!(current("/ja/pricing"), "ja");
        assert_eq!(current("/WhereWasI/zh-Hant/"), "zh-Hant");
        assert_eq!(current("/FitnessStory/ko"), "ko");
        assert_eq!(current("/"), "en");
        assert_eq!(current(""), "en");
        assert_eq!(current("/japan/"), "en");
        assert_eq!(current("/blog/jade"), "en");
        assert_eq!(current("/en/"), "en");
        assert_eq!(current("/en/ja/"), "ja");
    }

    #[test]
    fn current_locale_uses_table_order() {
        assert_eq!(current("/de/fr/"), "fr");
    }
}
