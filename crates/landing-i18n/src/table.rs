use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LocaleTableError;

/// Tag of the locale served from the site root.
pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    ("en", "English", "English", "EN", "en_US"),
    ("zh-Hans", "Chinese Simplified", "简体中文", "简", "zh_CN"),
    ("zh-Hant", "Chinese Traditional", "繁體中文", "繁", "zh_TW"),
    ("ja", "Japanese", "日本語", "JA", "ja_JP"),
    ("ko", "Korean", "한국어", "KO", "ko_KR"),
    ("fr", "French", "Français", "FR", "fr_FR"),
    ("de", "German", "Deutsch", "DE", "de_DE"),
    ("es", "Spanish", "Español", "ES", "es_ES"),
    ("pt", "Portuguese", "Português", "PT", "pt_BR"),
    ("it", "Italian", "Italiano", "IT", "it_IT"),
    ("ru", "Russian", "Русский", "RU", "ru_RU"),
    ("hi", "Hindi", "हिन्दी", "HI", "hi_IN"),
    ("id", "Indonesian", "Indonesia", "ID", "id_ID"),
    ("vi", "Vietnamese", "Tiếng Việt", "VI", "vi_VN"),
];

/// A supported locale tag.
///
/// Values are only handed out by a [`LocaleTable`], so holding a `Locale`
/// means the tag is a member of the table it came from.
///
/// ```compile_fail
/// use landing_i18n::LocaleInfo;
///
/// let forged = LocaleInfo::new("../../etc/passwd", "x").locale();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Locale(String);

impl Locale {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Display metadata for one supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocaleInfo {
    pub tag: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub native_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub og_locale: Option<String>,
}

impl LocaleInfo {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            native_name: None,
            short_label: None,
            og_locale: None,
        }
    }

    pub fn with_native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = Some(native_name.into());
        self
    }

    pub fn with_short_label(mut self, short_label: impl Into<String>) -> Self {
        self.short_label = Some(short_label.into());
        self
    }

    pub fn with_og_locale(mut self, og_locale: impl Into<String>) -> Self {
        self.og_locale = Some(og_locale.into());
        self
    }

    pub fn native_name(&self) -> &str {
        self.native_name.as_deref().unwrap_or(&self.name)
    }

    /// Label shown on the collapsed language button; defaults to the first two
    /// characters of the tag, uppercased.
    pub fn short_label(&self) -> String {
        match &self.short_label {
            Some(label) => label.clone(),
            None => self.tag.chars().take(2).collect::<String>().to_uppercase(),
        }
    }

    pub fn og_locale(&self) -> &str {
        self.og_locale.as_deref().unwrap_or("en_US")
    }

    pub(crate) fn locale(&self) -> Locale {
        Locale::new(self.tag.clone())
    }
}

/// Ordered set of supported locales plus the one served from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    entries: Vec<LocaleInfo>,
    default: usize,
}

impl LocaleTable {
    pub fn new(entries: Vec<LocaleInfo>, default_tag: &str) -> Result<Self, LocaleTableError> {
        if entries.is_empty() {
            return Err(LocaleTableError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            let tag = entry.tag.trim();
            if tag.is_empty() {
                return Err(LocaleTableError::BlankTag { index });
            }
            let segment_safe = tag.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
            if tag != entry.tag || !segment_safe {
                return Err(LocaleTableError::InvalidTag {
                    tag: entry.tag.clone(),
                });
            }
            if entries[..index]
                .iter()
                .any(|prior| prior.tag.eq_ignore_ascii_case(tag))
            {
                return Err(LocaleTableError::Duplicate {
                    tag: entry.tag.clone(),
                });
            }
        }
        let default = entries
            .iter()
            .position(|entry| entry.tag == default_tag)
            .ok_or_else(|| LocaleTableError::MissingDefault {
                tag: default_tag.to_string(),
            })?;
        Ok(Self { entries, default })
    }

    /// The fourteen locales the landing sites ship with, `en` at the root.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(tag, name, native, short, og)| {
                LocaleInfo::new(*tag, *name)
                    .with_native_name(*native)
                    .with_short_label(*short)
                    .with_og_locale(*og)
            })
            .collect();
        Self {
            entries,
            default: 0,
        }
    }

    pub fn default_locale(&self) -> Locale {
        self.entries[self.default].locale()
    }

    pub fn is_default(&self, locale: &Locale) -> bool {
        self.entries[self.default].tag == locale.as_str()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, tag: &str) -> Option<Locale> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(LocaleInfo::locale)
    }

    /// ASCII case-insensitive lookup, as BCP-47 tags compare.
    pub fn find_ignore_case(&self, tag: &str) -> Option<Locale> {
        self.entries
            .iter()
            .find(|entry| entry.tag.eq_ignore_ascii_case(tag))
            .map(LocaleInfo::locale)
    }

    pub fn info(&self, locale: &Locale) -> Option<&LocaleInfo> {
        self.entries
            .iter()
            .find(|entry| entry.tag == locale.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_keeps_order_and_default() {
        let table = LocaleTable::builtin();
        assert_eq!(table.len(), 14);
        assert_eq!(table.default_locale(), "en");
        let tags: Vec<&str> = table.iter().map(|entry| entry.tag.as_str()).collect();
        assert_eq!(&tags[..4], &["en", "zh-Hans", "zh-Hant", "ja"]);
        assert_eq!(tags.last(), Some(&"vi"));
    }

    #[test]
    fn lookups_respect_case_rules() {
        let table = LocaleTable::builtin();
        assert!(table.get("zh-hans").is_none());
        assert_eq!(table.get("zh-Hans").unwrap(), "zh-Hans");
        assert_eq!(table.find_ignore_case("ZH-HANS").unwrap(), "zh-Hans");
    }

    #[test]
    fn info_defaults_fill_missing_metadata() {
        let info = LocaleInfo::new("nl", "Dutch");
        assert_eq!(info.native_name(), "Dutch");
        assert_eq!(info.short_label(), "NL");
        assert_eq!(info.og_locale(), "en_US");
        let builtin = LocaleTable::builtin();
        let zh = builtin.get("zh-Hant").unwrap();
        assert_eq!(builtin.info(&zh).unwrap().short_label(), "繁");
    }

    #[test]
    fn new_rejects_invalid_tables() {
        assert_eq!(
            LocaleTable::new(Vec::new(), "en"),
            Err(LocaleTableError::Empty)
        );
        assert_eq!(
            LocaleTable::new(vec![LocaleInfo::new("fr", "French")], "en"),
            Err(LocaleTableError::MissingDefault {
                tag: "en".to_string()
            })
        );
        assert_eq!(
            LocaleTable::new(
                vec![LocaleInfo::new("en", "English"), LocaleInfo::new("EN", "Dup")],
                "en"
            ),
            Err(LocaleTableError::Duplicate {
                tag: "EN".to_string()
            })
        );
        assert_eq!(
            LocaleTable::new(vec![LocaleInfo::new(" ", "Blank")], "en"),
            Err(LocaleTableError::BlankTag { index: 0 })
        );
        assert_eq!(
            LocaleTable::new(vec![LocaleInfo::new("en/us", "Bad")], "en/us"),
            Err(LocaleTableError::InvalidTag {
                tag: "en/us".to_string()
            })
        );
    }

    #[test]
    fn path_like_tags_never_become_locales() {
        for tag in ["../../etc/passwd", "..", "ja.html", "zh_TW", "ko?x=1"] {
            let entries = vec![LocaleInfo::new("en", "English"), LocaleInfo::new(tag, "x")];
            assert_eq!(
                LocaleTable::new(entries, "en"),
                Err(LocaleTableError::InvalidTag {
                    tag: tag.to_string()
                })
            );
        }
        let table = LocaleTable::builtin();
        assert!(table.get("../../etc/passwd").is_none());
        assert!(table.find_ignore_case("..").is_none());
    }

    #[test]
    fn custom_default_is_honoured() {
        let table = LocaleTable::new(
            vec![LocaleInfo::new("en", "English"), LocaleInfo::new("ja", "Japanese")],
            "ja",
        )
        .unwrap();
        assert_eq!(table.default_locale(), "ja");
        assert!(table.is_default(&table.get("ja").unwrap()));
    }
}
