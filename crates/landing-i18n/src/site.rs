//! Per-locale URLs the pages advertise: canonical links, `hreflang`
//! alternates, Open Graph tags, the language selector and the sitemap.

use handlebars::Handlebars;
use once_cell::sync::Lazy;
#[cfg(feature = "serde")]
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::SiteError;
use crate::resolve::LocaleRouter;
use crate::table::Locale;

const X_DEFAULT: &str = "x-default";

const LINK_TEMPLATE: &str = r#"<link rel="alternate" hreflang="{{hreflang}}" href="{{href}}">"#;

const HEAD_TEMPLATE: &str = r#"<link rel="canonical" href="{{canonical}}">
{{#each alternates}}
<link rel="alternate" hreflang="{{hreflang}}" href="{{href}}">
{{/each}}
<meta property="og:url" content="{{canonical}}">
<meta property="og:locale" content="{{og_locale}}">
"#;

const SITEMAP_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:xhtml="http://www.w3.org/1999/xhtml">
{{#each urls}}
    <url>
        <loc>{{loc}}</loc>
        <lastmod>{{lastmod}}</lastmod>
        <changefreq>weekly</changefreq>
        <priority>{{priority}}</priority>
{{#each alternates}}
        <xhtml:link rel="alternate" hreflang="{{hreflang}}" href="{{href}}"/>
{{/each}}
    </url>
{{/each}}
</urlset>
"#;

static MARKUP: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(|value| quick_xml::escape::escape(value).into_owned());
    registry
});

fn render(name: &'static str, template: &str, data: &Value) -> Result<String, SiteError> {
    MARKUP
        .render_template(template, data)
        .map_err(|source| SiteError::Render {
            template: name,
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

impl Alternate {
    pub fn to_link_tag(&self) -> Result<String, SiteError> {
        render("link tag", LINK_TEMPLATE, &self.to_value())
    }

    fn to_value(&self) -> Value {
        json!({ "hreflang": self.hreflang, "href": self.href })
    }
}

/// One entry of the language dropdown, as seen from a given page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SelectorOption {
    pub locale: Locale,
    pub label: String,
    pub short_label: String,
    pub og_locale: String,
    pub href: String,
    pub active: bool,
}

impl LocaleRouter {
    pub fn canonical_url(&self, base_url: &str, locale: &Locale) -> String {
        let base = base_url.trim().trim_end_matches('/');
        if self.table().is_default(locale) {
            format!("{base}/")
        } else {
            format!("{base}/{locale}/")
        }
    }

    /// `hreflang` alternates for every locale, then `x-default` at the root.
    pub fn alternates(&self, base_url: &str) -> Vec<Alternate> {
        let mut out: Vec<Alternate> = self
            .table()
            .iter()
            .map(|entry| Alternate {
                hreflang: entry.tag.clone(),
                href: self.canonical_url(base_url, &entry.locale()),
            })
            .collect();
        out.push(Alternate {
            hreflang: X_DEFAULT.to_string(),
            href: self.canonical_url(base_url, &self.table().default_locale()),
        });
        out
    }

    /// `og:locale` value for a locale's page.
    pub fn og_locale(&self, locale: &Locale) -> &str {
        self.table()
            .info(locale)
            .map(|info| info.og_locale())
            .unwrap_or("en_US")
    }

    /// Link and meta tags for the `<head>` of a locale's page.
    pub fn head_tags(&self, base_url: &str, locale: &Locale) -> Result<String, SiteError> {
        let alternates: Vec<Value> = self
            .alternates(base_url)
            .iter()
            .map(Alternate::to_value)
            .collect();
        let data = json!({
            "canonical": self.canonical_url(base_url, locale),
            "alternates": alternates,
            "og_locale": self.og_locale(locale),
        });
        render("head tags", HEAD_TEMPLATE, &data)
    }

    /// Relative prefix from a locale's page back to the shared assets.
    pub fn asset_prefix(&self, locale: &Locale) -> &'static str {
        if self.table().is_default(locale) {
            ""
        } else {
            "../"
        }
    }

    pub fn selector_options(&self, current: &Locale) -> Vec<SelectorOption> {
        let prefix = self.asset_prefix(current);
        self.table()
            .iter()
            .map(|entry| {
                let locale = entry.locale();
                let href = if self.table().is_default(&locale) {
                    if prefix.is_empty() {
                        "./".to_string()
                    } else {
                        prefix.to_string()
                    }
                } else {
                    format!("{prefix}{}/", entry.tag)
                };
                SelectorOption {
                    active: &locale == current,
                    label: entry.native_name().to_string(),
                    short_label: entry.short_label(),
                    og_locale: entry.og_locale().to_string(),
                    href,
                    locale,
                }
            })
            .collect()
    }

    /// Sitemap listing every locale's page with all of its alternates.
    pub fn sitemap_xml(&self, base_url: &str, lastmod: &str) -> Result<String, SiteError> {
        let alternates: Vec<Value> = self
            .alternates(base_url)
            .iter()
            .map(Alternate::to_value)
            .collect();
        let urls: Vec<Value> = self
            .table()
            .iter()
            .map(|entry| {
                let locale = entry.locale();
                let priority = if self.table().is_default(&locale) {
                    "1.0"
                } else {
                    "0.9"
                };
                json!({
                    "loc": self.canonical_url(base_url, &locale),
                    "lastmod": lastmod,
                    "priority": priority,
                    "alternates": alternates,
                })
            })
            .collect();
        render("sitemap", SITEMAP_TEMPLATE, &json!({ "urls": urls }))
    }
}
