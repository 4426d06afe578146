use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use landing_host::{
    FileStore, LocaleGate, MemoryStore, PageOutcome, PageRequest, PreferenceStore,
    RecordingNavigator, SiteConfig, TranslationSource, select_browser_locale,
};

#[derive(Debug, Parser)]
#[command(
    name = "landing-locale",
    about = "Resolve landing-page locales and generate locale alternates"
)]
pub struct Cli {
    /// Site config file (toml/json). Defaults to the built-in locale table at the root.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one page load and report what the page would do.
    Resolve {
        /// Path of the requested page
        #[arg(long)]
        path: String,

        /// Query string of the request (`lang=ja` selects a locale explicitly)
        #[arg(long)]
        query: Option<String>,

        /// Browser language; defaults to the environment's locale
        #[arg(long = "browser-locale", value_name = "TAG")]
        browser_locale: Option<String>,

        /// Preference file to read and update
        #[arg(long, value_name = "FILE", conflicts_with = "stored")]
        store: Option<PathBuf>,

        /// Stored preference for a one-off, in-memory run
        #[arg(long, value_name = "TAG")]
        stored: Option<String>,
    },

    /// Apply a language selector choice.
    Switch {
        #[arg(long = "to", value_name = "TAG")]
        to: String,

        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,
    },

    /// Print the language selector as seen from a locale's page.
    Languages {
        #[arg(long, value_name = "TAG")]
        current: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print `hreflang` alternate link tags.
    Alternates {
        #[arg(long = "base-url", value_name = "URL")]
        base_url: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the `<head>` link and Open Graph tags for a locale's page.
    Head {
        #[arg(long, value_name = "TAG")]
        locale: String,

        #[arg(long = "base-url", value_name = "URL")]
        base_url: Option<String>,
    },

    /// Print the multi-locale sitemap.
    Sitemap {
        #[arg(long = "base-url", value_name = "URL")]
        base_url: Option<String>,

        /// Last-modified date (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        lastmod: Option<String>,
    },

    /// Look up translated messages for a locale's page.
    Text {
        #[arg(long, value_name = "TAG")]
        locale: String,

        /// Dotted message key; repeat for several messages
        #[arg(long = "key", value_name = "KEY", required = true)]
        keys: Vec<String>,

        #[arg(long, default_value = "")]
        fallback: String,
    },

    /// Print the resolved site configuration and exit.
    ConfigExplain,
}

pub fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    let config = match path {
        Some(path) => SiteConfig::from_path(path)
            .with_context(|| format!("failed to load site config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Run a parsed command and return what it prints.
pub fn execute(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let gate = LocaleGate::from_config(&config)?;
    match &cli.command {
        Command::Resolve {
            path,
            query,
            browser_locale,
            store,
            stored,
        } => {
            let browser_locale = select_browser_locale(browser_locale.as_deref());
            let mut request = PageRequest::new(path.clone(), browser_locale);
            if let Some(query) = query {
                request = request.with_query(query.clone());
            }
            let store = open_store(&gate, store.as_deref(), stored.as_deref())?;
            let navigator = RecordingNavigator::new();
            let ctx = gate.open(request, &*store);
            let outcome = gate.on_page_load(&ctx, &*store, &navigator);
            Ok(render_outcome(&outcome))
        }
        Command::Switch { to, store } => {
            let store = open_store(&gate, store.as_deref(), None)?;
            let navigator = RecordingNavigator::new();
            let outcome = gate.switch_to(to, &*store, &navigator)?;
            Ok(render_outcome(&outcome))
        }
        Command::Languages { current, json } => {
            let router = gate.router();
            let current = match current {
                Some(tag) => router
                    .table()
                    .find_ignore_case(tag)
                    .with_context(|| format!("unsupported locale `{tag}`"))?,
                None => router.table().default_locale(),
            };
            let options = router.selector_options(&current);
            if *json {
                return Ok(serde_json::to_string_pretty(&options)? + "\n");
            }
            let mut out = String::new();
            for option in options {
                let marker = if option.active { "*" } else { " " };
                writeln!(
                    out,
                    "{marker} {:<8} {:<4} {:<12} {}",
                    option.locale, option.short_label, option.href, option.label
                )?;
            }
            Ok(out)
        }
        Command::Alternates { base_url, json } => {
            let base_url = resolve_base_url(&config, base_url.as_deref())?;
            let alternates = gate.router().alternates(&base_url);
            if *json {
                return Ok(serde_json::to_string_pretty(&alternates)? + "\n");
            }
            let mut out = String::new();
            for alternate in alternates {
                writeln!(out, "{}", alternate.to_link_tag()?)?;
            }
            Ok(out)
        }
        Command::Sitemap { base_url, lastmod } => {
            let base_url = resolve_base_url(&config, base_url.as_deref())?;
            let lastmod = match lastmod {
                Some(value) => {
                    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .with_context(|| format!("invalid --lastmod date `{value}`"))?;
                    value.clone()
                }
                None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            };
            Ok(gate.router().sitemap_xml(&base_url, &lastmod)?)
        }
        Command::Head { locale, base_url } => {
            let base_url = resolve_base_url(&config, base_url.as_deref())?;
            let router = gate.router();
            let locale = router
                .table()
                .find_ignore_case(locale)
                .with_context(|| format!("unsupported locale `{locale}`"))?;
            Ok(router.head_tags(&base_url, &locale)?)
        }
        Command::Text {
            locale,
            keys,
            fallback,
        } => {
            let Some(dir) = config.translations_dir.as_ref() else {
                bail!("site config does not define translations_dir");
            };
            let router = gate.router();
            let locale = router
                .table()
                .find_ignore_case(locale)
                .with_context(|| format!("unsupported locale `{locale}`"))?;
            let source = TranslationSource::new(dir, router.table().default_locale());
            let request = PageRequest::new(router.redirect_target(&locale), "");
            let ctx = gate.open(request, &MemoryStore::new());
            let mut out = String::new();
            for key in keys {
                let translations = ctx.translations(&source, &locale);
                writeln!(out, "{}", translations.text(key, fallback))?;
            }
            Ok(out)
        }
        Command::ConfigExplain => {
            let mut out = toml::to_string_pretty(&config).context("failed to render config")?;
            let table = gate.router().table();
            writeln!(
                out,
                "# {} locales, default `{}`, storage key `{}`",
                table.len(),
                table.default_locale(),
                gate.storage_key()
            )?;
            Ok(out)
        }
    }
}

fn open_store(
    gate: &LocaleGate,
    file: Option<&Path>,
    stored: Option<&str>,
) -> Result<Box<dyn PreferenceStore>> {
    if let Some(path) = file {
        return Ok(Box::new(FileStore::new(path)));
    }
    Ok(match stored {
        Some(value) => Box::new(MemoryStore::with_entry(gate.storage_key(), value)),
        None => Box::new(MemoryStore::new()),
    })
}

fn resolve_base_url(config: &SiteConfig, flag: Option<&str>) -> Result<String> {
    match flag {
        Some(url) => Ok(url.to_string()),
        None => Ok(config
            .require_base_url()
            .context("pass --base-url or set base_url in the site config")?
            .to_string()),
    }
}

fn render_outcome(outcome: &PageOutcome) -> String {
    let resolution = &outcome.resolution;
    let mut out = format!(
        "action: {}\nlocale: {}\n",
        resolution.action.kind(),
        resolution.locale
    );
    if let Some(target) = resolution.action.target() {
        out.push_str(&format!("target: {target}\n"));
    }
    if let Some(locale) = &resolution.persist {
        let state = if outcome.persisted { "" } else { " (failed)" };
        out.push_str(&format!("persist: {locale}{state}\n"));
    }
    if outcome.degraded {
        out.push_str("storage: unavailable\n");
    }
    out
}
