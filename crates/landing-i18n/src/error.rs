use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleTableError {
    #[error("locale table is empty")]
    Empty,

    #[error("locale entry {index} has a blank tag")]
    BlankTag { index: usize },

    #[error("locale tag `{tag}` cannot be used as a path segment")]
    InvalidTag { tag: String },

    #[error("locale tag `{tag}` is listed more than once")]
    Duplicate { tag: String },

    #[error("default locale `{tag}` is not in the locale table")]
    MissingDefault { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("unsupported locale `{tag}`")]
    Unsupported { tag: String },
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to render {template}")]
    Render {
        template: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
}
