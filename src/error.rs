use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to fetch a page or talk to an HTTP collaborator
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The page renderer could not produce any content
    #[error("Failed to render page: {0}")]
    RenderError(String),

    /// The given URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Recipe backend search failed
    #[error("Search failed: {0}")]
    SearchError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
