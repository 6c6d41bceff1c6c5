/// Error types shared across the site's server crates.
///
/// These cover configuration of the hosted collaborators (completion service,
/// leaderboard store). Client-specific failures live next to each client
/// (`CompletionError`, `StoreError`); server crates wrap all of them via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("{0} environment variable is required")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}
