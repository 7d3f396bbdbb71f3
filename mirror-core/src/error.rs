use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed document error: {0}")]
    Document(#[from] rss::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid rewrite link base: {0}")]
    LinkBase(#[from] url::ParseError),
    #[error("no user config directory found")]
    NoConfigDir,
}
