use thiserror::Error;

/// Failure of a single extraction strategy. Recovered inside the chain by
/// advancing to the next strategy; never surfaced to the caller directly.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid request url: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    Status(u16),
    #[error("unparseable response: {0}")]
    Parse(String),
    #[error("no media in response")]
    NoMedia,
}

impl From<reqwest::Error> for StrategyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return StrategyError::Timeout;
        }
        StrategyError::Network(err.to_string())
    }
}

/// Terminal adapter outcome reported to the orchestrator.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The URL failed platform-specific validation; no network call was made.
    #[error("{0}")]
    InvalidUrl(String),
    /// Every strategy in the chain failed or produced zero items.
    #[error("{0}")]
    Exhausted(String),
}
