use thiserror::Error;

/// Failures the rate core can report.
///
/// Sync recovers from the first two by falling back to the store, so only
/// `ComputeUnavailable` normally reaches the presentation layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("Rate service unreachable: {0}")]
    NetworkUnavailable(String),

    #[error("Rate service rejected the request: {0}")]
    RemoteRejected(String),

    #[error("No cached value for key: {0}")]
    CacheMiss(String),

    #[error("Rate unavailable for {0}")]
    ComputeUnavailable(String),
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep the query string out of logs.
        let msg = e.without_url().to_string();
        RateError::NetworkUnavailable(msg)
    }
}
