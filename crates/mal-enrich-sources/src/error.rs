use thiserror::Error;

/// Failure taxonomy for the fetch layer. Only `NotFound` feeds the
/// not-found ledger; everything else is logged and the record skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream returned 404: the entity does not exist.
    #[error("entity not found upstream")]
    NotFound,

    /// Still rate limited or blocked after exhausting retries.
    #[error("rate limited or blocked (status {0}) after retries")]
    RateLimited(u16),

    /// Any other non-200 status from the upstream service.
    #[error("upstream returned status {0}")]
    Upstream(u16),

    /// Network-level failure: DNS, connect, TLS, or a non-retried timeout.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not deserialize into the expected shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The Letterboxd redirect target did not match `/film/<slug>/`.
    #[error("could not parse slug from redirect location {0:?}")]
    RedirectParse(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}
