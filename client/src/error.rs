use thiserror::Error;

/// The error type shared by every configuration-store and auth-service call.
///
/// Variants are `Clone` so that coalesced cache waiters can each receive the
/// same failure. `NotFound` never escapes the API client for value fetches;
/// it is converted to an absent value there.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Missing, expired or rejected credential (HTTP 401/403), or a login
    /// response that carried no usable token.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// HTTP 404 on a value fetch. Absorbed by the API client.
    #[error("no value stored")]
    NotFound,

    /// Transport-level failure, no response from the service.
    #[error("network failure: {0}")]
    Network(String),

    /// Any other non-2xx status, or a 2xx response whose body could not be
    /// parsed as the expected shape.
    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// Internal or unexpected errors (request serialization and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Whether a retry could plausibly change the outcome.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
