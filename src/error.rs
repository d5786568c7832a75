use thiserror::Error;

/// Failure kinds surfaced by the API client.
///
/// `AuthorizationExpired` is an internal classification: a wrapped request
/// that came back 401. The client recovers it by refreshing and replaying,
/// so callers only ever see it indirectly (as `Unauthenticated` when the
/// replay fails too). Every variant is cloneable so a single refresh
/// outcome can be handed to every request waiting on it.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("not signed in")]
    Unauthenticated,

    #[error("authorization expired")]
    AuthorizationExpired,

    #[error("session rejected by the server; sign in again")]
    AuthorizationRejected,

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("session store error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl ApiError {
    pub(crate) fn store(err: anyhow::Error) -> Self {
        ApiError::Store(format!("{:#}", err))
    }
}
