//! Domain error types.

use thiserror::Error;

/// Errors surfaced by the coordination components.
///
/// Malformed-but-tolerated input (empty peer ids, empty edits) never
/// produces an error; it is ignored by the components themselves.
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// A signaling offer was rejected before anything was stored.
    #[error("invalid offer: {0}")]
    InvalidOffer(String),

    /// A mutation targeted a session that does not exist or has expired.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// Internal failure, e.g. a poisoned lock.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl CoordinationError {
    /// Builds the error returned when a component's mutex was poisoned.
    #[must_use]
    pub fn poisoned(component: &str, err: impl std::fmt::Display) -> Self {
        Self::Infrastructure(format!("{component} mutex poisoned: {err}"))
    }
}
