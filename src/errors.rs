use thiserror::Error;

use crate::storage::StoreError;
use crate::wizard::ValidationError;

/// Route the front end sends a visitor to when a session is required.
pub const AUTH_ROUTE: &str = "/auth";

/// Error type that captures the failures a donor can run into.
///
/// Every variant is recoverable: the draft is kept and the user may retry.
#[derive(Debug, Error)]
pub enum DonationError {
    /// Local, user-correctable problem with the collected fields.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("A donation is already being processed")]
    SubmissionInFlight,
    #[error("{0}")]
    NotFound(String),
    /// Failure reported by the backing store, shown verbatim.
    #[error("{0}")]
    Persistence(#[from] StoreError),
}

impl DonationError {
    /// Where the caller should navigate after this error, if anywhere.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            DonationError::Unauthenticated => Some(AUTH_ROUTE),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DonationError::Validation(_))
    }
}

pub type DonationResult<T> = Result<T, DonationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_authentication_errors_redirect() {
        assert_eq!(DonationError::Unauthenticated.redirect_path(), Some("/auth"));
        assert_eq!(
            DonationError::NotFound("missing".into()).redirect_path(),
            None
        );
    }

    #[test]
    fn persistence_errors_keep_the_underlying_text() {
        let err = DonationError::from(StoreError::Storage("connection reset".into()));
        assert_eq!(err.to_string(), "connection reset");
    }
}
