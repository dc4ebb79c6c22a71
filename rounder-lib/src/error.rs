use std::io;

use reqwest::StatusCode;

/// Errors that can occur while authenticating, resolving accounts, or moving
/// money into the rounding pot
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The credential file could not be read or written
    #[error("credential file I/O failed")]
    Io(#[from] io::Error),

    /// The credential file or a token response was not valid JSON
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),

    /// The state token typed in by the operator doesn't match the one that was
    /// sent with the authorisation URL
    #[error("state token does not match")]
    StateMismatch,

    /// The OAuth token endpoint refused the grant
    #[error("token request rejected ({status}): {body}")]
    TokenRejected {
        /// HTTP status returned by the token endpoint
        status: StatusCode,
        /// Raw response body, useful for diagnosing the rejection
        body: String,
    },

    /// A request to the Monzo API failed in transport, or returned an error
    /// status outside the token endpoint
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The token endpoint couldn't be reached while exchanging an
    /// authorisation code
    #[error("token exchange failed")]
    Exchange(#[source] reqwest::Error),

    /// A URL could not be built
    #[error("invalid URL")]
    Url(#[from] url::ParseError),

    /// An error returned by the Monzo client
    #[error(transparent)]
    Monzo(#[from] monzo::Error),

    /// An account or pot required for the run doesn't exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Operator input could not be read
    #[error("failed to read operator input")]
    Prompt(#[source] io::Error),
}

impl Error {
    /// Whether this error comes from the OAuth exchange itself, rather than
    /// from a lookup or a transfer
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::StateMismatch
                | Self::TokenRejected { .. }
                | Self::Exchange(_)
                | Self::Prompt(_)
        )
    }

    /// Whether the token endpoint refused a grant with a client error, meaning
    /// the refresh token is no longer usable
    pub(crate) fn is_rejected_grant(&self) -> bool {
        matches!(self, Self::TokenRejected { status, .. } if status.is_client_error())
    }

    /// Transport failures while exchanging an authorisation code belong to the
    /// authentication step, not to the API calls that follow it
    pub(crate) fn during_exchange(self) -> Self {
        match self {
            Self::Http(e) => Self::Exchange(e),
            other => other,
        }
    }
}

/// Convenience alias for results returned by this crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn rejected(status: u16) -> Error {
        Error::TokenRejected {
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        }
    }

    #[test_case(rejected(400) => true; "bad request")]
    #[test_case(rejected(401) => true; "unauthorized")]
    #[test_case(rejected(503) => false; "server error")]
    #[test_case(Error::StateMismatch => false; "state mismatch")]
    fn rejected_grant(error: Error) -> bool {
        error.is_rejected_grant()
    }

    fn transport_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err()
    }

    #[test]
    fn exchange_transport_errors_are_auth_failures() {
        assert!(!Error::Http(transport_error()).is_auth_failure());

        let error = Error::Http(transport_error()).during_exchange();

        assert!(matches!(error, Error::Exchange(_)));
        assert!(error.is_auth_failure());
        assert!(!error.is_rejected_grant());
    }

    #[test]
    fn exchange_keeps_other_errors() {
        assert!(matches!(
            Error::StateMismatch.during_exchange(),
            Error::StateMismatch
        ));
    }

    #[test]
    fn lookups_are_not_auth_failures() {
        assert!(!Error::NotFound("pot".to_string()).is_auth_failure());
        assert!(Error::StateMismatch.is_auth_failure());
        assert!(rejected(500).is_auth_failure());
    }
}
