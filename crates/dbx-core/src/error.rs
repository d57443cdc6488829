//! Extraction error type.
//!
//! Expected failures (unsupported URL, password wall) are separate variants so
//! the CLI can print them without an error chain.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("password protected video, use --video-password <password>")]
    PasswordRequired,

    #[error("authentication failed!")]
    AuthenticationFailed,

    #[error("missing session cookie `{name}`")]
    MissingCookie { name: &'static str },

    #[error("unable to extract {field}")]
    MissingField { field: &'static str },

    #[error("invalid {what} response: {source}")]
    InvalidResponse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0:#}")]
    Network(anyhow::Error),
}

impl ExtractError {
    /// True for failures the user can act on; these are reported without a chain.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedUrl(_)
                | ExtractError::PasswordRequired
                | ExtractError::AuthenticationFailed
        )
    }
}

impl From<anyhow::Error> for ExtractError {
    fn from(err: anyhow::Error) -> Self {
        ExtractError::Network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_errors() {
        assert!(ExtractError::PasswordRequired.is_expected());
        assert!(ExtractError::AuthenticationFailed.is_expected());
        assert!(ExtractError::UnsupportedUrl("x".into()).is_expected());
        assert!(!ExtractError::MissingCookie { name: "t" }.is_expected());
        assert!(!ExtractError::from(anyhow::anyhow!("boom")).is_expected());
    }

    #[test]
    fn password_message_names_the_flag() {
        let msg = ExtractError::PasswordRequired.to_string();
        assert!(msg.contains("--video-password"));
    }

    #[test]
    fn network_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("GET https://example.com");
        let msg = ExtractError::from(err).to_string();
        assert!(msg.contains("GET https://example.com"));
        assert!(msg.contains("connection refused"));
    }
}
