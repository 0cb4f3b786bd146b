//! Error taxonomy for the job-matching API client.
//!
//! # Design
//! Every client call resolves to a typed value or exactly one `ApiError`.
//! The set is closed: callers match on it to decide between prompting a
//! re-login (`Unauthorized`) and offering a manual retry (everything else).
//! Partial failures inside list-producing calls never surface here.

use thiserror::Error;

const DEFAULT_UNAUTHORIZED: &str = "authentication required";

/// Errors returned by `JobMatchClient` parse methods and `JobMatchService` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Arguments were rejected before any request was issued.
    #[error("invalid input")]
    InvalidInput,

    /// A single-object endpoint answered 200 with an empty body.
    #[error("no data returned")]
    NoData,

    /// The body did not match the endpoint's strict schema.
    #[error("response could not be decoded")]
    DecodingFailure,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 404 or any other non-200 status not special-cased above.
    #[error("server error: {0}")]
    ServerError(String),

    /// The transport failed before a response was received.
    #[error("unknown error")]
    Unknown,
}

impl ApiError {
    /// Unauthorized outcome used when no token is stored at all.
    pub fn login_required() -> Self {
        ApiError::Unauthorized(DEFAULT_UNAUTHORIZED.to_string())
    }

    /// Human-readable text for the presentation layer.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg) | ApiError::Forbidden(msg) | ApiError::ServerError(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }

    /// Whether the presentation layer should send the user back to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

pub(crate) fn default_unauthorized_message() -> &'static str {
    DEFAULT_UNAUTHORIZED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterized_variants_expose_their_message() {
        assert_eq!(ApiError::Forbidden("company only".into()).message(), "company only");
        assert_eq!(ApiError::ServerError("500: boom".into()).message(), "500: boom");
        assert_eq!(ApiError::login_required().message(), "authentication required");
    }

    #[test]
    fn unit_variants_fall_back_to_display() {
        assert_eq!(ApiError::DecodingFailure.message(), "response could not be decoded");
        assert_eq!(ApiError::Unknown.to_string(), "unknown error");
    }

    #[test]
    fn only_unauthorized_requires_login() {
        assert!(ApiError::login_required().requires_login());
        assert!(!ApiError::Forbidden(String::new()).requires_login());
        assert!(!ApiError::Unknown.requires_login());
    }
}
