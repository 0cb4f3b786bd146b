//! Outbound request construction.
//!
//! Pure: no I/O and no failure path. Identifiers interpolated into `path`
//! are the caller's responsibility; a malformed path produces a malformed
//! URL rather than an error.

use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE};

/// Build a request against `base_url` + `path`.
///
/// Query parameters are form-encoded and appended in the order given.
/// A body adds `content-type: application/json`; a token adds
/// `authorization: Bearer <token>`.
pub fn build_request(
    base_url: &str,
    path: &str,
    method: HttpMethod,
    token: Option<&str>,
    query: &[(&str, String)],
    body: Option<String>,
) -> HttpRequest {
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), path);
    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }

    let mut headers = Vec::new();
    if body.is_some() {
        headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    }
    if let Some(token) = token {
        headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
    }

    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

/// Serialize a request payload; failure means the caller handed us
/// something that cannot be sent.
pub(crate) fn json_body<T: serde::Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| {
        tracing::warn!(error = %e, "request body serialization failed");
        ApiError::InvalidInput
    })
}
