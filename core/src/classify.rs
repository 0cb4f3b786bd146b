//! Status-code classification.
//!
//! Precedence is fixed: 401, 403, 404, 200, then everything else. Only the
//! message text depends on the body; the outcome kind depends on the status
//! alone.

use std::collections::HashMap;

use crate::endpoint::Endpoint;
use crate::error::{default_unauthorized_message, ApiError};
use crate::http::HttpResponse;

const DEFAULT_FORBIDDEN: &str = "access denied";
const DEFAULT_SERVER_ERROR: &str = "unexpected server response";

/// Map a completed exchange to its body (on 200) or an `ApiError`.
pub fn classify<'a>(endpoint: Endpoint, response: &'a HttpResponse) -> Result<&'a str, ApiError> {
    let body = response.body.as_str();
    let outcome = match response.status {
        401 => Err(ApiError::Unauthorized(
            message_field(body).unwrap_or_else(|| default_unauthorized_message().to_string()),
        )),
        403 => Err(ApiError::Forbidden(
            non_empty(body).unwrap_or(DEFAULT_FORBIDDEN).to_string(),
        )),
        404 => Err(ApiError::ServerError(
            endpoint.resource().not_found_message().to_string(),
        )),
        200 => return Ok(body),
        status => Err(ApiError::ServerError(format!(
            "{status}: {}",
            non_empty(body).unwrap_or(DEFAULT_SERVER_ERROR)
        ))),
    };
    if let Err(err) = &outcome {
        tracing::warn!(?endpoint, status = response.status, error = %err, "request failed");
    }
    outcome
}

/// `message` from a body that decodes as a flat string map.
fn message_field(body: &str) -> Option<String> {
    serde_json::from_str::<HashMap<String, String>>(body)
        .ok()
        .and_then(|mut map| map.remove("message"))
}

fn non_empty(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
