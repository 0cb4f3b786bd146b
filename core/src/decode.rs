//! Payload decoding.
//!
//! Strict endpoints fail the whole call on a schema mismatch. Lenient
//! endpoints decode a generic list of maps and drop individual records that
//! are missing a field or carry the wrong primitive type. The asymmetry is
//! per endpoint (see `Endpoint::decode_strategy`) and must stay that way.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::endpoint::{DecodeStrategy, Endpoint};
use crate::error::ApiError;
use crate::types::{ApplicationRecord, ApplicationStatus};

pub type RawRecord = Map<String, Value>;

/// Extraction from one untyped map. `None` drops the record.
pub trait LooseRecord: Sized {
    fn from_raw(raw: &RawRecord) -> Option<Self>;
}

/// Decode a single object. An empty body is `NoData`.
pub fn decode_one<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        tracing::warn!(?endpoint, "empty body where a record was expected");
        return Err(ApiError::NoData);
    }
    strict(endpoint, body)
}

/// Decode a list. An empty body is an empty list on endpoints that use that
/// convention and `NoData` elsewhere.
pub fn decode_list<T: DeserializeOwned>(
    endpoint: Endpoint,
    body: &str,
) -> Result<Vec<T>, ApiError> {
    if body.trim().is_empty() {
        return empty_list(endpoint);
    }
    strict(endpoint, body)
}

/// Decode an untyped list of maps, keeping only records that validate.
pub fn decode_lenient<T: LooseRecord>(endpoint: Endpoint, body: &str) -> Result<Vec<T>, ApiError> {
    if body.trim().is_empty() {
        return empty_list(endpoint);
    }
    let raw: Vec<RawRecord> = strict(endpoint, body)?;
    let total = raw.len();
    let records: Vec<T> = raw
        .iter()
        .enumerate()
        .filter_map(|(index, map)| {
            let record = T::from_raw(map);
            if record.is_none() {
                tracing::debug!(?endpoint, index, "dropping malformed record");
            }
            record
        })
        .collect();
    if records.len() < total {
        tracing::debug!(?endpoint, kept = records.len(), total, "lenient decode dropped records");
    }
    Ok(records)
}

/// Decode a bare string list, falling back to the wrapped object form the
/// endpoint declares.
pub fn decode_string_list(endpoint: Endpoint, body: &str) -> Result<Vec<String>, ApiError> {
    if body.trim().is_empty() {
        return empty_list(endpoint);
    }
    if let Ok(list) = serde_json::from_str::<Vec<String>>(body) {
        return Ok(list);
    }
    let DecodeStrategy::StringListOrWrapped { field } = endpoint.decode_strategy() else {
        tracing::warn!(?endpoint, "string list did not decode");
        return Err(ApiError::DecodingFailure);
    };
    serde_json::from_str::<RawRecord>(body)
        .ok()
        .and_then(|mut wrapper| wrapper.remove(field))
        .and_then(|inner| serde_json::from_value::<Vec<String>>(inner).ok())
        .ok_or_else(|| {
            tracing::warn!(?endpoint, field, "neither bare nor wrapped string list decoded");
            ApiError::DecodingFailure
        })
}

fn strict<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(?endpoint, error = %e, "strict decode failed");
        ApiError::DecodingFailure
    })
}

fn empty_list<T>(endpoint: Endpoint) -> Result<Vec<T>, ApiError> {
    if endpoint.empty_body_is_empty_list() {
        Ok(Vec::new())
    } else {
        tracing::warn!(?endpoint, "empty body on a list endpoint that never sends one");
        Err(ApiError::NoData)
    }
}

pub fn int_field(raw: &RawRecord, key: &str) -> Option<i64> {
    raw.get(key).and_then(Value::as_i64)
}

pub fn str_field(raw: &RawRecord, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

impl LooseRecord for ApplicationRecord {
    fn from_raw(raw: &RawRecord) -> Option<Self> {
        Some(ApplicationRecord {
            id: int_field(raw, "id")?,
            job_posting_id: int_field(raw, "jobPostingId")?,
            applicant_id: int_field(raw, "applicantId")?,
            applicant_name: str_field(raw, "applicantName")?,
            applicant_email: str_field(raw, "applicantEmail")?,
            applied_at: str_field(raw, "appliedAt")?,
            status: str_field(raw, "status").as_deref().and_then(ApplicationStatus::parse)?,
        })
    }
}
