//! C-ABI wrapper around `jobmatch-core`.
//!
//! # Overview
//! Lets the mobile shell build requests, execute them with its own HTTP
//! stack, and hand the responses back for classification, decoding and
//! ranking, without linking an async runtime.
//!
//! # Design
//! - Every `extern "C"` function runs inside `catch_unwind` so panics never
//!   cross the boundary.
//! - `jm_build_*` return null when an argument is null, not UTF-8, or
//!   rejected by the core.
//! - `jm_parse_*` always return an `FfiResult`; errors carry a code that
//!   mirrors `ApiError` and the message to show the user. A body that is
//!   not UTF-8 is a `DecodingFailure`, never an empty list.
//! - The caller owns every returned pointer and releases it with the
//!   matching `jm_free_*`.

pub mod types;

#[cfg(test)]
mod host_flow;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use jobmatch_core::{rank, ApiError, HttpRequest, HttpResponse, JobMatchClient};

use types::*;

/// Borrow a C string. `None` when it is not valid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and NUL-terminated.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8. Free with
/// `jm_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn jm_client_new(base_url: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Some(url) = (unsafe { read_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiClient {
            inner: JobMatchClient::new(url),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jm_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Shared null checks and panic guard for the authenticated builders.
fn build_authenticated(
    client: *const FfiClient,
    token: *const c_char,
    build: impl FnOnce(&JobMatchClient, &str) -> Result<HttpRequest, ApiError>,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || token.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(token) = (unsafe { read_str(token) }) else {
            return std::ptr::null_mut();
        };
        match build(&client.inner, token) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the login request.
///
/// Returns null if any argument is null or not UTF-8, or either credential
/// is empty.
#[unsafe(no_mangle)]
pub extern "C" fn jm_build_login(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || email.is_null() || password.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(email), Some(password)) =
            (unsafe { read_str(email) }, unsafe { read_str(password) })
        else {
            return std::ptr::null_mut();
        };
        match client.inner.build_login(email, password) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for postings matched against `resume_id`.
///
/// Returns null if `client` or `token` is null, or `top_n` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn jm_build_match_postings_for_resume(
    client: *const FfiClient,
    token: *const c_char,
    resume_id: i64,
    top_n: u32,
) -> *mut FfiHttpRequest {
    build_authenticated(client, token, |c, token| {
        c.build_match_postings_for_resume(token, resume_id, top_n)
    })
}

/// Build the request for candidate resumes matched against `posting_id`.
///
/// Returns null if `client` or `token` is null, or `top_n` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn jm_build_match_resumes_for_posting(
    client: *const FfiClient,
    token: *const c_char,
    posting_id: i64,
    top_n: u32,
) -> *mut FfiHttpRequest {
    build_authenticated(client, token, |c, token| {
        c.build_match_resumes_for_posting(token, posting_id, top_n)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn jm_build_applicant_count(
    client: *const FfiClient,
    token: *const c_char,
    posting_id: i64,
) -> *mut FfiHttpRequest {
    build_authenticated(client, token, |c, token| {
        Ok(c.build_applicant_count(token, posting_id))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn jm_build_job_categories(
    client: *const FfiClient,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    build_authenticated(client, token, |c, token| Ok(c.build_job_categories(token)))
}

/// Build the request for the applicants on one of the company's postings.
#[unsafe(no_mangle)]
pub extern "C" fn jm_build_posting_applications(
    client: *const FfiClient,
    token: *const c_char,
    posting_id: i64,
) -> *mut FfiHttpRequest {
    build_authenticated(client, token, |c, token| {
        Ok(c.build_posting_applications(token, posting_id))
    })
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    if resp.body.is_null() {
        return Ok(HttpResponse::new(resp.status, String::new()));
    }
    let body = unsafe { read_str(resp.body) }.ok_or(ApiError::DecodingFailure)?;
    Ok(HttpResponse::new(resp.status, body.to_string()))
}

fn parse_response<T>(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
    context: &str,
    parse: impl FnOnce(&JobMatchClient, &HttpResponse) -> Result<T, ApiError>,
    wrap: impl FnOnce(T) -> *mut FfiResult,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let parsed = response_to_core(unsafe { &*response })
            .and_then(|response| parse(&client.inner, &response));
        match parsed {
            Ok(value) => wrap(value),
            Err(err) => FfiResult::from_error(err),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic(context))
}

/// `data_tag = Login` on success.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_login(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_login",
        |c, r| c.parse_login(r),
        FfiResult::ok_login,
    )
}

/// `data_tag = RankedList` on success, best match first.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_match_postings_for_resume(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_match_postings_for_resume",
        |c, r| c.parse_match_postings_for_resume(r).map(rank),
        FfiResult::ok_ranked,
    )
}

/// `data_tag = RankedList` on success, best match first.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_match_resumes_for_posting(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_match_resumes_for_posting",
        |c, r| c.parse_match_resumes_for_posting(r).map(rank),
        FfiResult::ok_ranked,
    )
}

/// `data_tag = Count` on success.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_applicant_count(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_applicant_count",
        |c, r| c.parse_applicant_count(r),
        FfiResult::ok_count,
    )
}

/// `data_tag = StringList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_job_categories(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_job_categories",
        |c, r| c.parse_job_categories(r),
        FfiResult::ok_strings,
    )
}

/// `data_tag = ApplicationList` on success. Malformed rows are dropped and
/// the rest are returned.
#[unsafe(no_mangle)]
pub extern "C" fn jm_parse_posting_applications(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_response(
        client,
        response,
        "jm_parse_posting_applications",
        |c, r| c.parse_posting_applications(r),
        FfiResult::ok_applications,
    )
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `jm_build_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jm_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free a result returned by any `jm_parse_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jm_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiResult::free(result) });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jm_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { free_c_string(s) });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
